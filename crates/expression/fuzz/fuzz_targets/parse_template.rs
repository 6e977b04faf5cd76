#![no_main]

use libfuzzer_sys::fuzz_target;
use nebula_expression::{EvaluationContext, ExpressionEngine, Template};

fuzz_target!(|input: &str| {
    if let Ok(template) = Template::new(input) {
        let engine = ExpressionEngine::new();
        let context = EvaluationContext::new();
        let _ = template.render(&engine, &context);
    }
});
