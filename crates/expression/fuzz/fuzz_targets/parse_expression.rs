#![no_main]

use libfuzzer_sys::fuzz_target;
use nebula_expression::{EvaluationContext, ExpressionEngine};

fuzz_target!(|input: &str| {
    let engine = ExpressionEngine::new();
    let context = EvaluationContext::new();
    let _ = engine.evaluate(input, &context);
});
