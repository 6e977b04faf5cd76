#![no_main]

use libfuzzer_sys::fuzz_target;
use nebula_expression::Lexer;

fuzz_target!(|input: &str| {
    let _ = Lexer::new(input).tokenize();
});
