//! Value list fuzzer.
//!
//! Feeds arbitrary strings to the tokenizer under both escape conventions.
//! Every token must be trimmed, non-empty and start at its reported
//! position, and normalizing its canonical form must not change it again.

use honggfuzz::fuzz;
use sql_seed_rs::{CanonicalValue, QuoteEscape, ValueTokenizer};

fn check(list: &str, escape: QuoteEscape) {
    let Ok(tokens) = ValueTokenizer::new(escape).tokenize(list) else {
        return;
    };
    for token in &tokens {
        let text = token.as_str();
        assert!(!text.is_empty());
        assert_eq!(text, text.trim());
        assert_eq!(list[token.pos..].chars().next(), text.chars().next());

        let value = CanonicalValue::normalize(text, escape);
        let again = CanonicalValue::normalize(&value.to_string(), escape);
        assert_eq!(value, again, "normalization of {text:?} is not idempotent");
    }
}

fn main() {
    loop {
        fuzz!(|list: String| {
            check(&list, QuoteEscape::Doubled);
            check(&list, QuoteEscape::Backslash);
        });
    }
}
