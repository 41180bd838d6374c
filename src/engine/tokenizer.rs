//! Quote-aware tokenizer.
//!
//! ```text
//! give "Iron Sword" 2   ->  ["give", "Iron Sword", "2"]
//! say "unterminated     ->  ["say", "unterminated"]
//! ```
//!
//! A double quote toggles quoted mode and is dropped from the output. Inside
//! quotes whitespace belongs to the current token; an unmatched quote simply
//! keeps quoted mode open until the end of the input. Empty tokens (for
//! example from `""`) are never produced.

/// Split `input` into tokens.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in input.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
