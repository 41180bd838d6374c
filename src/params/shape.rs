//! Token shape scanning.
//!
//! Before a token is handed to a kind-specific parser, the resolver computes a
//! cheap [`TokenShape`] for it. Kinds declare the shape bits they cannot do
//! without (`KindTag::required_shape`) and the bits none of their valid
//! tokens carry (`KindTag::excluded_shape`), so a slot asking for a vector is
//! rejected for `"Sword"` and an id slot for `"-3"` without running a parser.
//!
//! The real parser still runs after the gate, so the gate may let invalid
//! tokens through. It must never reject a valid one: a required bit has to
//! be present in every valid token of the kind, an excluded bit absent from
//! all of them.

bitflags::bitflags! {
    /// Coarse features of a single argument token.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TokenShape: u16 {
        const HAS_DIGITS    = 1 << 0;
        const HAS_ALPHA     = 1 << 1;
        const HAS_SEPARATOR = 1 << 2;
        const HAS_DOT       = 1 << 3;
        const LEADING_SIGN  = 1 << 4;
        const LEADING_HASH  = 1 << 5;
        const BRACKETED     = 1 << 6;
    }
}

impl TokenShape {
    /// Scan `token` for coarse shape bits.
    pub fn scan(token: &str) -> Self {
        let mut shape = TokenShape::empty();
        let trimmed = token.trim();

        if trimmed.chars().any(|c| c.is_ascii_digit()) {
            shape |= TokenShape::HAS_DIGITS;
        }
        if trimmed.chars().any(char::is_alphabetic) {
            shape |= TokenShape::HAS_ALPHA;
        }
        if trimmed.contains(',') || trimmed.chars().any(char::is_whitespace) {
            shape |= TokenShape::HAS_SEPARATOR;
        }
        if trimmed.contains('.') {
            shape |= TokenShape::HAS_DOT;
        }
        if trimmed.starts_with(['-', '+']) {
            shape |= TokenShape::LEADING_SIGN;
        }
        if trimmed.starts_with('#') {
            shape |= TokenShape::LEADING_HASH;
        }
        if (trimmed.starts_with('(') && trimmed.ends_with(')')) || (trimmed.starts_with('[') && trimmed.ends_with(']'))
        {
            shape |= TokenShape::BRACKETED;
        }

        shape
    }
}
