//! Typed command parameters.
//!
//! Every handler declares an ordered list of [`Param`] slots. During overload
//! resolution each remaining argument token is converted against the slot's
//! [`ParamKind`], and a successful conversion contributes the kind's weight to
//! the candidate's score.
//!
//! ```text
//! token ── TokenShape::scan ──┬─ shape cannot fit kind -> ValueError (cheap)
//!          (shape.rs)         └─ ParamKind::try_parse  -> Value
//!                                (kind.rs + parse.rs)
//! ```
//!
//! ## Responsibilities by module
//!
//! - `kind.rs`: the [`ParamKind`] sum type, [`KindTag`] and the weight table.
//! - `value.rs`: converted [`Value`]s and the [`Param`] slot descriptor.
//! - `shape.rs`: coarse token classification used to skip hopeless parses.
//! - `parse.rs`: the per-kind text parsers.
//!
//! ## Adding a new kind
//!
//! - Add a `ParamKind` variant and a `KindTag` variant (keep `KIND_COUNT` and
//!   `KIND_WEIGHTS` aligned with the tag order).
//! - Add the parser to `parse.rs` and wire it into `ParamKind::try_parse`.
//! - If the kind needs a coarse precondition, teach `KindTag::required_shape`
//!   and `KindTag::excluded_shape`.

#[path = "params/kind.rs"]
mod kind;
#[path = "params/parse.rs"]
mod parse;
#[path = "params/shape.rs"]
mod shape;
#[path = "params/value.rs"]
mod value;

#[cfg(test)]
#[path = "params/tests.rs"]
mod tests;

pub use kind::{DEFAULT_USED_SCORE, EnumDef, KIND_COUNT, KindTag, ParamKind};
pub use shape::TokenShape;
pub use value::{Param, Value};
