use super::parse;
use super::shape::TokenShape;
use super::value::Value;
use crate::Host;
use crate::error::ValueError;

/// Score contributed by a slot that was left to its default value.
pub const DEFAULT_USED_SCORE: i32 = 1;

/// Number of [`KindTag`]s (length of the weight table).
pub const KIND_COUNT: usize = 10;

/// Conversion weight per kind, indexed by `KindTag as usize`.
///
/// Text is the catch-all and must stay the lowest conversion weight so that a
/// token which also parses as a more specific kind prefers that kind.
const KIND_WEIGHTS: [i32; KIND_COUNT] = [
    10, // Text
    20, // Bool
    30, // Int
    20, // Float
    40, // Id
    50, // Principal
    40, // Vector2
    40, // Vector3
    30, // Duration
    30, // Enum
];

/// Named set of accepted words for an enumeration slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumDef {
    pub fn new<I, S>(name: impl Into<String>, variants: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { name: name.into(), variants: variants.into_iter().map(Into::into).collect() }
    }
}

/// Declared type of a parameter slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    /// Literal text; accepts any token.
    Text,
    Bool,
    Int,
    Float,
    /// Numeric domain identifier, optionally written with a leading `#`.
    Id,
    /// A known principal resolved through [`Host::find_principal`].
    Principal,
    Vector2,
    Vector3,
    /// Compact duration such as `90s`, `5m` or `1h30m`.
    Duration,
    Enum(EnumDef),
}

/// Payload-free discriminant of [`ParamKind`] / [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KindTag {
    Text = 0,
    Bool = 1,
    Int = 2,
    Float = 3,
    Id = 4,
    Principal = 5,
    Vector2 = 6,
    Vector3 = 7,
    Duration = 8,
    Enum = 9,
}

impl KindTag {
    /// Score contributed by a successful conversion to this kind.
    pub fn weight(self) -> i32 {
        KIND_WEIGHTS[self as usize]
    }

    pub fn name(self) -> &'static str {
        match self {
            KindTag::Text => "text",
            KindTag::Bool => "bool",
            KindTag::Int => "int",
            KindTag::Float => "float",
            KindTag::Id => "id",
            KindTag::Principal => "principal",
            KindTag::Vector2 => "vector2",
            KindTag::Vector3 => "vector3",
            KindTag::Duration => "duration",
            KindTag::Enum => "enum",
        }
    }

    /// Shape bits a token must carry before this kind's parser is attempted.
    pub fn required_shape(self) -> TokenShape {
        match self {
            KindTag::Int | KindTag::Float | KindTag::Id => TokenShape::HAS_DIGITS,
            KindTag::Vector2 | KindTag::Vector3 => TokenShape::HAS_DIGITS | TokenShape::HAS_SEPARATOR,
            KindTag::Duration => TokenShape::HAS_DIGITS | TokenShape::HAS_ALPHA,
            KindTag::Text | KindTag::Bool | KindTag::Principal | KindTag::Enum => TokenShape::empty(),
        }
    }

    /// Shape bits that rule this kind out.
    pub fn excluded_shape(self) -> TokenShape {
        let framing = TokenShape::HAS_SEPARATOR | TokenShape::BRACKETED;
        match self {
            KindTag::Id => framing | TokenShape::HAS_ALPHA | TokenShape::HAS_DOT | TokenShape::LEADING_SIGN,
            KindTag::Int => framing | TokenShape::HAS_ALPHA | TokenShape::HAS_DOT | TokenShape::LEADING_HASH,
            // `1e3` parses as a float.
            KindTag::Float => framing | TokenShape::LEADING_HASH,
            KindTag::Duration => {
                TokenShape::BRACKETED | TokenShape::HAS_DOT | TokenShape::LEADING_SIGN | TokenShape::LEADING_HASH
            }
            KindTag::Vector2 | KindTag::Vector3 => TokenShape::LEADING_HASH,
            KindTag::Text | KindTag::Bool | KindTag::Principal | KindTag::Enum => TokenShape::empty(),
        }
    }
}

impl ParamKind {
    pub fn tag(&self) -> KindTag {
        match self {
            ParamKind::Text => KindTag::Text,
            ParamKind::Bool => KindTag::Bool,
            ParamKind::Int => KindTag::Int,
            ParamKind::Float => KindTag::Float,
            ParamKind::Id => KindTag::Id,
            ParamKind::Principal => KindTag::Principal,
            ParamKind::Vector2 => KindTag::Vector2,
            ParamKind::Vector3 => KindTag::Vector3,
            ParamKind::Duration => KindTag::Duration,
            ParamKind::Enum(_) => KindTag::Enum,
        }
    }

    pub fn weight(&self) -> i32 {
        self.tag().weight()
    }

    /// Human-readable kind name used in usage hints and traces.
    pub fn display_name(&self) -> String {
        match self {
            ParamKind::Enum(def) => def.name.clone(),
            other => other.tag().name().to_string(),
        }
    }

    /// Convert `token` into a value of this kind.
    ///
    /// Domain kinds are listed first; the generic numeric and boolean parsers
    /// follow, and text accepts anything. `Principal` consults `host`, and a
    /// failed lookup fails the conversion.
    pub fn try_parse(&self, token: &str, host: &dyn Host) -> Result<Value, ValueError> {
        let tag = self.tag();
        let shape = TokenShape::scan(token);
        if !shape.contains(tag.required_shape()) || shape.intersects(tag.excluded_shape()) {
            return Err(ValueError::Mismatch { token: token.to_string(), kind: self.display_name() });
        }

        match self {
            ParamKind::Principal => host
                .find_principal(token)
                .map(Value::Principal)
                .ok_or_else(|| ValueError::UnknownPrincipal { token: token.to_string() }),
            ParamKind::Id => parse::parse_id(token).map(Value::Id),
            ParamKind::Vector2 => parse::parse_vector::<2>(token).map(Value::Vector2),
            ParamKind::Vector3 => parse::parse_vector::<3>(token).map(Value::Vector3),
            ParamKind::Duration => parse::parse_duration(token).map(Value::Duration),
            ParamKind::Enum(def) => parse::parse_variant(def, token),
            ParamKind::Int => parse::parse_int(token).map(Value::Int),
            ParamKind::Float => parse::parse_float(token).map(Value::Float),
            ParamKind::Bool => parse::parse_bool(token).map(Value::Bool),
            ParamKind::Text => Ok(Value::Text(token.to_string())),
        }
    }
}
