use super::kind::{KindTag, ParamKind};
use crate::Principal;
use chrono::TimeDelta;
use std::fmt;

/// A converted argument handed to a handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Bool(bool),
    Int(i64),
    Float(f64),
    Id(u64),
    Principal(Principal),
    Vector2([f64; 2]),
    Vector3([f64; 3]),
    Duration(TimeDelta),
    Enum { variant: String, index: usize },
}

impl Value {
    pub fn tag(&self) -> KindTag {
        match self {
            Value::Text(_) => KindTag::Text,
            Value::Bool(_) => KindTag::Bool,
            Value::Int(_) => KindTag::Int,
            Value::Float(_) => KindTag::Float,
            Value::Id(_) => KindTag::Id,
            Value::Principal(_) => KindTag::Principal,
            Value::Vector2(_) => KindTag::Vector2,
            Value::Vector3(_) => KindTag::Vector3,
            Value::Duration(_) => KindTag::Duration,
            Value::Enum { .. } => KindTag::Enum,
        }
    }

    /// Whether this value could have been produced by a slot of `kind`.
    pub fn fits(&self, kind: &ParamKind) -> bool {
        match (self, kind) {
            (Value::Enum { variant, index }, ParamKind::Enum(def)) => def.variants.get(*index) == Some(variant),
            _ => self.tag() == kind.tag(),
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Enum { variant, .. } => Some(variant),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Numeric view; integers widen to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_id(&self) -> Option<u64> {
        match self {
            Value::Id(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_principal(&self) -> Option<&Principal> {
        match self {
            Value::Principal(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_vector2(&self) -> Option<[f64; 2]> {
        match self {
            Value::Vector2(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vector3(&self) -> Option<[f64; 3]> {
        match self {
            Value::Vector3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<TimeDelta> {
        match self {
            Value::Duration(d) => Some(*d),
            _ => None,
        }
    }

    /// Index of the matched variant for enumeration values.
    pub fn as_variant_index(&self) -> Option<usize> {
        match self {
            Value::Enum { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "\"{s}\""),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Id(v) => write!(f, "#{v}"),
            Value::Principal(p) => write!(f, "{} (#{})", p.name, p.id),
            Value::Vector2([x, y]) => write!(f, "({x}, {y})"),
            Value::Vector3([x, y, z]) => write!(f, "({x}, {y}, {z})"),
            Value::Duration(d) => write!(f, "{}s", d.num_seconds()),
            Value::Enum { variant, .. } => write!(f, "{variant}"),
        }
    }
}

/// One declared parameter slot of a handler.
///
/// A slot with a `default` may be left out of the input; the default is then
/// passed to the handler in its place.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub kind: ParamKind,
    pub default: Option<Value>,
}

impl Param {
    pub fn required(name: impl Into<String>, kind: ParamKind) -> Self {
        Self { name: name.into(), kind, default: None }
    }

    pub fn optional(name: impl Into<String>, kind: ParamKind, default: Value) -> Self {
        Self { name: name.into(), kind, default: Some(default) }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }

    /// Usage fragment: `<name>` for required slots, `[name]` for optional ones.
    pub fn usage_fragment(&self) -> String {
        if self.has_default() { format!("[{}]", self.name) } else { format!("<{}>", self.name) }
    }
}
