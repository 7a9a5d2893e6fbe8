use std::fmt;

use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::{Serialize, Serializer, ser::SerializeSeq};

use super::{Tag, write_str_repr};

/// Arena-independent copy of a [`Value`](super::Value), used to hand results back to the
/// caller after the run's arena has been dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OwnedValue {
    Int(BigInt),
    Str(String),
    Bool(bool),
    None,
    List(Vec<OwnedValue>),
    /// Name of a primitive function.
    Function(String),
}

impl OwnedValue {
    pub fn tag(&self) -> Tag {
        match self {
            OwnedValue::Int(_) => Tag::Int,
            OwnedValue::Str(_) => Tag::String,
            OwnedValue::Bool(_) => Tag::Bool,
            OwnedValue::None => Tag::None,
            OwnedValue::List(_) => Tag::List,
            OwnedValue::Function(_) => Tag::Function,
        }
    }

    pub fn as_bigint(&self) -> Option<&BigInt> {
        match self {
            OwnedValue::Int(n) => Some(n),
            _ => None,
        }
    }
}

impl From<i64> for OwnedValue {
    fn from(n: i64) -> Self {
        OwnedValue::Int(BigInt::from(n))
    }
}

impl From<BigInt> for OwnedValue {
    fn from(n: BigInt) -> Self {
        OwnedValue::Int(n)
    }
}

impl From<&str> for OwnedValue {
    fn from(s: &str) -> Self {
        OwnedValue::Str(s.to_string())
    }
}

impl From<bool> for OwnedValue {
    fn from(b: bool) -> Self {
        OwnedValue::Bool(b)
    }
}

impl<T> From<Vec<T>> for OwnedValue
where
    T: Into<OwnedValue>,
{
    fn from(v: Vec<T>) -> Self {
        OwnedValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl fmt::Display for OwnedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnedValue::Int(n) => write!(f, "{n}"),
            OwnedValue::Str(s) => write_str_repr(f, s),
            OwnedValue::Bool(true) => f.write_str("True"),
            OwnedValue::Bool(false) => f.write_str("False"),
            OwnedValue::None => f.write_str("None"),
            OwnedValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            OwnedValue::Function(name) => write!(f, "<built-in function {name}>"),
        }
    }
}

impl Serialize for OwnedValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            // Integers outside the i64 range fall back to their decimal string.
            OwnedValue::Int(n) => match n.to_i64() {
                Some(small) => serializer.serialize_i64(small),
                None => serializer.collect_str(n),
            },
            OwnedValue::Str(s) => serializer.serialize_str(s),
            OwnedValue::Bool(b) => serializer.serialize_bool(*b),
            OwnedValue::None => serializer.serialize_unit(),
            OwnedValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            OwnedValue::Function(name) => serializer.collect_str(&format_args!("<built-in function {name}>")),
        }
    }
}
