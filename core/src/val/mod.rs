//! Runtime values.
//!
//! A [`Value`] is a small `Copy` handle. Every payload that needs storage (integer digits,
//! string bytes, list elements, primitive descriptors) lives in the run's [`Arena`], so the
//! `'a` lifetime of a value is the lifetime of that run.

use std::fmt;

use num_bigint::{BigInt, Sign};

use crate::error::VmError;
use crate::vm::{Arena, Primitive};

mod owned;

pub use owned::OwnedValue;


/// Discriminator of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Int,
    String,
    Bool,
    None,
    List,
    Function,
}

impl Tag {
    /// Type name as the guest language spells it.
    pub const fn name(self) -> &'static str {
        match self {
            Tag::Int => "int",
            Tag::String => "str",
            Tag::Bool => "bool",
            Tag::None => "NoneType",
            Tag::List => "list",
            Tag::Function => "builtin_function_or_method",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arbitrary-precision integer whose little-endian base-2^32 digits live in the arena.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct IntRef<'a> {
    sign: Sign,
    digits: &'a [u32],
}

impl<'a> IntRef<'a> {
    fn alloc(arena: &'a Arena, n: &BigInt) -> Result<Self, VmError> {
        let (sign, digits) = n.to_u32_digits();
        let digits = arena.alloc_slice_copy(&digits)?;
        Ok(Self { sign, digits })
    }

    pub fn to_bigint(self) -> BigInt {
        BigInt::from_slice(self.sign, self.digits)
    }

    pub fn sign(self) -> Sign {
        self.sign
    }

    pub fn is_zero(self) -> bool {
        self.digits.is_empty()
    }
}

impl fmt::Display for IntRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_bigint(), f)
    }
}

impl fmt::Debug for IntRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// The universal runtime datum.
#[derive(Clone, Copy)]
pub enum Value<'a> {
    Int(IntRef<'a>),
    Str(&'a str),
    Bool(bool),
    None,
    /// Fixed-length sequence, built once and never resized.
    List(&'a [Value<'a>]),
    Function(&'a Primitive),
}

impl<'a> Value<'a> {
    pub fn int(arena: &'a Arena, n: &BigInt) -> Result<Self, VmError> {
        IntRef::alloc(arena, n).map(Value::Int)
    }

    pub fn small_int(arena: &'a Arena, n: i64) -> Result<Self, VmError> {
        Self::int(arena, &BigInt::from(n))
    }

    pub fn string(arena: &'a Arena, s: &str) -> Result<Self, VmError> {
        arena.alloc_str(s).map(Value::Str)
    }

    /// Copy `items` into a new arena-owned list. The handles are copied; the payloads they
    /// point at are shared, never duplicated.
    pub fn list(arena: &'a Arena, items: &[Value<'a>]) -> Result<Self, VmError> {
        arena.alloc_slice_copy(items).map(Value::List)
    }

    pub fn function(arena: &'a Arena, primitive: Primitive) -> Result<Self, VmError> {
        arena.alloc(primitive).map(Value::Function)
    }

    pub const fn bool(b: bool) -> Self {
        Value::Bool(b)
    }

    pub const fn none() -> Self {
        Value::None
    }

    pub const fn tag(&self) -> Tag {
        match self {
            Value::Int(_) => Tag::Int,
            Value::Str(_) => Tag::String,
            Value::Bool(_) => Tag::Bool,
            Value::None => Tag::None,
            Value::List(_) => Tag::List,
            Value::Function(_) => Tag::Function,
        }
    }

    fn mismatch(&self, expected: Tag) -> VmError {
        VmError::TypeMismatch {
            expected,
            found: self.tag(),
        }
    }

    pub fn as_int(&self) -> Result<IntRef<'a>, VmError> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(other.mismatch(Tag::Int)),
        }
    }

    pub fn as_str(&self) -> Result<&'a str, VmError> {
        match self {
            Value::Str(s) => Ok(*s),
            other => Err(other.mismatch(Tag::String)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, VmError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch(Tag::Bool)),
        }
    }

    pub fn as_list(&self) -> Result<&'a [Value<'a>], VmError> {
        match self {
            Value::List(items) => Ok(*items),
            other => Err(other.mismatch(Tag::List)),
        }
    }

    pub fn as_function(&self) -> Result<&'a Primitive, VmError> {
        match self {
            Value::Function(p) => Ok(*p),
            other => Err(other.mismatch(Tag::Function)),
        }
    }

    /// Truthiness: zero, empty strings, empty lists, `False` and `None` are falsey.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Int(n) => !n.is_zero(),
            Value::Str(s) => !s.is_empty(),
            Value::Bool(b) => *b,
            Value::None => false,
            Value::List(items) => !items.is_empty(),
            Value::Function(_) => true,
        }
    }

    /// `str()` rendering: like `Display` but top-level strings are not quoted.
    pub fn display_string(&self) -> String {
        match self {
            Value::Str(s) => (*s).to_string(),
            other => other.to_string(),
        }
    }

    /// Deep copy that no longer borrows from the arena.
    pub fn to_owned_value(&self) -> OwnedValue {
        match self {
            Value::Int(n) => OwnedValue::Int(n.to_bigint()),
            Value::Str(s) => OwnedValue::Str((*s).to_string()),
            Value::Bool(b) => OwnedValue::Bool(*b),
            Value::None => OwnedValue::None,
            Value::List(items) => OwnedValue::List(items.iter().map(Value::to_owned_value).collect()),
            Value::Function(p) => OwnedValue::Function(p.name.to_string()),
        }
    }
}

impl PartialEq for Value<'_> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a.name == b.name,
            _ => false,
        }
    }
}

/// `repr()` rendering.
impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => write_str_repr(f, s),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::None => f.write_str("None"),
            Value::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Value::Function(p) => write!(f, "<built-in function {}>", p.name),
        }
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({self})", self.tag())
    }
}

/// Write `s` as a quoted literal with the usual backslash escapes.
///
/// Single quotes unless `s` contains `'` and no `"`, in which case double quotes avoid the
/// escape.
pub(crate) fn write_str_repr(f: &mut impl fmt::Write, s: &str) -> fmt::Result {
    let quote = if s.contains('\'') && !s.contains('"') { '"' } else { '\'' };
    f.write_char(quote)?;
    for ch in s.chars() {
        match ch {
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c if c == quote => {
                f.write_char('\\')?;
                f.write_char(c)?;
            }
            c => f.write_char(c)?,
        }
    }
    f.write_char(quote)
}
