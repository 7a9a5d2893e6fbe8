use num_bigint::BigInt;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::val::write_str_repr;

/// Literal embedded directly in a `LoadConst` instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Constant {
    /// Serialized as a decimal string so literals of any width survive JSON/TOML/YAML.
    Integer(#[serde(with = "decimal")] BigInt),
    String(String),
    Boolean(bool),
    None,
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constant::Integer(n) => write!(f, "{n}"),
            Constant::String(s) => write_str_repr(f, s),
            Constant::Boolean(true) => f.write_str("True"),
            Constant::Boolean(false) => f.write_str("False"),
            Constant::None => f.write_str("None"),
        }
    }
}

/// Operator carried by `BinaryOperation`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Subtract,
    Multiply,
    /// True division. Produces a float in the guest language, which the VM cannot represent.
    Divide,
    FloorDivide,
    Modulo,
    Power,
    Less,
    LessEqual,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
}

impl BinaryOp {
    pub const fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::FloorDivide => "//",
            BinaryOp::Modulo => "%",
            BinaryOp::Power => "**",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "//" => BinaryOp::FloorDivide,
            "%" => BinaryOp::Modulo,
            "**" => BinaryOp::Power,
            "<" => BinaryOp::Less,
            "<=" => BinaryOp::LessEqual,
            "==" => BinaryOp::Equal,
            "!=" => BinaryOp::NotEqual,
            ">" => BinaryOp::Greater,
            ">=" => BinaryOp::GreaterEqual,
            _ => return None,
        };
        Some(op)
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Less
                | BinaryOp::LessEqual
                | BinaryOp::Equal
                | BinaryOp::NotEqual
                | BinaryOp::Greater
                | BinaryOp::GreaterEqual
        )
    }

    /// `dis`-style opcode name for arithmetic operators; comparisons share `COMPARE_OP`.
    pub const fn mnemonic(self) -> &'static str {
        match self {
            BinaryOp::Add => "BINARY_ADD",
            BinaryOp::Subtract => "BINARY_SUBTRACT",
            BinaryOp::Multiply => "BINARY_MULTIPLY",
            BinaryOp::Divide => "BINARY_TRUE_DIVIDE",
            BinaryOp::FloorDivide => "BINARY_FLOOR_DIVIDE",
            BinaryOp::Modulo => "BINARY_MODULO",
            BinaryOp::Power => "BINARY_POWER",
            _ => "COMPARE_OP",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// One VM operation. The set is closed: the dispatcher matches it exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    LoadConst(Constant),
    LoadName(String),
    StoreName(String),
    ReturnValue,
    /// Call with this many positional arguments above the callee.
    CallFunction(u32),
    /// Like `CallFunction`, with a list of keyword names on top of the stack. The last
    /// `names.len()` arguments are the keyword values, in name order.
    CallFunctionKw(u32),
    PopTop,
    BuildList(u32),
    BinaryOperation(BinaryOp),
}

impl Instruction {
    pub fn load_int(n: impl Into<BigInt>) -> Self {
        Instruction::LoadConst(Constant::Integer(n.into()))
    }

    pub fn load_str(s: impl Into<String>) -> Self {
        Instruction::LoadConst(Constant::String(s.into()))
    }

    pub fn load_bool(b: bool) -> Self {
        Instruction::LoadConst(Constant::Boolean(b))
    }

    pub fn load_none() -> Self {
        Instruction::LoadConst(Constant::None)
    }

    pub fn load_name(name: impl Into<String>) -> Self {
        Instruction::LoadName(name.into())
    }

    pub fn store_name(name: impl Into<String>) -> Self {
        Instruction::StoreName(name.into())
    }

    /// Number of stack operands the instruction consumes before doing anything else.
    pub fn operands(&self) -> usize {
        match self {
            Instruction::LoadConst(_) | Instruction::LoadName(_) | Instruction::ReturnValue => 0,
            Instruction::StoreName(_) | Instruction::PopTop => 1,
            Instruction::CallFunction(argc) => *argc as usize + 1,
            Instruction::CallFunctionKw(argc) => *argc as usize + 2,
            Instruction::BuildList(n) => *n as usize,
            Instruction::BinaryOperation(_) => 2,
        }
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Instruction::LoadConst(_) => "LOAD_CONST",
            Instruction::LoadName(_) => "LOAD_NAME",
            Instruction::StoreName(_) => "STORE_NAME",
            Instruction::ReturnValue => "RETURN_VALUE",
            Instruction::CallFunction(_) => "CALL_FUNCTION",
            Instruction::CallFunctionKw(_) => "CALL_FUNCTION_KW",
            Instruction::PopTop => "POP_TOP",
            Instruction::BuildList(_) => "BUILD_LIST",
            Instruction::BinaryOperation(op) => op.mnemonic(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mnemonic = self.mnemonic();
        match self {
            Instruction::LoadConst(c) => write!(f, "{mnemonic} {c}"),
            Instruction::LoadName(name) | Instruction::StoreName(name) => write!(f, "{mnemonic} {name}"),
            Instruction::CallFunction(n) | Instruction::CallFunctionKw(n) | Instruction::BuildList(n) => {
                write!(f, "{mnemonic} {n}")
            }
            Instruction::BinaryOperation(op) if op.is_comparison() => write!(f, "{mnemonic} {op}"),
            Instruction::BinaryOperation(_) | Instruction::ReturnValue | Instruction::PopTop => {
                f.write_str(mnemonic)
            }
        }
    }
}

/// Serde adapter for big integers: writes decimal strings, reads strings or plain integers.
mod decimal {
    use std::fmt;

    use num_bigint::BigInt;
    use serde::{
        Deserializer, Serializer,
        de::{self, Unexpected, Visitor},
    };

    pub fn serialize<S>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigInt, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DecimalVisitor)
    }

    struct DecimalVisitor;

    impl Visitor<'_> for DecimalVisitor {
        type Value = BigInt;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer or a decimal integer string")
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<BigInt, E> {
            Ok(BigInt::from(v))
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<BigInt, E> {
            super::parse_int_literal(v).ok_or_else(|| E::invalid_value(Unexpected::Str(v), &self))
        }
    }
}

/// Parse a decimal integer literal, allowing a sign and `_` digit separators.
pub fn parse_int_literal(raw: &str) -> Option<BigInt> {
    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }
    if !digits.chars().all(|c| c.is_ascii_digit() || c == '_') {
        return None;
    }
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    format!("{sign}{cleaned}").parse().ok()
}
