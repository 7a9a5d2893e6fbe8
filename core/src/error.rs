//! Errors raised while building or executing an instruction stream.

use std::io;

use thiserror::Error;

use crate::val::Tag;
use crate::vm::BinaryOp;

/// Result alias used throughout the VM.
pub type VmResult<T> = std::result::Result<T, VmError>;

/// Every way a run can fail.
///
/// Only [`VmError::AllocationFailed`] and [`VmError::Io`] are environmental. The remaining
/// variants mean the instruction stream was not well formed (or a primitive rejected its
/// arguments); the run is abandoned and its arena dropped, with no attempt to roll back the
/// stack or scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("arena allocation of {bytes} bytes failed")]
    AllocationFailed { bytes: usize },

    #[error("stack underflow: needed {needed} operand(s), {available} available")]
    StackUnderflow { needed: usize, available: usize },

    #[error("name '{name}' is not defined")]
    UnboundName { name: String },

    #[error("expected {expected}, found {found}")]
    TypeMismatch { expected: Tag, found: Tag },

    #[error("unsupported operand type(s) for {op}: 'int' and 'int'")]
    UnsupportedOperator { op: BinaryOp },

    #[error("line {line}: instruction {instr} is not implemented")]
    InstructionNotImplemented { instr: String, line: usize },

    #[error("'{found}' object is not callable")]
    NotCallable { found: Tag },

    #[error("keyword call names {names} keyword(s) but only {argc} argument(s) were supplied")]
    KeywordArity { names: usize, argc: usize },

    #[error("ran past the end of the instruction stream at pc {pc} without RETURN_VALUE")]
    MissingReturn { pc: usize },

    #[error("integer division or modulo by zero")]
    ZeroDivision,

    #[error("line {line}: {message}")]
    Assembly { line: usize, message: String },

    #[error("{name}(): {message}")]
    Primitive { name: &'static str, message: String },

    #[error("output error: {0}")]
    Io(String),
}

impl VmError {
    /// Shorthand for failures reported by host primitives.
    pub fn primitive(name: &'static str, message: impl Into<String>) -> Self {
        VmError::Primitive {
            name,
            message: message.into(),
        }
    }

    pub fn underflow(needed: usize, available: usize) -> Self {
        VmError::StackUnderflow { needed, available }
    }

    /// Whether the failure came from the environment rather than a malformed program.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, VmError::AllocationFailed { .. } | VmError::Io(_))
    }
}

impl From<io::Error> for VmError {
    fn from(err: io::Error) -> Self {
        VmError::Io(err.to_string())
    }
}
