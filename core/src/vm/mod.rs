//! Stack bytecode VM
//!
//! Instruction definitions, the per-run arena, operand stack, name scope and the
//! dispatcher that ties them together. [`Vm`] is the entry point most callers want.

mod alloc;
mod arith;
mod asm;
mod bytecode;
mod call;
mod interp;
mod native;
mod program;
mod scope;
mod stack;
#[allow(clippy::module_inception)]
mod vm;

pub use alloc::{Arena, ArenaConfig, DEFAULT_ARENA_CAPACITY};
pub use arith::eval_binary;
pub use asm::{assemble, disassemble};
pub use bytecode::*;
pub use interp::{Interpreter, RunOutcome};
pub use native::*;
pub use program::*;
pub use scope::Scope;
pub use stack::Stack;
pub use vm::Vm;

#[cfg(test)]
mod vm_test;
