use std::io::Write;

use tracing::trace;

use crate::error::VmError;
use crate::val::{OwnedValue, Value};

use super::alloc::Arena;
use super::bytecode::{Constant, Instruction};
use super::native::PrimitiveRegistry;
use super::scope::Scope;
use super::stack::Stack;

/// Snapshot of a finished run, detached from its arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    /// Stack contents at `RETURN_VALUE`, bottom first.
    pub stack: Vec<OwnedValue>,
    /// Instructions executed.
    pub steps: u64,
    /// Arena high-water mark in bytes.
    pub arena_bytes: usize,
}

impl RunOutcome {
    /// The value `RETURN_VALUE` saw on top of the stack.
    pub fn return_value(&self) -> Option<&OwnedValue> {
        self.stack.last()
    }
}

/// Mutable state of one run: stack, scope, program counter and the arena everything lives in.
///
/// An interpreter is driven by exactly one caller at a time and is never shared. Primitive
/// functions receive `&mut Interpreter` and may touch any of it.
pub struct Interpreter<'a> {
    arena: &'a Arena,
    stack: Stack<'a>,
    scope: Scope<'a>,
    out: &'a mut dyn Write,
    pc: usize,
    running: bool,
    steps: u64,
    trace: bool,
}

impl<'a> Interpreter<'a> {
    /// Build an interpreter whose scope already holds every primitive in `registry`.
    pub fn new(arena: &'a Arena, out: &'a mut dyn Write, registry: &PrimitiveRegistry) -> Result<Self, VmError> {
        let mut scope = Scope::with_capacity(registry.len());
        for primitive in registry.iter() {
            scope.store(primitive.name, Value::function(arena, *primitive)?);
        }
        Ok(Self {
            arena,
            stack: Stack::new(),
            scope,
            out,
            pc: 0,
            running: false,
            steps: 0,
            trace: false,
        })
    }

    pub fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    #[inline]
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    pub fn stack(&self) -> &Stack<'a> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut Stack<'a> {
        &mut self.stack
    }

    pub fn scope(&self) -> &Scope<'a> {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope<'a> {
        &mut self.scope
    }

    /// Sink for program output (what `print` writes to).
    pub fn out(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    #[inline]
    pub fn push(&mut self, value: Value<'a>) {
        self.stack.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> Result<Value<'a>, VmError> {
        self.stack.pop()
    }

    /// Index of the next instruction to fetch.
    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Fetch-decode-execute until `RETURN_VALUE`.
    ///
    /// The program counter is advanced before the handler runs, so a handler that observes
    /// `pc()` sees the index of the following instruction.
    pub fn execute(&mut self, program: &'a [Instruction]) -> Result<(), VmError> {
        self.pc = 0;
        self.running = true;
        while self.running {
            let Some(instr) = program.get(self.pc) else {
                self.running = false;
                return Err(VmError::MissingReturn { pc: self.pc });
            };
            if self.trace {
                trace!(
                    target: "pyrite::vm::dispatch",
                    pc = self.pc,
                    depth = self.stack.len(),
                    arena_bytes = self.arena.used_bytes(),
                    instr = %instr,
                    "dispatch"
                );
            }
            self.pc += 1;
            self.steps += 1;
            if let Err(err) = self.dispatch(instr) {
                self.running = false;
                return Err(err);
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, instr: &'a Instruction) -> Result<(), VmError> {
        match instr {
            Instruction::LoadConst(constant) => {
                let value = self.load_const(constant)?;
                self.stack.push(value);
            }
            Instruction::LoadName(name) => {
                let value = self.scope.load(name)?;
                self.stack.push(value);
            }
            Instruction::StoreName(name) => {
                let value = self.stack.pop()?;
                self.scope.store(name.as_str(), value);
            }
            Instruction::ReturnValue => self.running = false,
            Instruction::CallFunction(argc) => self.call_function(*argc as usize)?,
            Instruction::CallFunctionKw(argc) => self.call_function_kw(*argc as usize)?,
            Instruction::PopTop => {
                self.stack.pop()?;
            }
            Instruction::BuildList(count) => {
                let items = self.stack.pop_n(*count as usize)?;
                let list = Value::list(self.arena, &items)?;
                self.stack.push(list);
            }
            Instruction::BinaryOperation(op) => self.binary_op(*op)?,
        }
        Ok(())
    }

    /// String constants are borrowed from the instruction stream rather than copied.
    fn load_const(&self, constant: &'a Constant) -> Result<Value<'a>, VmError> {
        match constant {
            Constant::Integer(n) => Value::int(self.arena, n),
            Constant::String(s) => Ok(Value::Str(s.as_str())),
            Constant::Boolean(b) => Ok(Value::Bool(*b)),
            Constant::None => Ok(Value::None),
        }
    }

    /// Detach the current stack from the arena.
    pub fn outcome(&self) -> RunOutcome {
        RunOutcome {
            stack: self.stack.as_slice().iter().map(Value::to_owned_value).collect(),
            steps: self.steps,
            arena_bytes: self.arena.used_bytes(),
        }
    }
}
