use std::io::{self, Write};

use tracing::debug;

use crate::config::VmConfig;
use crate::error::VmError;

use super::alloc::Arena;
use super::bytecode::Instruction;
use super::interp::{Interpreter, RunOutcome};
use super::native::PrimitiveRegistry;

/// Entry point for executing instruction streams.
///
/// A `Vm` only holds configuration and the primitive table. Each call to [`Vm::run`] builds
/// a fresh arena, stack and scope, and drops the arena when the call returns on any path,
/// so one `Vm` can serve any number of independent runs.
#[derive(Debug, Clone, Default)]
pub struct Vm {
    config: VmConfig,
    primitives: PrimitiveRegistry,
}

impl Vm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self {
            config,
            primitives: PrimitiveRegistry::new(),
        }
    }

    pub fn with_primitives(mut self, primitives: PrimitiveRegistry) -> Self {
        self.primitives = primitives;
        self
    }

    pub fn config(&self) -> &VmConfig {
        &self.config
    }

    pub fn primitives(&self) -> &PrimitiveRegistry {
        &self.primitives
    }

    pub fn primitives_mut(&mut self) -> &mut PrimitiveRegistry {
        &mut self.primitives
    }

    /// Run `program`, sending program output to stdout.
    pub fn run(&self, program: &[Instruction]) -> Result<RunOutcome, VmError> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        let outcome = self.run_with_output(program, &mut out);
        out.flush()?;
        outcome
    }

    /// Run `program`, sending program output to `out`.
    pub fn run_with_output<W: Write>(&self, program: &[Instruction], out: &mut W) -> Result<RunOutcome, VmError> {
        let arena = Arena::new(self.config.arena);
        debug!(
            target: "pyrite::vm",
            instructions = program.len(),
            primitives = self.primitives.len(),
            "run.start"
        );
        let result = {
            let mut interp = Interpreter::new(&arena, out, &self.primitives)?.with_trace(self.config.trace);
            interp.execute(program).map(|()| interp.outcome())
        };
        match &result {
            Ok(outcome) => debug!(
                target: "pyrite::vm",
                steps = outcome.steps,
                arena_bytes = outcome.arena_bytes,
                reserved_bytes = arena.reserved_bytes(),
                "run.finish"
            ),
            Err(err) => debug!(
                target: "pyrite::vm",
                error = %err,
                arena_bytes = arena.used_bytes(),
                "run.abort"
            ),
        }
        result
    }
}
