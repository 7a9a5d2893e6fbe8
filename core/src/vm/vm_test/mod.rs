pub(super) use crate::{
    error::VmError,
    val::{OwnedValue, Tag, Value},
    vm::{
        Arena, ArenaConfig, BinaryOp, Instruction, Interpreter, Kwargs, PrimitiveRegistry, RunOutcome, Vm,
    },
    VmConfig,
};

pub(super) fn run(program: &[Instruction]) -> Result<RunOutcome, VmError> {
    run_with(PrimitiveRegistry::new(), program).0
}

/// Run with `primitives` installed, capturing everything written to the output sink.
pub(super) fn run_with(primitives: PrimitiveRegistry, program: &[Instruction]) -> (Result<RunOutcome, VmError>, String) {
    let vm = Vm::new().with_primitives(primitives);
    let mut out = Vec::new();
    let result = vm.run_with_output(program, &mut out);
    (result, String::from_utf8(out).expect("utf-8 output"))
}

pub(super) fn returned(program: &[Instruction]) -> OwnedValue {
    let outcome = run(program).expect("run");
    outcome.return_value().cloned().expect("value on stack")
}

mod errors;
mod native;
mod semantics;
