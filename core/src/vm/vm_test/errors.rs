use super::*;

#[test]
fn pop_on_empty_stack_fails() {
    assert_eq!(run(&[Instruction::PopTop, Instruction::ReturnValue]), Err(VmError::underflow(1, 0)));
    assert_eq!(
        run(&[Instruction::store_name("x"), Instruction::ReturnValue]),
        Err(VmError::underflow(1, 0))
    );
}

#[test]
fn binary_op_with_one_operand_underflows() {
    let err = run(&[
        Instruction::load_int(1),
        Instruction::BinaryOperation(BinaryOp::Add),
        Instruction::ReturnValue,
    ])
    .unwrap_err();
    assert_eq!(err, VmError::underflow(2, 1));
    assert!(!err.is_recoverable());
}

#[test]
fn build_list_past_the_bottom_underflows() {
    let err = run(&[Instruction::load_int(1), Instruction::BuildList(2), Instruction::ReturnValue]).unwrap_err();
    assert_eq!(err, VmError::underflow(2, 1));
}

#[test]
fn unbound_name_fails() {
    let err = run(&[Instruction::load_name("never_stored"), Instruction::ReturnValue]).unwrap_err();
    assert_eq!(
        err,
        VmError::UnboundName {
            name: "never_stored".into()
        }
    );
    assert_eq!(err.to_string(), "name 'never_stored' is not defined");
}

#[test]
fn falling_off_the_end_fails() {
    assert_eq!(run(&[]), Err(VmError::MissingReturn { pc: 0 }));
    assert_eq!(
        run(&[Instruction::load_int(1), Instruction::PopTop]),
        Err(VmError::MissingReturn { pc: 2 })
    );
}

#[test]
fn arithmetic_on_non_int_is_a_type_mismatch() {
    let err = run(&[
        Instruction::load_int(1),
        Instruction::load_str("1"),
        Instruction::BinaryOperation(BinaryOp::Add),
        Instruction::ReturnValue,
    ])
    .unwrap_err();
    assert_eq!(
        err,
        VmError::TypeMismatch {
            expected: Tag::Int,
            found: Tag::String
        }
    );

    let err = run(&[
        Instruction::load_none(),
        Instruction::load_int(1),
        Instruction::BinaryOperation(BinaryOp::Multiply),
        Instruction::ReturnValue,
    ])
    .unwrap_err();
    assert_eq!(
        err,
        VmError::TypeMismatch {
            expected: Tag::Int,
            found: Tag::None
        }
    );
}

#[test]
fn unsupported_operators_are_reported() {
    for op in [BinaryOp::Divide, BinaryOp::Less, BinaryOp::NotEqual] {
        let err = run(&[
            Instruction::load_int(4),
            Instruction::load_int(2),
            Instruction::BinaryOperation(op),
            Instruction::ReturnValue,
        ])
        .unwrap_err();
        assert_eq!(err, VmError::UnsupportedOperator { op });
    }
}

#[test]
fn division_by_zero_is_reported() {
    let err = run(&[
        Instruction::load_int(4),
        Instruction::load_int(0),
        Instruction::BinaryOperation(BinaryOp::FloorDivide),
        Instruction::ReturnValue,
    ])
    .unwrap_err();
    assert_eq!(err, VmError::ZeroDivision);
}

#[test]
fn calling_a_non_function_fails() {
    let err = run(&[
        Instruction::load_int(1),
        Instruction::load_int(2),
        Instruction::CallFunction(1),
        Instruction::ReturnValue,
    ])
    .unwrap_err();
    assert_eq!(err, VmError::NotCallable { found: Tag::Int });
    assert_eq!(err.to_string(), "'int' object is not callable");
}

#[test]
fn call_without_callee_underflows() {
    let err = run(&[Instruction::load_int(1), Instruction::CallFunction(1), Instruction::ReturnValue]).unwrap_err();
    assert_eq!(err, VmError::underflow(2, 1));
}

#[test]
fn allocation_limit_is_recoverable() {
    let config = VmConfig {
        arena: ArenaConfig {
            capacity: 0,
            limit: Some(0),
        },
        trace: false,
    };
    let mut out = Vec::new();
    let err = Vm::with_config(config)
        .run_with_output(&[Instruction::load_int(1), Instruction::ReturnValue], &mut out)
        .unwrap_err();
    assert!(matches!(err, VmError::AllocationFailed { .. }), "{err:?}");
    assert!(err.is_recoverable());
}

#[test]
fn limit_applies_with_a_nonzero_capacity() {
    let config = VmConfig {
        arena: ArenaConfig {
            capacity: 16 * 1024,
            limit: Some(64),
        },
        trace: false,
    };
    let items: Vec<Instruction> = (0..32).map(Instruction::load_int).collect();
    let program = [items, vec![Instruction::BuildList(32), Instruction::ReturnValue]].concat();
    let mut out = Vec::new();
    let err = Vm::with_config(config).run_with_output(&program, &mut out).unwrap_err();
    assert!(matches!(err, VmError::AllocationFailed { .. }), "{err:?}");
}

#[test]
fn oversized_power_respects_the_arena_limit() {
    let config = VmConfig {
        arena: ArenaConfig {
            capacity: 1024,
            limit: Some(1024),
        },
        trace: false,
    };
    let program = [
        Instruction::load_int(3),
        Instruction::load_int(50_000),
        Instruction::BinaryOperation(BinaryOp::Power),
        Instruction::ReturnValue,
    ];
    let mut out = Vec::new();
    let err = Vm::with_config(config).run_with_output(&program, &mut out).unwrap_err();
    assert!(matches!(err, VmError::AllocationFailed { bytes } if bytes > 1024), "{err:?}");

    let huge = [
        Instruction::load_int(3),
        Instruction::load_int(50_000_000),
        Instruction::BinaryOperation(BinaryOp::Power),
        Instruction::ReturnValue,
    ];
    assert!(matches!(run(&huge), Err(VmError::AllocationFailed { .. })));
}

#[test]
fn borrowed_strings_fit_in_an_empty_arena() {
    let config = VmConfig {
        arena: ArenaConfig {
            capacity: 0,
            limit: Some(0),
        },
        trace: false,
    };
    let mut out = Vec::new();
    let outcome = Vm::with_config(config)
        .run_with_output(
            &[Instruction::load_str("no copy"), Instruction::load_none(), Instruction::ReturnValue],
            &mut out,
        )
        .unwrap();
    assert_eq!(outcome.arena_bytes, 0);
    assert_eq!(outcome.return_value(), Some(&OwnedValue::None));
}
