use num_bigint::BigInt;

use super::*;

#[test]
fn load_const_then_return_leaves_one_int() {
    let outcome = run(&[Instruction::load_int(42), Instruction::ReturnValue]).unwrap();
    assert_eq!(outcome.stack, vec![OwnedValue::from(42i64)]);
    assert_eq!(outcome.steps, 2);
}

#[test]
fn every_constant_kind_loads() {
    let outcome = run(&[
        Instruction::load_str("hi"),
        Instruction::load_bool(true),
        Instruction::load_none(),
        Instruction::load_int(-7),
        Instruction::ReturnValue,
    ])
    .unwrap();
    assert_eq!(
        outcome.stack,
        vec![
            OwnedValue::from("hi"),
            OwnedValue::Bool(true),
            OwnedValue::None,
            OwnedValue::from(-7i64),
        ]
    );
}

#[test]
fn store_name_last_write_wins() {
    let value = returned(&[
        Instruction::load_int(1),
        Instruction::store_name("x"),
        Instruction::load_str("second"),
        Instruction::store_name("x"),
        Instruction::load_name("x"),
        Instruction::ReturnValue,
    ]);
    assert_eq!(value, OwnedValue::from("second"));
}

#[test]
fn store_name_consumes_the_operand() {
    let outcome = run(&[
        Instruction::load_int(1),
        Instruction::load_int(2),
        Instruction::store_name("x"),
        Instruction::ReturnValue,
    ])
    .unwrap();
    assert_eq!(outcome.stack, vec![OwnedValue::from(1i64)]);
}

#[test]
fn load_name_does_not_consume_the_binding() {
    let outcome = run(&[
        Instruction::load_int(9),
        Instruction::store_name("x"),
        Instruction::load_name("x"),
        Instruction::load_name("x"),
        Instruction::ReturnValue,
    ])
    .unwrap();
    assert_eq!(outcome.stack, vec![OwnedValue::from(9i64), OwnedValue::from(9i64)]);
}

#[test]
fn build_list_keeps_push_order() {
    let value = returned(&[
        Instruction::load_str("a"),
        Instruction::load_str("b"),
        Instruction::load_str("c"),
        Instruction::BuildList(3),
        Instruction::ReturnValue,
    ]);
    assert_eq!(value, OwnedValue::from(vec!["a", "b", "c"]));
}

#[test]
fn build_list_only_takes_count_items() {
    let outcome = run(&[
        Instruction::load_int(0),
        Instruction::load_int(1),
        Instruction::load_int(2),
        Instruction::BuildList(2),
        Instruction::BuildList(0),
        Instruction::ReturnValue,
    ])
    .unwrap();
    assert_eq!(
        outcome.stack,
        vec![
            OwnedValue::from(0i64),
            OwnedValue::from(vec![1i64, 2]),
            OwnedValue::List(Vec::new()),
        ]
    );
}

#[test]
fn nested_lists_share_their_elements() {
    let value = returned(&[
        Instruction::load_int(1),
        Instruction::BuildList(1),
        Instruction::store_name("inner"),
        Instruction::load_name("inner"),
        Instruction::load_name("inner"),
        Instruction::BuildList(2),
        Instruction::ReturnValue,
    ]);
    assert_eq!(value.to_string(), "[[1], [1]]");
}

#[test]
fn add_and_subtract_use_push_order() {
    let add = returned(&[
        Instruction::load_int(5),
        Instruction::load_int(3),
        Instruction::BinaryOperation(BinaryOp::Add),
        Instruction::ReturnValue,
    ]);
    assert_eq!(add, OwnedValue::from(8i64));

    let sub = returned(&[
        Instruction::load_int(5),
        Instruction::load_int(3),
        Instruction::BinaryOperation(BinaryOp::Subtract),
        Instruction::ReturnValue,
    ]);
    assert_eq!(sub, OwnedValue::from(2i64));
}

#[test]
fn multiplication_is_exact_past_machine_width() {
    let two_100 = BigInt::from(2).pow(100u32);
    let value = returned(&[
        Instruction::load_int(two_100.clone()),
        Instruction::load_int(two_100),
        Instruction::BinaryOperation(BinaryOp::Multiply),
        Instruction::ReturnValue,
    ]);
    assert_eq!(value, OwnedValue::Int(BigInt::from(2).pow(200u32)));
}

#[test]
fn floor_ops_follow_divisor_sign() {
    let program = |op| {
        vec![
            Instruction::load_int(-7),
            Instruction::load_int(2),
            Instruction::BinaryOperation(op),
            Instruction::ReturnValue,
        ]
    };
    assert_eq!(returned(&program(BinaryOp::FloorDivide)), OwnedValue::from(-4i64));
    assert_eq!(returned(&program(BinaryOp::Modulo)), OwnedValue::from(1i64));
    assert_eq!(returned(&program(BinaryOp::Power)), OwnedValue::from(49i64));
}

#[test]
fn pop_top_discards() {
    let outcome = run(&[
        Instruction::load_int(1),
        Instruction::load_int(2),
        Instruction::PopTop,
        Instruction::ReturnValue,
    ])
    .unwrap();
    assert_eq!(outcome.stack, vec![OwnedValue::from(1i64)]);
}

#[test]
fn return_stops_before_trailing_instructions() {
    let outcome = run(&[
        Instruction::load_int(1),
        Instruction::ReturnValue,
        Instruction::PopTop,
        Instruction::PopTop,
    ])
    .unwrap();
    assert_eq!(outcome.steps, 2);
    assert_eq!(outcome.stack.len(), 1);
}

#[test]
fn return_on_empty_stack_has_no_value() {
    let outcome = run(&[Instruction::ReturnValue]).unwrap();
    assert!(outcome.return_value().is_none());
}

#[test]
fn arena_usage_is_reported() {
    let outcome = run(&[
        Instruction::load_int(BigInt::from(2).pow(100u32)),
        Instruction::load_str("borrowed"),
        Instruction::BuildList(2),
        Instruction::ReturnValue,
    ])
    .unwrap();
    // Four digits for the integer and two handles for the list.
    let expected = 4 * std::mem::size_of::<u32>() + 2 * std::mem::size_of::<Value<'static>>();
    assert_eq!(outcome.arena_bytes, expected);
}

#[test]
fn runs_are_independent() {
    let vm = Vm::new();
    let mut out = Vec::new();
    let first = vm
        .run_with_output(&[Instruction::load_int(1), Instruction::store_name("x"), Instruction::ReturnValue], &mut out)
        .unwrap();
    assert!(first.stack.is_empty());
    let second = vm.run_with_output(&[Instruction::load_name("x"), Instruction::ReturnValue], &mut out);
    assert_eq!(second, Err(VmError::UnboundName { name: "x".into() }));
}

#[test]
fn interpreter_exposes_scope_after_execute() {
    let program = vec![
        Instruction::load_int(3),
        Instruction::store_name("a"),
        Instruction::load_str("s"),
        Instruction::store_name("b"),
        Instruction::ReturnValue,
    ];
    let arena = Arena::default();
    let mut out = Vec::new();
    let registry = PrimitiveRegistry::new();
    let mut interp = Interpreter::new(&arena, &mut out, &registry).unwrap();
    interp.execute(&program).unwrap();
    assert!(!interp.is_running());
    assert_eq!(interp.pc(), 5);
    assert_eq!(interp.scope().names(), vec!["a", "b"]);
    assert_eq!(interp.scope().load("b").unwrap(), Value::Str("s"));
    assert!(interp.stack().is_empty());
}

#[test]
fn traced_run_matches_untraced() {
    let program = [
        Instruction::load_int(6),
        Instruction::load_int(7),
        Instruction::BinaryOperation(BinaryOp::Multiply),
        Instruction::ReturnValue,
    ];
    let config = VmConfig {
        trace: true,
        ..VmConfig::default()
    };
    let mut out = Vec::new();
    let traced = Vm::with_config(config).run_with_output(&program, &mut out).unwrap();
    assert_eq!(traced, run(&program).unwrap());
}
