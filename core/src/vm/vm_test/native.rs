
use super::*;

/// Pushes its positional arguments back as a list.
fn collect<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], _: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    let list = Value::list(interp.arena(), args)?;
    interp.push(list);
    Ok(())
}

/// Pushes `[positional, [[name, value], ...]]`.
fn collect_kw<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], kwargs: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    let arena = interp.arena();
    let mut pairs = Vec::new();
    for &(name, value) in kwargs.unwrap_or_default() {
        pairs.push(Value::list(arena, &[Value::Str(name), value])?);
    }
    let result = Value::list(arena, &[Value::list(arena, args)?, Value::list(arena, &pairs)?])?;
    interp.push(result);
    Ok(())
}

fn pc_probe<'a>(interp: &mut Interpreter<'a>, _: &[Value<'a>], _: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    let pc = Value::small_int(interp.arena(), interp.pc() as i64)?;
    interp.push(pc);
    Ok(())
}

/// `define(name, value)` binds a global and pushes nothing.
fn define<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], _: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    let [name, value] = args else {
        return Err(VmError::primitive("define", "expected 2 arguments"));
    };
    let name = name.as_str()?;
    interp.scope_mut().store(name, *value);
    Ok(())
}

fn shout<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], _: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    for arg in args {
        writeln!(interp.out(), "{}!", arg.display_string())?;
    }
    interp.push(Value::None);
    Ok(())
}

fn fail<'a>(_: &mut Interpreter<'a>, _: &[Value<'a>], _: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    Err(VmError::primitive("fail", "always fails"))
}

fn registry() -> PrimitiveRegistry {
    let mut registry = PrimitiveRegistry::new();
    registry
        .register("collect", collect)
        .register("collect_kw", collect_kw)
        .register("pc_probe", pc_probe)
        .register("define", define)
        .register("shout", shout)
        .register("fail", fail);
    registry
}

#[test]
fn call_function_passes_args_in_push_order() {
    let (result, _) = run_with(
        registry(),
        &[
            Instruction::load_name("collect"),
            Instruction::load_str("A"),
            Instruction::load_int(2),
            Instruction::CallFunction(2),
            Instruction::ReturnValue,
        ],
    );
    let outcome = result.unwrap();
    assert_eq!(outcome.stack, vec![OwnedValue::from(vec![OwnedValue::from("A"), OwnedValue::from(2i64)])]);
}

#[test]
fn call_with_no_args() {
    let (result, _) = run_with(
        registry(),
        &[Instruction::load_name("collect"), Instruction::CallFunction(0), Instruction::ReturnValue],
    );
    assert_eq!(result.unwrap().stack, vec![OwnedValue::List(Vec::new())]);
}

#[test]
fn keyword_call_splits_trailing_values() {
    let (result, _) = run_with(
        registry(),
        &[
            Instruction::load_name("collect_kw"),
            Instruction::load_int(1),
            Instruction::load_str("dash"),
            Instruction::load_bool(false),
            Instruction::load_str("sep"),
            Instruction::load_str("flush"),
            Instruction::BuildList(2),
            Instruction::CallFunctionKw(3),
            Instruction::ReturnValue,
        ],
    );
    let value = result.unwrap().return_value().cloned().unwrap();
    assert_eq!(value.to_string(), "[[1], [['sep', 'dash'], ['flush', False]]]");
}

#[test]
fn keyword_call_with_more_names_than_args_fails() {
    let (result, _) = run_with(
        registry(),
        &[
            Instruction::load_name("collect_kw"),
            Instruction::load_int(1),
            Instruction::load_str("a"),
            Instruction::load_str("b"),
            Instruction::BuildList(2),
            Instruction::CallFunctionKw(1),
            Instruction::ReturnValue,
        ],
    );
    assert_eq!(result, Err(VmError::KeywordArity { names: 2, argc: 1 }));
}

#[test]
fn keyword_names_must_be_strings() {
    let (result, _) = run_with(
        registry(),
        &[
            Instruction::load_name("collect_kw"),
            Instruction::load_int(1),
            Instruction::load_int(7),
            Instruction::BuildList(1),
            Instruction::CallFunctionKw(1),
            Instruction::ReturnValue,
        ],
    );
    assert_eq!(
        result,
        Err(VmError::TypeMismatch {
            expected: Tag::String,
            found: Tag::Int
        })
    );
}

#[test]
fn handler_sees_pc_of_next_instruction() {
    let (result, _) = run_with(
        registry(),
        &[
            Instruction::load_none(),
            Instruction::load_name("pc_probe"),
            Instruction::CallFunction(0),
            Instruction::ReturnValue,
        ],
    );
    assert_eq!(result.unwrap().return_value(), Some(&OwnedValue::from(3i64)));
}

#[test]
fn primitives_may_bind_globals_and_push_nothing() {
    let (result, _) = run_with(
        registry(),
        &[
            Instruction::load_name("define"),
            Instruction::load_str("flag"),
            Instruction::load_int(41),
            Instruction::CallFunction(2),
            Instruction::load_name("flag"),
            Instruction::ReturnValue,
        ],
    );
    assert_eq!(result.unwrap().stack, vec![OwnedValue::from(41i64)]);
}

#[test]
fn primitives_write_to_the_output_sink() {
    let (result, out) = run_with(
        registry(),
        &[
            Instruction::load_name("shout"),
            Instruction::load_str("hey"),
            Instruction::load_int(3),
            Instruction::CallFunction(2),
            Instruction::PopTop,
            Instruction::load_int(0),
            Instruction::ReturnValue,
        ],
    );
    assert!(result.is_ok());
    assert_eq!(out, "hey!\n3!\n");
}

#[test]
fn primitive_errors_abort_the_run() {
    let (result, _) = run_with(
        registry(),
        &[Instruction::load_name("fail"), Instruction::CallFunction(0), Instruction::ReturnValue],
    );
    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "fail(): always fails");
}

#[test]
fn primitives_can_be_shadowed_by_store_name() {
    let (result, _) = run_with(
        registry(),
        &[
            Instruction::load_int(5),
            Instruction::store_name("collect"),
            Instruction::load_name("collect"),
            Instruction::ReturnValue,
        ],
    );
    assert_eq!(result.unwrap().return_value(), Some(&OwnedValue::from(5i64)));
}

#[test]
fn functions_are_first_class_values() {
    let (result, _) = run_with(
        registry(),
        &[
            Instruction::load_name("collect"),
            Instruction::store_name("alias"),
            Instruction::load_name("alias"),
            Instruction::load_name("alias"),
            Instruction::CallFunction(1),
            Instruction::ReturnValue,
        ],
    );
    assert_eq!(result.unwrap().return_value().unwrap().to_string(), "[<built-in function collect>]");
}

#[test]
fn later_registration_replaces_earlier() {
    let mut registry = registry();
    registry.register("collect", fail);
    assert_eq!(registry.len(), 6);
    let (result, _) = run_with(
        registry,
        &[Instruction::load_name("collect"), Instruction::CallFunction(0), Instruction::ReturnValue],
    );
    assert!(matches!(result, Err(VmError::Primitive { name: "fail", .. })));
}
