use pyrite_core::{
    VmError,
    val::Value,
    vm::{Interpreter, Kwargs},
};

use crate::args::{expect_arity, reject_kwargs};

/// `str(x='')`: the display form; strings come back unchanged.
pub fn str<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], kwargs: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    reject_kwargs("str", kwargs)?;
    expect_arity("str", args, 0, 1)?;
    let value = match args.first() {
        None => Value::Str(""),
        Some(&Value::Str(s)) => Value::Str(s),
        Some(other) => Value::string(interp.arena(), &other.display_string())?,
    };
    interp.push(value);
    Ok(())
}

/// `repr(x)`
pub fn repr<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], kwargs: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    reject_kwargs("repr", kwargs)?;
    expect_arity("repr", args, 1, 1)?;
    let value = Value::string(interp.arena(), &args[0].to_string())?;
    interp.push(value);
    Ok(())
}

/// `bool(x=False)`
pub fn bool<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], kwargs: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    reject_kwargs("bool", kwargs)?;
    expect_arity("bool", args, 0, 1)?;
    let truthy = args.first().is_some_and(Value::is_truthy);
    interp.push(Value::Bool(truthy));
    Ok(())
}
