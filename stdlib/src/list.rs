use num_bigint::BigInt;
use pyrite_core::{
    VmError,
    val::Value,
    vm::{Interpreter, Kwargs},
};

use crate::args::{expect_arity, reject_kwargs};

/// `len(x)`: number of items in a list, or of characters in a string.
pub fn len<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], kwargs: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    reject_kwargs("len", kwargs)?;
    expect_arity("len", args, 1, 1)?;
    let n = match args[0] {
        Value::List(items) => items.len(),
        Value::Str(s) => s.chars().count(),
        other => {
            return Err(VmError::primitive(
                "len",
                format!("object of type '{}' has no len()", other.tag()),
            ));
        }
    };
    let value = Value::int(interp.arena(), &BigInt::from(n))?;
    interp.push(value);
    Ok(())
}

/// Items to iterate for `min`/`max`/`sum`: a single list argument is unpacked.
pub(crate) fn items_of<'a, 'b>(args: &'b [Value<'a>]) -> &'b [Value<'a>] {
    match args {
        [Value::List(items)] => *items,
        _ => args,
    }
}

pub(crate) fn expect_list<'a>(name: &'static str, value: &Value<'a>) -> Result<&'a [Value<'a>], VmError> {
    value.as_list().map_err(|_| {
        VmError::primitive(name, format!("'{}' object is not iterable", value.tag()))
    })
}

