
use pyrite_core::{
    VmError,
    val::Value,
    vm::{Interpreter, Kwargs},
};

use crate::args::keyword_values;

const DEFAULT_SEP: &str = " ";
const DEFAULT_END: &str = "\n";

/// `print(*args, sep=' ', end='\n')`
///
/// Writes each argument's `str()` form to the interpreter's output sink and pushes `None`.
/// `sep` and `end` accept a string or `None`, which selects the default.
pub fn print<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], kwargs: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    let [sep, end] = keyword_values("print", kwargs, ["sep", "end"])?;
    let sep = text_option("sep", sep, DEFAULT_SEP)?;
    let end = text_option("end", end, DEFAULT_END)?;

    let mut line = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            line.push_str(sep);
        }
        line.push_str(&arg.display_string());
    }
    line.push_str(end);

    let out = interp.out();
    out.write_all(line.as_bytes())?;
    interp.push(Value::None);
    Ok(())
}

fn text_option<'a>(key: &'static str, value: Option<Value<'a>>, default: &'a str) -> Result<&'a str, VmError> {
    match value {
        None | Some(Value::None) => Ok(default),
        Some(Value::Str(s)) => Ok(s),
        Some(other) => Err(VmError::primitive(
            "print",
            format!("{key} must be None or a string, not {}", other.tag()),
        )),
    }
}

