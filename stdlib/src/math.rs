use std::cmp::Ordering;

use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};
use pyrite_core::{
    VmError,
    val::Value,
    vm::{BinaryOp, Interpreter, Kwargs, eval_binary},
};

use crate::args::{expect_arity, int_arg, keyword_values, reject_kwargs};
use crate::list::{expect_list, items_of};

fn push_int<'a>(interp: &mut Interpreter<'a>, n: &BigInt) -> Result<(), VmError> {
    let value = Value::int(interp.arena(), n)?;
    interp.push(value);
    Ok(())
}

/// `abs(n)`
pub fn abs<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], kwargs: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    reject_kwargs("abs", kwargs)?;
    expect_arity("abs", args, 1, 1)?;
    let n = int_arg(&args[0])?;
    push_int(interp, &n.abs())
}

/// `min(a, b, ...)` or `min(list[, default=x])`
pub fn min<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], kwargs: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    extremum("min", Ordering::Less, interp, args, kwargs)
}

/// `max(a, b, ...)` or `max(list[, default=x])`
pub fn max<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], kwargs: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    extremum("max", Ordering::Greater, interp, args, kwargs)
}

/// Push the first item that compares `wanted` against every other. The item's handle is
/// pushed as is, not re-allocated.
fn extremum<'a>(
    name: &'static str,
    wanted: Ordering,
    interp: &mut Interpreter<'a>,
    args: &[Value<'a>],
    kwargs: Option<&Kwargs<'a>>,
) -> Result<(), VmError> {
    let [default] = keyword_values(name, kwargs, ["default"])?;
    expect_arity(name, args, 1, usize::MAX)?;
    if args.len() == 1 {
        expect_list(name, &args[0])?;
    } else if default.is_some() {
        return Err(VmError::primitive(
            name,
            "cannot specify a default with multiple positional arguments",
        ));
    }

    let mut best: Option<(Value<'a>, BigInt)> = None;
    for item in items_of(args) {
        let n = int_arg(item)?;
        let replace = match &best {
            Some((_, current)) => n.cmp(current) == wanted,
            None => true,
        };
        if replace {
            best = Some((*item, n));
        }
    }

    match (best, default) {
        (Some((value, _)), _) | (None, Some(value)) => {
            interp.push(value);
            Ok(())
        }
        (None, None) => Err(VmError::primitive(name, "arg is an empty sequence")),
    }
}

/// `sum(list, start=0)`
pub fn sum<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], kwargs: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    let [start_kw] = keyword_values("sum", kwargs, ["start"])?;
    expect_arity("sum", args, 1, 2)?;
    let start = match (args.get(1), start_kw.as_ref()) {
        (Some(_), Some(_)) => {
            return Err(VmError::primitive("sum", "argument for sum() given by name ('start') and position"));
        }
        (Some(v), None) | (None, Some(v)) => int_arg(v)?,
        (None, None) => BigInt::zero(),
    };

    let mut total = start;
    for item in expect_list("sum", &args[0])? {
        total = eval_binary(BinaryOp::Add, &total, &int_arg(item)?)?;
    }
    push_int(interp, &total)
}

/// `pow(base, exp[, mod])`
///
/// With a modulus the result lies between zero and the modulus, taking the modulus' sign.
pub fn pow<'a>(interp: &mut Interpreter<'a>, args: &[Value<'a>], kwargs: Option<&Kwargs<'a>>) -> Result<(), VmError> {
    let [base_kw, exp_kw, mod_kw] = keyword_values("pow", kwargs, ["base", "exp", "mod"])?;
    expect_arity("pow", args, 0, 3)?;
    let base = positional_or_keyword("pow", "base", args.first(), base_kw)?;
    let exp = positional_or_keyword("pow", "exp", args.get(1), exp_kw)?;
    let modulus = match (args.get(2), mod_kw.as_ref()) {
        (Some(_), Some(_)) => return Err(VmError::primitive("pow", "argument 'mod' given by name and position")),
        (Some(v), None) | (None, Some(v)) => match v {
            Value::None => None,
            other => Some(int_arg(other)?),
        },
        (None, None) => None,
    };

    let result = match modulus {
        None => eval_binary(BinaryOp::Power, &base, &exp)?,
        Some(m) => {
            if m.is_zero() {
                return Err(VmError::primitive("pow", "3rd argument cannot be 0"));
            }
            if exp.sign() == Sign::Minus {
                return Err(VmError::primitive("pow", "negative exponent with a modulus is not supported"));
            }
            base.modpow(&exp, &m)
        }
    };
    push_int(interp, &result)
}

fn positional_or_keyword(
    name: &'static str,
    key: &str,
    positional: Option<&Value<'_>>,
    keyword: Option<Value<'_>>,
) -> Result<BigInt, VmError> {
    match (positional, keyword) {
        (Some(_), Some(_)) => Err(VmError::primitive(
            name,
            format!("argument '{key}' given by name and position"),
        )),
        (Some(v), None) => int_arg(v),
        (None, Some(v)) => int_arg(&v),
        (None, None) => Err(VmError::primitive(name, format!("missing required argument '{key}'"))),
    }
}
