//! Argument checks shared by the stdlib primitives.

use num_bigint::BigInt;
use pyrite_core::{VmError, val::Value, vm::Kwargs};

/// Fail unless `min <= args.len() <= max`.
pub fn expect_arity(name: &'static str, args: &[Value<'_>], min: usize, max: usize) -> Result<(), VmError> {
    let n = args.len();
    if (min..=max).contains(&n) {
        return Ok(());
    }
    let expected = if min == max {
        format!("exactly {min}")
    } else if max == usize::MAX {
        format!("at least {min}")
    } else {
        format!("from {min} to {max}")
    };
    let noun = if min == 1 && (min == max || max == usize::MAX) { "argument" } else { "arguments" };
    Err(VmError::primitive(name, format!("takes {expected} {noun} ({n} given)")))
}

pub fn reject_kwargs(name: &'static str, kwargs: Option<&Kwargs<'_>>) -> Result<(), VmError> {
    match kwargs.and_then(|kw| kw.first()) {
        Some((key, _)) => Err(unexpected_keyword(name, key)),
        None => Ok(()),
    }
}

/// Split keyword arguments against the `allowed` names. Each name may appear once.
pub fn keyword_values<'a, const N: usize>(
    name: &'static str,
    kwargs: Option<&Kwargs<'a>>,
    allowed: [&str; N],
) -> Result<[Option<Value<'a>>; N], VmError> {
    let mut found = [None; N];
    for &(key, value) in kwargs.unwrap_or_default() {
        let slot = allowed
            .iter()
            .position(|candidate| *candidate == key)
            .ok_or_else(|| unexpected_keyword(name, key))?;
        if found[slot].replace(value).is_some() {
            return Err(VmError::primitive(
                name,
                format!("got multiple values for keyword argument '{key}'"),
            ));
        }
    }
    Ok(found)
}

pub fn unexpected_keyword(name: &'static str, key: &str) -> VmError {
    VmError::primitive(name, format!("'{key}' is an invalid keyword argument"))
}

pub fn int_arg(value: &Value<'_>) -> Result<BigInt, VmError> {
    Ok(value.as_int()?.to_bigint())
}
