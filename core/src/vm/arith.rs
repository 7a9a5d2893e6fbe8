use std::mem;

use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_traits::{ToPrimitive, Zero};
use tracing::debug;

use crate::error::VmError;
use crate::val::Value;

use super::Interpreter;
use super::bytecode::BinaryOp;

impl<'a> Interpreter<'a> {
    /// `BINARY_*`: pop `x` (right) then `y` (left), push `y op x`.
    pub(super) fn binary_op(&mut self, op: BinaryOp) -> Result<(), VmError> {
        self.stack_mut().require(2)?;
        let x = self.pop()?;
        let y = self.pop()?;
        let rhs = x.as_int()?.to_bigint();
        let lhs = y.as_int()?.to_bigint();
        if op == BinaryOp::Power {
            if let Some(exp) = power_exponent(&rhs) {
                self.arena().ensure_room(power_result_bytes(&lhs, exp))?;
            }
        }
        let result = eval_binary(op, &lhs, &rhs)?;
        let value = Value::int(self.arena(), &result)?;
        self.push(value);
        Ok(())
    }
}

/// Largest `**` result, in digit bytes, computed outside a run's arena limit.
pub const MAX_POWER_RESULT_BYTES: usize = 1 << 20;

/// A negative exponent yields a float; one beyond `u32` cannot fit any arena.
fn power_exponent(rhs: &BigInt) -> Option<u32> {
    match rhs.sign() {
        Sign::Minus => None,
        _ => rhs.to_u32(),
    }
}

/// Upper bound on the digit bytes of `base ** exp`.
fn power_result_bytes(base: &BigInt, exp: u32) -> usize {
    // 0, 1 and -1 stay one digit wide.
    if base.bits() <= 1 {
        return mem::size_of::<u32>();
    }
    let bits = base.bits().saturating_mul(u64::from(exp));
    let digits = bits.div_ceil(u64::from(u32::BITS));
    usize::try_from(digits)
        .ok()
        .and_then(|digits| digits.checked_mul(mem::size_of::<u32>()))
        .unwrap_or(usize::MAX)
}

/// Apply `op` to two integers. Results are exact; there is no fixed-width overflow.
///
/// Floor division and modulo round toward negative infinity, so the remainder takes the
/// sign of the divisor. `/` and comparisons are rejected: they produce floats and booleans,
/// neither of which this operator family yields.
pub fn eval_binary(op: BinaryOp, lhs: &BigInt, rhs: &BigInt) -> Result<BigInt, VmError> {
    match op {
        BinaryOp::Add => Ok(lhs + rhs),
        BinaryOp::Subtract => Ok(lhs - rhs),
        BinaryOp::Multiply => Ok(lhs * rhs),
        BinaryOp::FloorDivide => {
            if rhs.is_zero() {
                return Err(VmError::ZeroDivision);
            }
            Ok(lhs.div_floor(rhs))
        }
        BinaryOp::Modulo => {
            if rhs.is_zero() {
                return Err(VmError::ZeroDivision);
            }
            Ok(lhs.mod_floor(rhs))
        }
        BinaryOp::Power => {
            match power_exponent(rhs) {
                Some(exp) => {
                    let bytes = power_result_bytes(lhs, exp);
                    if bytes > MAX_POWER_RESULT_BYTES {
                        debug!(target: "pyrite::vm::arith", bytes, exponent = exp, "power.result_too_large");
                        return Err(VmError::AllocationFailed { bytes });
                    }
                    Ok(lhs.pow(exp))
                }
                None => {
                    debug!(target: "pyrite::vm::arith", exponent = %rhs, "power.unsupported_exponent");
                    Err(VmError::UnsupportedOperator { op })
                }
            }
        }
        BinaryOp::Divide
        | BinaryOp::Less
        | BinaryOp::LessEqual
        | BinaryOp::Equal
        | BinaryOp::NotEqual
        | BinaryOp::Greater
        | BinaryOp::GreaterEqual => Err(VmError::UnsupportedOperator { op }),
    }
}
