use super::Val;
use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Value operations
///
/// Arithmetic, comparison and logic over stack values. Integer math is
/// checked; `/` is true division and always yields a float; `mod` is
/// floored (remainder takes the divisor's sign); equality across
/// unlike kinds is false rather than an error, ordering is not.

enum Num {
    Int(i64),
    Float(f64),
}

fn num(val: &Val) -> Option<Num> {
    match val {
        Val::Integer(n) => Some(Num::Int(*n)),
        Val::Float(f) => Some(Num::Float(*f)),
        Val::Bool(b) => Some(Num::Int(*b as i64)),
        _ => None,
    }
}

fn pair(lhs: &Val, rhs: &Val) -> Option<(Num, Num)> {
    Some((num(lhs)?, num(rhs)?))
}

fn mismatch(lhs: &Val, rhs: &Val) -> Error {
    error!(TypeMismatch; format!("{} and {}", lhs, rhs))
}

fn overflow<T: std::fmt::Display>(what: T) -> Error {
    error!(ResultOutOfRange; format!("value would overflow: {}", what))
}

pub struct Operation {}

impl Operation {
    pub fn add(lhs: Val, rhs: Val) -> Result<Val> {
        if let (Val::Str(l), Val::Str(r)) = (&lhs, &rhs) {
            let joined: Rc<str> = format!("{}{}", l, r).into();
            return Ok(Val::Str(joined));
        }
        match pair(&lhs, &rhs) {
            Some((Num::Int(l), Num::Int(r))) => match l.checked_add(r) {
                Some(n) => Ok(Val::Integer(n)),
                None => Err(overflow(&lhs)),
            },
            Some((l, r)) => Ok(Val::Float(as_f64(l) + as_f64(r))),
            None => Err(mismatch(&lhs, &rhs)),
        }
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        match pair(&lhs, &rhs) {
            Some((Num::Int(l), Num::Int(r))) => match l.checked_sub(r) {
                Some(n) => Ok(Val::Integer(n)),
                None => Err(overflow(&lhs)),
            },
            Some((l, r)) => Ok(Val::Float(as_f64(l) - as_f64(r))),
            None => Err(mismatch(&lhs, &rhs)),
        }
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        match pair(&lhs, &rhs) {
            Some((Num::Int(l), Num::Int(r))) => match l.checked_mul(r) {
                Some(n) => Ok(Val::Integer(n)),
                None => Err(overflow(&lhs)),
            },
            Some((l, r)) => Ok(Val::Float(as_f64(l) * as_f64(r))),
            None => Err(mismatch(&lhs, &rhs)),
        }
    }

    /// True division; the result is always a float.
    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        match pair(&lhs, &rhs) {
            Some((l, r)) => {
                let r = as_f64(r);
                if r == 0.0 {
                    Err(error!(DivisionByZero))
                } else {
                    Ok(Val::Float(as_f64(l) / r))
                }
            }
            None => Err(mismatch(&lhs, &rhs)),
        }
    }

    /// Floored remainder: the result takes the divisor's sign.
    pub fn modulo(lhs: Val, rhs: Val) -> Result<Val> {
        match pair(&lhs, &rhs) {
            Some((Num::Int(l), Num::Int(r))) => {
                if r == 0 {
                    return Err(error!(DivisionByZero));
                }
                let rem = l.checked_rem(r).ok_or_else(|| overflow(&lhs))?;
                let rem = if rem != 0 && (rem < 0) != (r < 0) {
                    rem + r
                } else {
                    rem
                };
                Ok(Val::Integer(rem))
            }
            Some((l, r)) => {
                let (l, r) = (as_f64(l), as_f64(r));
                if r == 0.0 {
                    return Err(error!(DivisionByZero));
                }
                Ok(Val::Float(l - r * (l / r).floor()))
            }
            None => Err(mismatch(&lhs, &rhs)),
        }
    }

    /// Floored quotient and remainder, for `/mod`.
    pub fn floor_divmod(lhs: Val, rhs: Val) -> Result<(Val, Val)> {
        let rem = Self::modulo(lhs.clone(), rhs.clone())?;
        match pair(&lhs, &rhs) {
            Some((Num::Int(l), Num::Int(r))) => {
                let quot = l.checked_div(r).ok_or_else(|| overflow(&lhs))?;
                let quot = if (l % r != 0) && ((l < 0) != (r < 0)) {
                    quot - 1
                } else {
                    quot
                };
                Ok((rem, Val::Integer(quot)))
            }
            Some((l, r)) => Ok((rem, Val::Float((as_f64(l) / as_f64(r)).floor()))),
            None => Err(mismatch(&lhs, &rhs)),
        }
    }

    pub fn power(lhs: Val, rhs: Val) -> Result<Val> {
        match pair(&lhs, &rhs) {
            Some((Num::Int(l), Num::Int(r))) if r >= 0 => {
                let exp = u32::try_from(r).map_err(|_| overflow(&rhs))?;
                l.checked_pow(exp).map(Val::Integer).ok_or_else(|| overflow(&lhs))
            }
            Some((l, r)) => Ok(Val::Float(as_f64(l).powf(as_f64(r)))),
            None => Err(mismatch(&lhs, &rhs)),
        }
    }

    pub fn shift_left(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = (lhs.as_int()?, rhs.as_int()?);
        shift_count(r)
            .and_then(|c| l.checked_shl(c))
            .map(Val::Integer)
            .ok_or_else(|| overflow(&lhs))
    }

    pub fn shift_right(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = (lhs.as_int()?, rhs.as_int()?);
        shift_count(r)
            .and_then(|c| l.checked_shr(c))
            .map(Val::Integer)
            .ok_or_else(|| overflow(&lhs))
    }

    pub fn bit_and(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Integer(lhs.as_int()? & rhs.as_int()?))
    }

    pub fn bit_or(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Integer(lhs.as_int()? | rhs.as_int()?))
    }

    pub fn bit_xor(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Integer(lhs.as_int()? ^ rhs.as_int()?))
    }

    pub fn invert(val: Val) -> Result<Val> {
        Ok(Val::Integer(!val.as_int()?))
    }

    pub fn negate(val: Val) -> Result<Val> {
        match num(&val).ok_or_else(|| val.not_numeric())? {
            Num::Int(n) => n.checked_neg().map(Val::Integer).ok_or_else(|| overflow(&val)),
            Num::Float(f) => Ok(Val::Float(-f)),
        }
    }

    pub fn abs(val: Val) -> Result<Val> {
        match num(&val).ok_or_else(|| val.not_numeric())? {
            Num::Int(n) => n.checked_abs().map(Val::Integer).ok_or_else(|| overflow(&val)),
            Num::Float(f) => Ok(Val::Float(f.abs())),
        }
    }

    pub fn not(val: Val) -> Val {
        Val::Bool(!val.truthy())
    }

    /// Truthiness selection, like the host's `and`: the first operand
    /// if it is falsy, otherwise the second.
    pub fn and(lhs: Val, rhs: Val) -> Val {
        if lhs.truthy() {
            rhs
        } else {
            lhs
        }
    }

    pub fn or(lhs: Val, rhs: Val) -> Val {
        if lhs.truthy() {
            lhs
        } else {
            rhs
        }
    }

    pub fn equal(lhs: &Val, rhs: &Val) -> Val {
        Val::Bool(Self::equal_bool(lhs, rhs))
    }

    pub fn not_equal(lhs: &Val, rhs: &Val) -> Val {
        Val::Bool(!Self::equal_bool(lhs, rhs))
    }

    fn equal_bool(lhs: &Val, rhs: &Val) -> bool {
        if let Some((l, r)) = pair(lhs, rhs) {
            return match (l, r) {
                (Num::Int(l), Num::Int(r)) => l == r,
                (l, r) => as_f64(l) == as_f64(r),
            };
        }
        match (lhs, rhs) {
            (Val::Str(l), Val::Str(r)) => l == r,
            (Val::Word(l), Val::Word(r)) => Rc::ptr_eq(l, r),
            (Val::None, Val::None) => true,
            _ => false,
        }
    }

    pub fn less(lhs: &Val, rhs: &Val) -> Result<Val> {
        Ok(Val::Bool(Self::less_bool(lhs, rhs)?))
    }

    pub fn greater(lhs: &Val, rhs: &Val) -> Result<Val> {
        Ok(Val::Bool(Self::less_bool(rhs, lhs)?))
    }

    pub fn less_equal(lhs: &Val, rhs: &Val) -> Result<Val> {
        Ok(Val::Bool(!Self::less_bool(rhs, lhs)?))
    }

    pub fn greater_equal(lhs: &Val, rhs: &Val) -> Result<Val> {
        Ok(Val::Bool(!Self::less_bool(lhs, rhs)?))
    }

    fn less_bool(lhs: &Val, rhs: &Val) -> Result<bool> {
        if let Some((l, r)) = pair(lhs, rhs) {
            return Ok(match (l, r) {
                (Num::Int(l), Num::Int(r)) => l < r,
                (l, r) => as_f64(l) < as_f64(r),
            });
        }
        match (lhs, rhs) {
            (Val::Str(l), Val::Str(r)) => Ok(l < r),
            _ => Err(mismatch(lhs, rhs)),
        }
    }

    pub fn min(lhs: Val, rhs: Val) -> Result<Val> {
        if Self::less_bool(&rhs, &lhs)? {
            Ok(rhs)
        } else {
            Ok(lhs)
        }
    }

    pub fn max(lhs: Val, rhs: Val) -> Result<Val> {
        if Self::less_bool(&lhs, &rhs)? {
            Ok(rhs)
        } else {
            Ok(lhs)
        }
    }
}

fn as_f64(n: Num) -> f64 {
    match n {
        Num::Int(n) => n as f64,
        Num::Float(f) => f,
    }
}

fn shift_count(r: i64) -> Option<u32> {
    if (0..64).contains(&r) {
        Some(r as u32)
    } else {
        None
    }
}
