use super::Word;
use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Stack and literal values
///
/// The data stack and the literal pool carry dynamic values; only the
/// memory region is limited to raw cells. Narrowing a value into a
/// cell width is always checked, never truncated.

#[derive(Clone, Debug, PartialEq)]
pub enum Val {
    None,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Str(Rc<str>),
    Word(Rc<Word>),
}

impl Val {
    /// Parse a source word as a literal: integer, float, or a quoted
    /// single-word string. Anything else is not a literal.
    pub fn parse_literal(text: &str) -> Option<Val> {
        if let Ok(n) = text.parse::<i64>() {
            return Some(Val::Integer(n));
        }
        let numeric = text
            .chars()
            .next()
            .map(|c| c.is_ascii_digit() || c == '-' || c == '+' || c == '.')
            .unwrap_or(false);
        if numeric {
            if let Ok(f) = text.parse::<f64>() {
                return Some(Val::Float(f));
            }
        }
        let b = text.as_bytes();
        if b.len() >= 2 {
            let quote = b[0];
            if (quote == b'\'' || quote == b'"') && b[b.len() - 1] == quote {
                return Some(Val::Str(text[1..text.len() - 1].into()));
            }
        }
        None
    }

    pub fn truthy(&self) -> bool {
        match self {
            Val::None => false,
            Val::Bool(b) => *b,
            Val::Integer(n) => *n != 0,
            Val::Float(f) => *f != 0.0,
            Val::Str(s) => !s.is_empty(),
            Val::Word(_) => true,
        }
    }

    fn overflow(&self) -> Error {
        error!(ResultOutOfRange; format!("value would overflow: {}", self))
    }

    pub(crate) fn not_numeric(&self) -> Error {
        error!(TypeMismatch; format!("not a number: {}", self))
    }

    pub fn as_int(&self) -> Result<i64> {
        match self {
            Val::Integer(n) => Ok(*n),
            Val::Bool(b) => Ok(*b as i64),
            _ => Err(self.not_numeric()),
        }
    }

    pub fn as_u8(&self) -> Result<u8> {
        u8::try_from(self.as_int()?).map_err(|_| self.overflow())
    }

    pub fn as_u16(&self) -> Result<u16> {
        u16::try_from(self.as_int()?).map_err(|_| self.overflow())
    }

    pub fn as_i16(&self) -> Result<i16> {
        i16::try_from(self.as_int()?).map_err(|_| self.overflow())
    }
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Val::None => write!(f, "none"),
            Val::Bool(true) => write!(f, "true"),
            Val::Bool(false) => write!(f, "false"),
            Val::Integer(n) => write!(f, "{}", n),
            Val::Float(x) => {
                if x.is_finite() && x.fract() == 0.0 && x.abs() < 1e16 {
                    write!(f, "{:.1}", x)
                } else {
                    write!(f, "{}", x)
                }
            }
            Val::Str(s) => write!(f, "'{}'", s),
            Val::Word(w) => write!(f, "{}", w),
        }
    }
}
