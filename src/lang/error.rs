use std::rc::Rc;

/// Where a token came from: source name, line and column.
#[derive(Clone, Debug, PartialEq)]
pub struct Location {
    pub file: Rc<str>,
    pub lno: u32,
    pub col: u32,
}

pub struct Error {
    code: i16,
    location: Option<Location>,
    message: String,
}

#[doc(hidden)]
#[macro_export]
macro_rules! error {
    ($err:ident) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
    };
    ($err:ident, $loc:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).at($loc)
    };
    ($err:ident; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err).message($msg)
    };
    ($err:ident, $loc:expr; $msg:expr) => {
        $crate::lang::Error::new($crate::lang::ErrorCode::$err)
            .at($loc)
            .message($msg)
    };
}

impl Error {
    pub fn new(code: ErrorCode) -> Error {
        Error {
            code: code as i16,
            location: None,
            message: String::new(),
        }
    }

    pub fn at(&self, location: &Location) -> Error {
        debug_assert!(self.location.is_none());
        Error {
            code: self.code,
            location: Some(location.clone()),
            message: self.message.clone(),
        }
    }

    pub fn message<S: Into<String>>(&self, message: S) -> Error {
        debug_assert!(self.message.is_empty());
        Error {
            code: self.code,
            location: self.location.clone(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> i16 {
        self.code
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code as i16
    }

    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }
}

/// Error codes follow the classic Forth `THROW` assignments where one
/// exists; the -257..-259 block is system-defined.
pub enum ErrorCode {
    StackOverflow = -3,
    StackUnderflow = -4,
    ReturnStackUnderflow = -6,
    InvalidAddress = -9,
    DivisionByZero = -10,
    ResultOutOfRange = -11,
    TypeMismatch = -12,
    UndefinedWord = -13,
    UserInterrupt = -28,
    InvalidName = -32,
    NonExistentFile = -38,
    MalformedContext = -257,
    Reentrancy = -258,
    PrematureCompletion = -259,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Error {{ {} }}", self.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let code_str = match self.code {
            -3 => "stack overflow",
            -4 => "stack underflow",
            -6 => "return stack underflow",
            -9 => "invalid memory address",
            -10 => "division by zero",
            -11 => "result out of range",
            -12 => "argument type mismatch",
            -13 => "undefined word",
            -28 => "user interrupt",
            -32 => "invalid name argument",
            -38 => "non-existent file",
            -257 => "malformed execution context",
            -258 => "routine already running",
            -259 => "routine stopped without yielding",
            _ => "",
        };
        if code_str.is_empty() {
            write!(f, "error {}", self.code)?;
        } else {
            write!(f, "{}", code_str)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(loc) = &self.location {
            write!(f, " at {}:{}:{}", loc.file, loc.lno, loc.col)?;
        }
        Ok(())
    }
}
