use crate::error;
use crate::lang::Error;
use std::cell::Cell;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Dictionary word
///
/// A named, addressable, optionally-immediate callable unit. Identity
/// is the name and address; the immediate flag is the only mutable
/// part and may be flipped after creation (`immediate` does exactly
/// that through `latest`). Shared as `Rc<Word>` so the registry and
/// the `latest` slot observe one record.

pub struct Word {
    name: Rc<str>,
    addr: u16,
    immediate: Cell<bool>,
}

impl Word {
    /// Build a word, checking that the address fits the 16-bit space.
    pub fn new(name: &str, addr: usize, immediate: bool) -> Result<Word> {
        if addr > u16::max_value() as usize {
            return Err(error!(ResultOutOfRange; format!("value would overflow: {}", addr)));
        }
        Ok(Word {
            name: name.into(),
            addr: addr as u16,
            immediate: Cell::new(immediate),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn name_rc(&self) -> Rc<str> {
        self.name.clone()
    }

    pub fn addr(&self) -> u16 {
        self.addr
    }

    pub fn is_immediate(&self) -> bool {
        self.immediate.get()
    }

    pub fn set_immediate(&self, on: bool) {
        self.immediate.set(on)
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl std::fmt::Debug for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_string())
    }
}

impl std::fmt::Display for Word {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "<word '{}' addr={}{}>",
            self.name,
            self.addr,
            if self.immediate.get() { " immediate" } else { "" }
        )
    }
}
