use super::Address;
use crate::error;
use crate::lang::Error;

type Result<T> = std::result::Result<T, Error>;

/// ## Byte-addressable memory region
///
/// Backs one routine's compiled code and inline data. The length is
/// fixed when the routine is built. Cells are little-endian u16s; the
/// store itself has no idea which bytes are code, literals or data.

pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    pub fn new(len: usize) -> Memory {
        Memory {
            bytes: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn check(&self, addr: Address, width: usize) -> Result<usize> {
        let a = addr as usize;
        if a + width > self.bytes.len() {
            Err(error!(InvalidAddress;
                format!("{}+{} exceeds memory of {}", addr, width, self.bytes.len())))
        } else {
            Ok(a)
        }
    }

    pub fn read_u8(&self, addr: Address) -> Result<u8> {
        let a = self.check(addr, 1)?;
        Ok(self.bytes[a])
    }

    pub fn read_u16(&self, addr: Address) -> Result<u16> {
        let a = self.check(addr, 2)?;
        Ok(u16::from_le_bytes([self.bytes[a], self.bytes[a + 1]]))
    }

    pub fn write_u8(&mut self, addr: Address, val: u8) -> Result<()> {
        let a = self.check(addr, 1)?;
        self.bytes[a] = val;
        Ok(())
    }

    pub fn write_u16(&mut self, addr: Address, val: u16) -> Result<()> {
        let a = self.check(addr, 2)?;
        let le = val.to_le_bytes();
        self.bytes[a] = le[0];
        self.bytes[a + 1] = le[1];
        Ok(())
    }
}
