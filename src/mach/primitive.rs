use super::routine::Routine;
use super::val::Val;
use super::word::Word;
use super::{Address, CELL};
use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// The primitive operation surface. Everything here works on the
/// active routine's own memory, state and stacks; the word registry
/// is the one shared collaborator. These are also the only paths
/// through which new code and data enter the memory region.
impl Routine {
    /// `@` ( addr -- n )
    pub fn fetch(&self, addr: Address) -> Result<u16> {
        self.memory.read_u16(addr)
    }

    /// `b@` ( addr -- n )
    pub fn byte_fetch(&self, addr: Address) -> Result<u8> {
        self.memory.read_u8(addr)
    }

    /// `!` ( addr n -- )
    pub fn store(&mut self, addr: Address, val: u16) -> Result<()> {
        self.memory.write_u16(addr, val)
    }

    /// `b!` ( addr n -- )
    pub fn byte_store(&mut self, addr: Address, val: u8) -> Result<()> {
        self.memory.write_u8(addr, val)
    }

    /// Write one cell at `here` and return the advanced cursor; the
    /// caller stores it back into the `here` slot.
    pub fn comma(&mut self, val: u16) -> Result<Address> {
        self.memory.write_u16(self.ctx.here, val)?;
        self.ctx
            .here
            .checked_add(CELL)
            .ok_or_else(|| error!(ResultOutOfRange; format!("value would overflow: {}", self.ctx.here)))
    }

    /// Write one byte at `here` and return the advanced cursor.
    pub fn byte_comma(&mut self, val: u8) -> Result<Address> {
        self.memory.write_u8(self.ctx.here, val)?;
        self.ctx
            .here
            .checked_add(1)
            .ok_or_else(|| error!(ResultOutOfRange; format!("value would overflow: {}", self.ctx.here)))
    }

    /// Registry lookup; absence is a normal result.
    pub fn find(&self, name: &str) -> Option<Rc<Word>> {
        self.dict.borrow().find(name)
    }

    /// Insert a word for `name` at the current `here`. Whether the
    /// `latest` slot follows is the driving vocabulary's business.
    pub fn create(&mut self, name: &str) -> Result<Rc<Word>> {
        let here = self.ctx.here;
        self.dict.borrow_mut().create(name, here as usize, false)
    }

    /// Append to the literal pool and return the new index.
    pub fn append_lit(&mut self, val: Val) -> usize {
        self.ctx.literals.push(val);
        self.ctx.literals.len() - 1
    }

    /// Decode a literal reference: `-ret` addresses the cell holding
    /// the literal pool index; the virtual return position advances by
    /// one cell to skip that operand.
    pub fn lit(&mut self, ret: i32) -> Result<(i32, Val)> {
        let addr = ret
            .checked_neg()
            .and_then(|n| u16::try_from(n).ok())
            .ok_or_else(|| error!(ResultOutOfRange; format!("value would overflow: {}", ret)))?;
        let index = self.memory.read_u16(addr)?;
        let val = self
            .ctx
            .literals
            .get(index as usize)
            .cloned()
            .ok_or_else(|| error!(InvalidAddress; format!("literal index {} out of range", index)))?;
        Ok((ret - i32::from(CELL), val))
    }

    pub fn pop_return_addr(&mut self) -> Result<i32> {
        self.ctx
            .cstack
            .pop()
            .ok_or_else(|| error!(ReturnStackUnderflow))
    }

    /// Record where execution resumes after the current position: one
    /// instruction width past it.
    pub fn push_return_addr(&mut self) {
        self.ctx.cstack.push(i32::from(self.pc) + i32::from(CELL));
    }

    /// Pop a base position and add a signed distance. One is
    /// subtracted because the resumption point is always one byte
    /// before the position that executes next.
    pub fn branch(&mut self, distance: i16) -> Result<Address> {
        let base = self.pop_return_addr()?;
        let base = u16::try_from(base)
            .map_err(|_| error!(ResultOutOfRange; format!("value would overflow: {}", base)))?;
        let target = i32::from(base) + i32::from(distance) - 1;
        u16::try_from(target)
            .map_err(|_| error!(ResultOutOfRange; format!("value would overflow: {}", target)))
    }

    /// Enter a nested word: the popped position, negated and moved one
    /// byte down, threads into the cell it points at.
    pub fn docol(&mut self) -> Result<i32> {
        let addr = self.pop_return_addr()?;
        addr.checked_add(1)
            .and_then(i32::checked_neg)
            .ok_or_else(|| error!(ResultOutOfRange; format!("value would overflow: {}", addr)))
    }

    /// Swap in a fresh control stack, returning the old one.
    pub fn clear_cstack(&mut self) -> Vec<i32> {
        std::mem::replace(&mut self.ctx.cstack, Vec::new())
    }

    /// Diagnostic: `<n>` then the stack contents, bottom first, using
    /// the cached depth the dispatch loop maintains.
    pub fn print_stack(&mut self) {
        let mut line = format!("<{}>", self.ctx.stack_size);
        for val in self.stack.iter().take(self.ctx.stack_size) {
            line.push(' ');
            line.push_str(&val.to_string());
        }
        line.push('\n');
        self.out.push_str(&line);
    }
}
