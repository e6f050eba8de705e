use super::context::Context;
use super::dictionary::Dictionary;
use super::memory::Memory;
use super::stack::Stack;
use super::val::Val;
use super::vocab::Vocabulary;
use super::{Address, CELL};
use crate::error;
use crate::lang::{Error, Scanner};
use std::cell::RefCell;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Resumable routine
///
/// One executing program: its memory region, execution state, data
/// stack and token source, plus an explicit program counter and a
/// status machine standing in for a host coroutine. The routine runs
/// words until one of them suspends with a jump request; the dispatch
/// loop decides where it continues.
///
/// The program counter holds the *resumption point*, which is always
/// one byte before the position that executes next. Priming starts at
/// [`Routine::ORIGIN`], one byte before the boot word.

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Status {
    NotStarted,
    Running,
    Suspended,
    Completed,
    Failed,
}

/// What a suspended routine handed back.
#[derive(Debug, PartialEq)]
pub enum Yield {
    /// A signed jump request for the dispatch loop to decode.
    Request(i32),
    /// No request: refresh caches and continue at the next cell.
    Sync,
    /// The token source ran dry; resume once more input arrives.
    Pause,
    /// Explicit terminal signal; the session is over.
    Done,
}

/// How a word hands control back to the routine's inner loop.
pub(crate) enum Flow {
    Jump(i32),
    Sync,
    Pause,
    Done,
}

pub struct Routine {
    pub(crate) memory: Memory,
    pub(crate) ctx: Context,
    pub(crate) stack: Stack<Val>,
    pub(crate) dict: Rc<RefCell<Dictionary>>,
    pub(crate) scan: Scanner,
    pub(crate) out: String,
    vocab: Vocabulary,
    pub(crate) pc: Address,
    pub(crate) status: Status,
    fenced: bool,
}

impl Routine {
    /// The priming resumption point: one byte before the boot word.
    pub const ORIGIN: Address = 1;

    pub fn new(
        memory: Memory,
        context: Context,
        dictionary: Rc<RefCell<Dictionary>>,
        vocabulary: Vocabulary,
    ) -> Routine {
        let fenced = vocabulary.has_boot();
        Routine {
            memory,
            ctx: context,
            stack: Stack::new("data stack"),
            dict: dictionary,
            scan: Scanner::new(),
            out: String::new(),
            vocab: vocabulary,
            pc: 0,
            status: Status::NotStarted,
            fenced,
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Drain everything the routine has printed since the last drain.
    pub fn take_output(&mut self) -> String {
        std::mem::replace(&mut self.out, String::new())
    }

    /// Append one line of interactive input.
    pub fn feed_line(&mut self, line: &str) {
        self.scan.push_line(line);
    }

    /// Push a whole source file; its words are read before anything
    /// still pending.
    pub fn import_text(&mut self, file: &str, text: &str) {
        self.scan.push_source(file, text);
    }

    /// Resume execution. `None` primes a fresh routine, or continues a
    /// suspended one in place; `Some(at)` moves the resumption point
    /// first. Resuming a routine that is already running is an error,
    /// as is priming with a jump request.
    pub fn resume(&mut self, at: Option<Address>) -> Result<Yield> {
        match self.status {
            Status::Running => {
                return Err(error!(Reentrancy));
            }
            Status::Completed | Status::Failed => {
                return Err(error!(MalformedContext; "routine is finished"));
            }
            Status::NotStarted => {
                if at.is_some() {
                    return Err(error!(MalformedContext; "primed with a jump request"));
                }
                self.pc = Self::ORIGIN;
            }
            Status::Suspended => {
                if let Some(a) = at {
                    self.pc = a;
                }
            }
        }
        self.execute()
    }

    fn execute(&mut self) -> Result<Yield> {
        self.status = Status::Running;
        loop {
            match self.step() {
                Ok(Flow::Jump(request)) => {
                    self.status = Status::Suspended;
                    return Ok(Yield::Request(request));
                }
                Ok(Flow::Sync) => {
                    // "no request" continues at the next cell
                    self.pc = match self.pc.checked_add(CELL) {
                        Some(pc) => pc,
                        None => {
                            self.status = Status::Failed;
                            return Err(error!(PrematureCompletion));
                        }
                    };
                    self.status = Status::Suspended;
                    return Ok(Yield::Sync);
                }
                Ok(Flow::Pause) => {
                    self.status = Status::Suspended;
                    return Ok(Yield::Pause);
                }
                Ok(Flow::Done) => {
                    self.status = Status::Suspended;
                    return Ok(Yield::Done);
                }
                Err(e) => {
                    if self.fenced && !is_fatal(&e) {
                        // the boot word's recovery fence: report, swap
                        // in a clean control stack, restart the loop
                        let old = self.clear_cstack();
                        self.report(&e, &old);
                        self.pc = Self::ORIGIN;
                        continue;
                    }
                    self.status = Status::Failed;
                    return Err(e);
                }
            }
        }
    }

    fn step(&mut self) -> Result<Flow> {
        let at = self
            .pc
            .checked_add(1)
            .ok_or_else(|| error!(PrematureCompletion))?;
        if let Some(func) = self.vocab.native(at) {
            return func(self);
        }
        if at as usize + CELL as usize > self.memory.len() {
            return Err(error!(PrematureCompletion;
                format!("ran off the end of memory at {}", at)));
        }
        // a cell holding the docol word's address marks the entry of a
        // colon definition; its body starts in the next cell
        if self.vocab.docol_addr() != 0 && self.memory.read_u16(at)? == self.vocab.docol_addr() {
            self.ctx.cstack.push(i32::from(at) + 1);
            let request = self.docol()?;
            return Ok(Flow::Jump(request));
        }
        Err(error!(InvalidAddress; format!("no executable word at {}", at)))
    }

    fn report(&mut self, e: &Error, cstack: &[i32]) {
        if !cstack.is_empty() {
            self.out.push_str("backtrace:");
            for addr in cstack.iter().rev() {
                self.out.push_str(&format!(" {}", addr + 1));
            }
            self.out.push('\n');
        }
        self.out.push_str(&format!("{}\n", e));
    }

    /// The dispatch loop is the only caller: refresh the cached data
    /// stack depth after a resumption.
    pub fn sync_depth(&mut self) {
        self.ctx.stack_size = self.stack.len();
    }

    /// Abort whatever is running and put the routine back at its boot
    /// word, reporting a user interrupt. Pending input is discarded.
    pub fn interrupt(&mut self) {
        match self.status {
            Status::Completed | Status::Failed | Status::NotStarted => return,
            Status::Running | Status::Suspended => {}
        }
        let old = self.clear_cstack();
        let e = error!(UserInterrupt);
        self.report(&e, &old);
        self.scan.clear_pending();
        self.pc = Self::ORIGIN;
        self.status = Status::Suspended;
    }

    /// Discard the routine's resources after its terminal signal.
    pub fn finish(&mut self) {
        self.stack.clear();
        self.ctx.cstack.clear();
        self.ctx.literals.clear();
        self.ctx.latest = None;
        self.scan.clear_pending();
        self.status = Status::Completed;
    }

    pub(crate) fn mark_failed(&mut self) {
        self.status = Status::Failed;
    }

    /// Record a call site's continuation on the control stack.
    pub(crate) fn record_call(&mut self, continuation: i32) {
        self.ctx.cstack.push(continuation);
    }

    pub(crate) fn push(&mut self, val: Val) -> Result<()> {
        self.stack.push(val)
    }

    pub(crate) fn pop(&mut self) -> Result<Val> {
        self.stack.pop()
    }

    /// The ordinary way a word ends: yield the continuation on top of
    /// the control stack.
    pub(crate) fn next_flow(&mut self) -> Result<Flow> {
        Ok(Flow::Jump(self.pop_return_addr()?))
    }

    pub(crate) fn docol_addr(&self) -> Address {
        self.vocab.docol_addr()
    }

    pub(crate) fn lit_addr(&self) -> Address {
        self.vocab.lit_addr()
    }
}

fn is_fatal(e: &Error) -> bool {
    e.code() <= crate::lang::ErrorCode::MalformedContext as i16
}
