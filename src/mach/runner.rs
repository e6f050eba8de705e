use super::routine::{Routine, Yield};
use super::{Address, CELL};
use crate::error;
use crate::lang::Error;
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

/// A decoded jump request. The sign of the raw request selects the
/// variant: non-negative is an absolute resumption point, negative
/// names a cell whose contents are the real target (how a call site
/// reaches a word through the address compiled after it).
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Jump {
    Direct(Address),
    Indirect(Address),
}

impl Jump {
    pub fn decode(request: i32) -> Result<Jump> {
        if request >= 0 {
            u16::try_from(request)
                .map(Jump::Direct)
                .map_err(|_| error!(ResultOutOfRange; format!("value would overflow: {}", request)))
        } else {
            u16::try_from(-i64::from(request))
                .map(Jump::Indirect)
                .map_err(|_| error!(ResultOutOfRange; format!("value would overflow: {}", request)))
        }
    }

    pub fn encode(self) -> i32 {
        match self {
            Jump::Direct(a) => i32::from(a),
            Jump::Indirect(a) => -i32::from(a),
        }
    }
}

/// What a budgeted run of the dispatch loop came back with.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    /// The routine gave its terminal signal and was discarded.
    Done,
    /// The routine is waiting for more input.
    Paused,
    /// The cycle budget ran out; call again to keep going.
    Running,
}

/// ## Dispatch loop
///
/// Drives a routine by resuming it over and over, interpreting each
/// yielded value as the next jump. Holds the in-flight yield so a run
/// can stop on its cycle budget and pick up where it left off.

pub struct Runner {
    pending: Option<Yield>,
}

impl Default for Runner {
    fn default() -> Runner {
        Runner::new()
    }
}

impl Runner {
    pub fn new() -> Runner {
        Runner { pending: None }
    }

    /// Forget any in-flight yield (after an interrupt).
    pub fn reset(&mut self) {
        self.pending = None;
    }

    /// Resume the routine at most `cycles` times. The first failure
    /// aborts the routine; nothing is retried.
    pub fn run(&mut self, routine: &mut Routine, cycles: usize) -> Result<Outcome> {
        let result = self.run_inner(routine, cycles);
        if result.is_err() {
            routine.mark_failed();
        }
        result
    }

    fn run_inner(&mut self, routine: &mut Routine, cycles: usize) -> Result<Outcome> {
        for _ in 0..cycles {
            let fed = match self.pending.take() {
                Some(y) => y,
                // prime a fresh routine, or continue a paused one
                None => self.resume(routine, None)?,
            };
            match fed {
                Yield::Done => {
                    routine.finish();
                    return Ok(Outcome::Done);
                }
                Yield::Pause => {
                    return Ok(Outcome::Paused);
                }
                Yield::Sync => {
                    self.pending = Some(self.resume(routine, None)?);
                }
                Yield::Request(request) => {
                    let target = follow(routine, request)?;
                    self.pending = Some(self.resume(routine, Some(target))?);
                }
            }
        }
        Ok(Outcome::Running)
    }

    fn resume(&mut self, routine: &mut Routine, at: Option<Address>) -> Result<Yield> {
        let fed = routine.resume(at)?;
        // sole writer of the depth cache, immediately after every
        // resumption that leaves the routine suspended
        routine.sync_depth();
        Ok(fed)
    }
}

/// Decode a request and produce the position to resume at. An indirect
/// jump records the call site's continuation (one cell past the cell
/// it names) before reading the true target out of memory.
pub(crate) fn follow(routine: &mut Routine, request: i32) -> Result<Address> {
    match Jump::decode(request)? {
        Jump::Direct(addr) => Ok(addr),
        Jump::Indirect(addr) => {
            routine.record_call(request - i32::from(CELL));
            routine.memory().read_u16(addr)
        }
    }
}
