use super::context::{Context, Slot};
use super::dictionary::Dictionary;
use super::memory::Memory;
use super::routine::Routine;
use super::runner::{Outcome, Runner};
use super::val::Val;
use super::vocab::Vocabulary;
use crate::lang::Error;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// Default size of a routine's memory region.
pub const MEMORY: usize = 65535;

/// What `execute` has to report back to the host.
#[derive(Debug)]
pub enum Event {
    /// Accumulated output to show the user.
    Print(String),
    /// Waiting for another line of input.
    Ready,
    /// The cycle budget ran out; call `execute` again to continue.
    Running,
    /// The session gave its terminal signal.
    Bye,
    /// The routine aborted; the session is over.
    Errors(Vec<Error>),
}

/// ## Session host
///
/// Owns the shared dictionary, one routine and the dispatch loop, and
/// turns them into a line-at-a-time event machine the way a prompt
/// wants to drive them: feed a line with `enter`, then pump `execute`
/// until it asks for more input.

pub struct Runtime {
    dict: Rc<RefCell<Dictionary>>,
    routine: Routine,
    runner: Runner,
    events: VecDeque<Event>,
    finished: bool,
}

impl Default for Runtime {
    fn default() -> Runtime {
        Runtime::new(MEMORY, true).expect("boot vocabulary install")
    }
}

impl Runtime {
    pub fn new(memory: usize, stdlib: bool) -> Result<Runtime> {
        let dict = Rc::new(RefCell::new(Dictionary::new()));
        let (vocab, here) = Vocabulary::install(&mut dict.borrow_mut())?;
        let context = Context::from_slots(vec![
            Slot::ImmediateMode(true),
            Slot::Here(here),
            Slot::Latest(None),
            Slot::CStack(vec![]),
            Slot::StackSize(0),
            Slot::Literals(vec![]),
            Slot::Tmp(Val::None),
        ])?;
        let mut routine = Routine::new(Memory::new(memory), context, dict.clone(), vocab);
        if stdlib {
            routine.import_text("stdlib.fs", include_str!("../stdlib.fs"));
        }
        Ok(Runtime {
            dict,
            routine,
            runner: Runner::new(),
            events: VecDeque::new(),
            finished: false,
        })
    }

    /// The word registry, shared with anything else the host drives.
    pub fn dictionary(&self) -> Rc<RefCell<Dictionary>> {
        self.dict.clone()
    }

    /// Feed one line of input.
    pub fn enter(&mut self, line: &str) {
        self.routine.feed_line(line);
    }

    /// Drive the routine for at most `cycles` resumptions and report
    /// what happened.
    pub fn execute(&mut self, cycles: usize) -> Event {
        if let Some(event) = self.events.pop_front() {
            return event;
        }
        if self.finished {
            return Event::Bye;
        }
        let result = self.runner.run(&mut self.routine, cycles);
        self.flush();
        match result {
            Ok(Outcome::Paused) => self.events.push_back(Event::Ready),
            Ok(Outcome::Running) => self.events.push_back(Event::Running),
            Ok(Outcome::Done) => {
                self.finished = true;
                self.events.push_back(Event::Bye);
            }
            Err(e) => {
                self.finished = true;
                self.events.push_back(Event::Errors(vec![e]));
            }
        }
        self.events.pop_front().unwrap_or(Event::Bye)
    }

    /// Abort whatever is running and come back to the prompt.
    pub fn interrupt(&mut self) {
        if self.finished {
            return;
        }
        self.runner.reset();
        self.routine.interrupt();
    }

    fn flush(&mut self) {
        let out = self.routine.take_output();
        if !out.is_empty() {
            self.events.push_back(Event::Print(out));
        }
    }
}
