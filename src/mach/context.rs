use super::{Val, Word};
use crate::error;
use crate::lang::Error;
use std::rc::Rc;

type Result<T> = std::result::Result<T, Error>;

/// ## Execution state
///
/// Exactly seven named cells per routine, in this order. Consumers
/// that assemble a routine supply all seven through [`Slot`]; any
/// other shape is a misconfiguration, not a runtime condition.
///
/// `stack_size` is a cache of the data stack depth, rewritten by the
/// dispatch loop after every resumption; nothing else writes it.
/// `tmp` is a scratch cell reserved for external drivers; no word in
/// this crate touches it.

#[derive(Debug)]
pub struct Context {
    pub immediate_mode: bool,
    pub here: u16,
    pub latest: Option<Rc<Word>>,
    pub cstack: Vec<i32>,
    pub stack_size: usize,
    pub literals: Vec<Val>,
    pub tmp: Val,
}

/// One cell of the execution state, used to build a [`Context`] from
/// the outside in the fixed slot order.
pub enum Slot {
    ImmediateMode(bool),
    Here(u16),
    Latest(Option<Rc<Word>>),
    CStack(Vec<i32>),
    StackSize(usize),
    Literals(Vec<Val>),
    Tmp(Val),
}

impl Context {
    pub const SLOTS: usize = 7;

    pub fn from_slots<I: IntoIterator<Item = Slot>>(slots: I) -> Result<Context> {
        let slots: Vec<Slot> = slots.into_iter().collect();
        if slots.len() != Self::SLOTS {
            return Err(error!(MalformedContext;
                format!("context has {} slots, expected {}", slots.len(), Self::SLOTS)));
        }
        let mut ctx = Context {
            immediate_mode: false,
            here: 0,
            latest: None,
            cstack: vec![],
            stack_size: 0,
            literals: vec![],
            tmp: Val::None,
        };
        for (i, slot) in slots.into_iter().enumerate() {
            match (i, slot) {
                (0, Slot::ImmediateMode(v)) => ctx.immediate_mode = v,
                (1, Slot::Here(v)) => ctx.here = v,
                (2, Slot::Latest(v)) => ctx.latest = v,
                (3, Slot::CStack(v)) => ctx.cstack = v,
                (4, Slot::StackSize(v)) => ctx.stack_size = v,
                (5, Slot::Literals(v)) => ctx.literals = v,
                (6, Slot::Tmp(v)) => ctx.tmp = v,
                (i, _) => {
                    return Err(error!(MalformedContext; format!("slot {} out of order", i)))
                }
            }
        }
        Ok(ctx)
    }
}
