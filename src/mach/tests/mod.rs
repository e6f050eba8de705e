use super::*;
use std::cell::RefCell;
use std::rc::Rc;

mod primitive_test;
mod protocol_test;

/// A routine with no vocabulary installed: primitives only.
fn bare(memory: usize) -> Routine {
    let dict = Rc::new(RefCell::new(Dictionary::new()));
    Routine::new(Memory::new(memory), seven_slots(0), dict, Vocabulary::empty())
}

/// A routine booted with the full vocabulary, sharing `dict`.
fn booted(dict: &Rc<RefCell<Dictionary>>) -> Routine {
    let (vocab, here) = Vocabulary::install(&mut dict.borrow_mut()).unwrap();
    Routine::new(Memory::new(4096), seven_slots(here), dict.clone(), vocab)
}

fn seven_slots(here: u16) -> Context {
    Context::from_slots(vec![
        Slot::ImmediateMode(true),
        Slot::Here(here),
        Slot::Latest(None),
        Slot::CStack(vec![]),
        Slot::StackSize(0),
        Slot::Literals(vec![]),
        Slot::Tmp(Val::None),
    ])
    .unwrap()
}
