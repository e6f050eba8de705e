use super::super::runner::follow;
use super::*;
use crate::lang::ErrorCode;

#[test]
fn test_jump_decode_by_sign() {
    assert_eq!(Jump::decode(100).unwrap(), Jump::Direct(100));
    assert_eq!(Jump::decode(0).unwrap(), Jump::Direct(0));
    assert_eq!(Jump::decode(-20).unwrap(), Jump::Indirect(20));
    assert!(Jump::decode(70000).unwrap_err().is(ErrorCode::ResultOutOfRange));
    assert!(Jump::decode(-70000)
        .unwrap_err()
        .is(ErrorCode::ResultOutOfRange));
}

#[test]
fn test_jump_encode_round_trip() {
    for request in &[0, 1, -1, 20, -20, 65535, -65535] {
        assert_eq!(Jump::decode(*request).unwrap().encode(), *request);
    }
}

#[test]
fn test_deref_jump_records_continuation() {
    let mut rt = bare(64);
    rt.memory.write_u16(20, 40).unwrap();
    let target = follow(&mut rt, -20).unwrap();
    assert_eq!(target, 40);
    assert_eq!(rt.context().cstack, vec![-22]);
}

#[test]
fn test_direct_jump_leaves_cstack_alone() {
    let mut rt = bare(64);
    let target = follow(&mut rt, 7).unwrap();
    assert_eq!(target, 7);
    assert!(rt.context().cstack.is_empty());
}

#[test]
fn test_reentrancy_is_an_error() {
    let mut rt = bare(64);
    rt.status = Status::Running;
    assert!(rt.resume(None).unwrap_err().is(ErrorCode::Reentrancy));
}

#[test]
fn test_priming_with_a_request_is_an_error() {
    let mut rt = bare(64);
    assert!(rt
        .resume(Some(5))
        .unwrap_err()
        .is(ErrorCode::MalformedContext));
}

#[test]
fn test_resuming_a_finished_routine_is_an_error() {
    let mut rt = bare(64);
    rt.finish();
    assert_eq!(rt.status(), Status::Completed);
    assert!(rt.resume(None).unwrap_err().is(ErrorCode::MalformedContext));
}

#[test]
fn test_six_slots_is_malformed() {
    let err = Context::from_slots(vec![
        Slot::ImmediateMode(true),
        Slot::Here(0),
        Slot::Latest(None),
        Slot::CStack(vec![]),
        Slot::StackSize(0),
        Slot::Literals(vec![]),
    ])
    .unwrap_err();
    assert!(err.is(ErrorCode::MalformedContext));
}

#[test]
fn test_eight_slots_is_malformed() {
    let err = Context::from_slots(vec![
        Slot::ImmediateMode(true),
        Slot::Here(0),
        Slot::Latest(None),
        Slot::CStack(vec![]),
        Slot::StackSize(0),
        Slot::Literals(vec![]),
        Slot::Tmp(Val::None),
        Slot::Tmp(Val::None),
    ])
    .unwrap_err();
    assert!(err.is(ErrorCode::MalformedContext));
}

#[test]
fn test_slots_out_of_order_is_malformed() {
    let err = Context::from_slots(vec![
        Slot::Here(0),
        Slot::ImmediateMode(true),
        Slot::Latest(None),
        Slot::CStack(vec![]),
        Slot::StackSize(0),
        Slot::Literals(vec![]),
        Slot::Tmp(Val::None),
    ])
    .unwrap_err();
    assert!(err.is(ErrorCode::MalformedContext));
}

#[test]
fn test_running_off_the_end_is_premature_completion() {
    let mut rt = bare(3);
    let err = rt.resume(None).unwrap_err();
    assert!(err.is(ErrorCode::PrematureCompletion));
    assert_eq!(rt.status(), Status::Failed);
}

#[test]
fn test_jump_into_data_is_invalid() {
    // a bare routine has no words anywhere, so priming lands on a
    // zeroed cell that marks nothing
    let mut rt = bare(64);
    let err = rt.resume(None).unwrap_err();
    assert!(err.is(ErrorCode::InvalidAddress));
    assert_eq!(rt.status(), Status::Failed);
}

#[test]
fn test_runner_refreshes_depth_cache() {
    let dict = Rc::new(RefCell::new(Dictionary::new()));
    let mut rt = booted(&dict);
    rt.feed_line("1 2 3");
    let mut runner = Runner::new();
    assert_eq!(runner.run(&mut rt, 1000).unwrap(), Outcome::Paused);
    assert_eq!(rt.context().stack_size, 3);
    assert_eq!(rt.stack_depth(), 3);
}

#[test]
fn test_runner_marks_failure() {
    let mut rt = bare(64);
    let mut runner = Runner::new();
    assert!(runner.run(&mut rt, 10).is_err());
    assert_eq!(rt.status(), Status::Failed);
}

#[test]
fn test_done_discards_resources() {
    let dict = Rc::new(RefCell::new(Dictionary::new()));
    let mut rt = booted(&dict);
    rt.feed_line("1 2 'x' bye");
    let mut runner = Runner::new();
    assert_eq!(runner.run(&mut rt, 1000).unwrap(), Outcome::Done);
    assert_eq!(rt.status(), Status::Completed);
    assert_eq!(rt.stack_depth(), 0);
    assert!(rt.context().cstack.is_empty());
    assert!(rt.context().literals.is_empty());
}

#[test]
fn test_shared_dictionary_across_routines() {
    let dict = Rc::new(RefCell::new(Dictionary::new()));
    let mut first = booted(&dict);
    let mut second = Routine::new(
        Memory::new(64),
        seven_slots(0),
        dict.clone(),
        Vocabulary::empty(),
    );
    second.context_mut().here = 12;
    second.create("elsewhere").unwrap();
    // the word created against one routine is visible from the other
    let mut runner = Runner::new();
    first.feed_line("word elsewhere find .");
    assert_eq!(runner.run(&mut first, 1000).unwrap(), Outcome::Paused);
    assert!(first.take_output().contains("'elsewhere' addr=12"));
}

#[test]
fn test_pause_then_more_input() {
    let dict = Rc::new(RefCell::new(Dictionary::new()));
    let mut rt = booted(&dict);
    let mut runner = Runner::new();
    rt.feed_line("1 2");
    assert_eq!(runner.run(&mut rt, 1000).unwrap(), Outcome::Paused);
    rt.feed_line("+ .");
    assert_eq!(runner.run(&mut rt, 1000).unwrap(), Outcome::Paused);
    assert_eq!(rt.take_output(), "3\n");
}

#[test]
fn test_cycle_budget_reports_running() {
    let dict = Rc::new(RefCell::new(Dictionary::new()));
    let mut rt = booted(&dict);
    let mut runner = Runner::new();
    rt.feed_line(": spin spin ;");
    assert_eq!(runner.run(&mut rt, 1000).unwrap(), Outcome::Paused);
    rt.feed_line("spin");
    assert_eq!(runner.run(&mut rt, 100).unwrap(), Outcome::Running);
    // picks up where it left off, still spinning
    assert_eq!(runner.run(&mut rt, 100).unwrap(), Outcome::Running);
}
