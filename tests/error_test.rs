mod common;
use common::*;
use forth::mach::{Event, Runtime};

#[test]
fn test_underflow_reports_and_recovers() {
    let mut r = Runtime::default();
    r.enter("drop");
    let out = exec(&mut r);
    assert!(out.contains("stack underflow"));
    r.enter("1 .");
    assert_eq!(exec(&mut r), "1\n");
}

#[test]
fn test_undefined_word_names_the_word() {
    let mut r = Runtime::default();
    r.enter("frobnicate");
    let out = exec(&mut r);
    assert!(out.contains("undefined word"));
    assert!(out.contains("frobnicate"));
    assert!(out.contains("<stdin>"));
}

#[test]
fn test_type_mismatch_recovers() {
    let mut r = Runtime::default();
    r.enter("'a' 1 +");
    assert!(exec(&mut r).contains("argument type mismatch"));
    r.enter("clear 2 2 + .");
    assert_eq!(exec(&mut r), "4\n");
}

#[test]
fn test_division_by_zero() {
    let mut r = Runtime::default();
    r.enter("1 0 /");
    assert!(exec(&mut r).contains("division by zero"));
}

#[test]
fn test_overflow_names_the_value() {
    let mut r = Runtime::default();
    r.enter("70000 ,");
    let out = exec(&mut r);
    assert!(out.contains("result out of range"));
    assert!(out.contains("70000"));
}

#[test]
fn test_error_inside_definition_shows_backtrace() {
    let mut r = Runtime::default();
    r.enter(": boom drop ;");
    r.enter("boom");
    let out = exec(&mut r);
    assert!(out.contains("backtrace:"));
    assert!(out.contains("stack underflow"));
    r.enter("3 .");
    assert_eq!(exec(&mut r), "3\n");
}

#[test]
fn test_bye_is_terminal() {
    let mut r = Runtime::default();
    r.enter("1 . bye 2 .");
    assert_eq!(exec(&mut r), "1\n");
    assert!(matches!(r.execute(1), Event::Bye));
    assert!(matches!(r.execute(1), Event::Bye));
}

#[test]
fn test_interrupt_comes_back_to_the_prompt() {
    let mut r = Runtime::default();
    r.enter(": spin spin ;");
    assert_eq!(exec(&mut r), "");
    r.enter("spin");
    assert!(matches!(r.execute(500), Event::Running));
    r.interrupt();
    let out = exec(&mut r);
    assert!(out.contains("user interrupt"));
    r.enter("1 .");
    assert_eq!(exec(&mut r), "1\n");
}

#[test]
fn test_runaway_reports_running() {
    let mut r = Runtime::default();
    r.enter(": spin spin ;");
    exec(&mut r);
    r.enter("spin");
    let out = exec_n(&mut r, 200);
    assert!(out.contains("execution cycles exceeded"));
    r.interrupt();
}
