mod common;
use common::*;
use forth::mach::Runtime;

#[test]
fn test_colon_definition() {
    let mut r = Runtime::default();
    r.enter(": square dup * ;");
    assert_eq!(exec(&mut r), "");
    r.enter("7 square .");
    assert_eq!(exec(&mut r), "49\n");
}

#[test]
fn test_nested_definitions() {
    let mut r = Runtime::default();
    r.enter(": square dup * ;");
    r.enter(": fourth square square ;");
    r.enter("2 fourth .");
    assert_eq!(exec(&mut r), "16\n");
}

#[test]
fn test_compiled_literals() {
    let mut r = Runtime::default();
    r.enter(": plus5 5 + ;");
    r.enter("3 plus5 .");
    assert_eq!(exec(&mut r), "8\n");
    r.enter(": greet 'hi' . ;");
    r.enter("greet greet");
    assert_eq!(exec(&mut r), "'hi'\n'hi'\n");
}

#[test]
fn test_definition_spanning_lines() {
    let mut r = Runtime::default();
    r.enter(": add3");
    r.enter("  1 + 1 +");
    r.enter("  1 + ;");
    r.enter("4 add3 .");
    assert_eq!(exec(&mut r), "7\n");
}

#[test]
fn test_immediate_word_runs_at_compile_time() {
    let mut r = Runtime::default();
    r.enter(": now 42 . ; immediate");
    assert_eq!(exec(&mut r), "");
    r.enter(": later now ;");
    // `now` executed while `later` was being compiled
    assert_eq!(exec(&mut r), "42\n");
    r.enter("later");
    assert_eq!(exec(&mut r), "");
}

#[test]
fn test_redefinition_replaces() {
    let mut r = Runtime::default();
    r.enter(": f 1 . ;");
    r.enter(": f 2 . ;");
    r.enter("f");
    assert_eq!(exec(&mut r), "2\n");
}

#[test]
fn test_stdlib_words() {
    let mut r = Runtime::default();
    r.enter("5 1+ .");
    assert_eq!(exec(&mut r), "6\n");
    r.enter("5 1- .");
    assert_eq!(exec(&mut r), "4\n");
    r.enter("1 2 tuck . . .");
    assert_eq!(exec(&mut r), "2\n1\n2\n");
    r.enter("3 cells .");
    assert_eq!(exec(&mut r), "6\n");
}

#[test]
fn test_tick_pushes_address() {
    let mut r = Runtime::default();
    r.enter("' dup .");
    let out = exec(&mut r);
    let addr: i64 = out.trim().parse().unwrap();
    assert!(addr > 0);
}

#[test]
fn test_word_create_latest() {
    let mut r = Runtime::default();
    r.enter("word counter create latest .");
    let out = exec(&mut r);
    assert!(out.contains("'counter'"));
    r.enter("word counter find .");
    assert!(exec(&mut r).contains("'counter'"));
}

#[test]
fn test_find_missing_is_none() {
    let mut r = Runtime::default();
    r.enter("word missing find . depth .");
    // `.` swallows the none, leaving nothing behind
    assert_eq!(exec(&mut r), "0\n");
}

#[test]
fn test_comma_advances_here() {
    let mut r = Runtime::default();
    r.enter("here 5 , here swap - .");
    assert_eq!(exec(&mut r), "2\n");
    r.enter("here 5 b, here swap - .");
    assert_eq!(exec(&mut r), "1\n");
}

#[test]
fn test_to_cfa() {
    let mut r = Runtime::default();
    r.enter("word dup find >cfa ' dup = .");
    assert_eq!(exec(&mut r), "true\n");
}

#[test]
fn test_brackets_toggle_mode() {
    let mut r = Runtime::default();
    // `]` leaves compile mode, so 2 3 + runs now; `[` resumes it
    r.enter(": weird 1 + ] 2 3 + . [ 10 + ;");
    assert_eq!(exec(&mut r), "5\n");
    r.enter("0 weird .");
    assert_eq!(exec(&mut r), "11\n");
}

#[test]
fn test_import_missing_file_recovers() {
    let mut r = Runtime::default();
    r.enter("import no-such-file.fs");
    let out = exec(&mut r);
    assert!(out.contains("non-existent file"));
    assert!(out.contains("no-such-file.fs"));
    r.enter("1 .");
    assert_eq!(exec(&mut r), "1\n");
}
