use super::*;
use crate::lang::ErrorCode;

#[test]
fn test_comma_advances_and_writes() {
    let mut rt = bare(64);
    assert_eq!(rt.context().here, 0);
    let here = rt.comma(0x1234).unwrap();
    assert_eq!(here, 2);
    assert_eq!(rt.memory().read_u16(0).unwrap(), 0x1234);
    // the caller stores the cursor back
    rt.context_mut().here = here;
    let here = rt.byte_comma(0xAB).unwrap();
    assert_eq!(here, 3);
    assert_eq!(rt.memory().read_u8(2).unwrap(), 0xAB);
}

#[test]
fn test_comma_checks_bounds() {
    let mut rt = bare(4);
    rt.context_mut().here = 3;
    assert!(rt.comma(1).unwrap_err().is(ErrorCode::InvalidAddress));
}

#[test]
fn test_append_lit_indices() {
    let mut rt = bare(16);
    assert_eq!(rt.append_lit(Val::Str("x".into())), 0);
    assert_eq!(rt.append_lit(Val::Str("y".into())), 1);
    assert_eq!(rt.context().literals[0], Val::Str("x".into()));
    assert_eq!(rt.context().literals[1], Val::Str("y".into()));
}

#[test]
fn test_lit_decodes_negative_return_addr() {
    let mut rt = bare(16);
    rt.append_lit(Val::Str("x".into()));
    rt.append_lit(Val::Str("y".into()));
    rt.memory.write_u16(6, 1).unwrap();
    let (ret, val) = rt.lit(-6).unwrap();
    assert_eq!(ret, -8);
    assert_eq!(val, Val::Str("y".into()));
}

#[test]
fn test_lit_checks_pool_range() {
    let mut rt = bare(16);
    rt.memory.write_u16(6, 3).unwrap();
    assert!(rt.lit(-6).unwrap_err().is(ErrorCode::InvalidAddress));
}

#[test]
fn test_create_then_find() {
    let mut rt = bare(16);
    rt.context_mut().here = 10;
    let word = rt.create("foo").unwrap();
    assert_eq!(word.addr(), 10);
    assert!(!word.is_immediate());
    let found = rt.find("foo").unwrap();
    assert_eq!(found.addr(), 10);
    assert!(rt.find("bar").is_none());
}

#[test]
fn test_create_replaces() {
    let mut rt = bare(16);
    rt.create("foo").unwrap();
    rt.context_mut().here = 8;
    rt.create("foo").unwrap();
    assert_eq!(rt.find("foo").unwrap().addr(), 8);
}

#[test]
fn test_branch_arithmetic() {
    let mut rt = bare(16);
    rt.context_mut().cstack.push(100);
    assert_eq!(rt.branch(5).unwrap(), 104);
}

#[test]
fn test_branch_needs_unsigned_base() {
    let mut rt = bare(16);
    rt.context_mut().cstack.push(-100);
    assert!(rt.branch(5).unwrap_err().is(ErrorCode::ResultOutOfRange));
}

#[test]
fn test_return_addr_stack() {
    let mut rt = bare(16);
    assert!(rt
        .pop_return_addr()
        .unwrap_err()
        .is(ErrorCode::ReturnStackUnderflow));
    rt.pc = 10;
    rt.push_return_addr();
    assert_eq!(rt.pop_return_addr().unwrap(), 12);
}

#[test]
fn test_docol_negates_and_decrements() {
    let mut rt = bare(16);
    rt.context_mut().cstack.push(9);
    assert_eq!(rt.docol().unwrap(), -10);
}

#[test]
fn test_clear_cstack_swaps() {
    let mut rt = bare(16);
    rt.context_mut().cstack.push(1);
    rt.context_mut().cstack.push(2);
    let old = rt.clear_cstack();
    assert_eq!(old, vec![1, 2]);
    assert!(rt.context().cstack.is_empty());
}

#[test]
fn test_print_stack_uses_cached_depth() {
    let mut rt = bare(16);
    rt.push(Val::Integer(1)).unwrap();
    rt.push(Val::Integer(2)).unwrap();
    rt.push(Val::Integer(3)).unwrap();
    // the cache says two, so only two print
    rt.context_mut().stack_size = 2;
    rt.print_stack();
    assert_eq!(rt.take_output(), "<2> 1 2\n");
    assert_eq!(rt.stack_depth(), 3);
}

#[test]
fn test_word_address_overflow() {
    assert!(Word::new("w", 70000, false)
        .unwrap_err()
        .is(ErrorCode::ResultOutOfRange));
    let dict = Dictionary::new();
    assert!(dict.find("w").is_none());
}

#[test]
fn test_val_narrowing_is_checked() {
    assert!(Val::Integer(256).as_u8().unwrap_err().is(ErrorCode::ResultOutOfRange));
    assert!(Val::Integer(-1).as_u16().unwrap_err().is(ErrorCode::ResultOutOfRange));
    assert!(Val::Integer(40000).as_i16().unwrap_err().is(ErrorCode::ResultOutOfRange));
    assert!(Val::Float(3.5).as_u16().unwrap_err().is(ErrorCode::TypeMismatch));
    assert_eq!(Val::Bool(true).as_u16().unwrap(), 1);
}
