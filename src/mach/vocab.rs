use super::dictionary::Dictionary;
use super::operation::Operation;
use super::routine::{Flow, Routine};
use super::val::Val;
use super::{Address, CELL};
use crate::error;
use crate::lang::Error;
use std::collections::BTreeMap;

type Result<T> = std::result::Result<T, Error>;

pub(crate) type Native = fn(&mut Routine) -> Result<Flow>;

/// ## Boot vocabulary
///
/// The native words, installed at consecutive cells starting at
/// address 2 (cell 0 stays reserved so no word ever has address 0).
/// Executing an address resolves here first; compiled call cells hold
/// `addr - 1` so the resumption lands one byte short of the word.
///
/// Names beginning with `__` are reachable by address only and stay
/// out of the dictionary: `__start` is the outer interpreter the
/// routine boots into, `__docol` marks and enters colon definitions,
/// `__lit` fetches compiled literals, and `__.s` is the second half
/// of `.s`, entered after the dispatch loop refreshes the depth cache.

pub struct Vocabulary {
    natives: BTreeMap<Address, Native>,
    docol: Address,
    lit: Address,
}

struct Builtin {
    name: &'static str,
    immediate: bool,
    func: Native,
}

impl Vocabulary {
    pub fn empty() -> Vocabulary {
        Vocabulary {
            natives: BTreeMap::new(),
            docol: 0,
            lit: 0,
        }
    }

    /// Install the whole builtin table, registering the visible words
    /// in the dictionary. Returns the vocabulary and the first free
    /// address, which becomes the routine's initial `here`.
    pub fn install(dict: &mut Dictionary) -> Result<(Vocabulary, Address)> {
        let mut vocab = Vocabulary::empty();
        let mut here: Address = CELL; // cell 0 is reserved
        for builtin in BUILTINS {
            vocab.natives.insert(here, builtin.func);
            match builtin.name {
                "__docol" => vocab.docol = here,
                "__lit" => vocab.lit = here,
                _ => {}
            }
            if !builtin.name.starts_with("__") {
                dict.create(builtin.name, here as usize, builtin.immediate)?;
            }
            here += CELL;
        }
        Ok((vocab, here))
    }

    pub(crate) fn native(&self, addr: Address) -> Option<Native> {
        self.natives.get(&addr).copied()
    }

    pub(crate) fn docol_addr(&self) -> Address {
        self.docol
    }

    pub(crate) fn lit_addr(&self) -> Address {
        self.lit
    }

    pub(crate) fn has_boot(&self) -> bool {
        !self.natives.is_empty()
    }
}

// `__start` must stay first: priming begins at its cell.
const BUILTINS: &[Builtin] = &[
    bi("__start", w_start),
    bi("__docol", w_docol),
    bi("__lit", w_lit),
    bi("word", w_word),
    bi("find", w_find),
    bi(">cfa", w_to_cfa),
    bi(",", w_comma),
    bi("b,", w_byte_comma),
    bi("@", w_fetch),
    bi("b@", w_byte_fetch),
    bi("!", w_store),
    bi("b!", w_byte_store),
    bi("create", w_create),
    bi(":", w_colon),
    im(";", w_semicolon),
    bi("[", w_bracket_open),
    im("]", w_bracket_close),
    bi("'", w_tick),
    bi("immediate", w_immediate),
    bi("exit", w_exit),
    bi("bye", w_bye),
    im("branch", w_branch),
    im("0branch", w_zero_branch),
    bi(".", w_dot),
    bi(".s", w_print_stack),
    bi("__.s", w_print_stack_2),
    im("(", w_paren),
    bi("words", w_words),
    bi("here", w_here),
    bi("latest", w_latest),
    bi("depth", w_depth),
    bi("clear", w_clear),
    im("import", w_import),
    bi("nop", w_nop),
    bi("true", w_true),
    bi("false", w_false),
    bi("none", w_none),
    bi("dup", w_dup),
    bi("drop", w_drop),
    bi("swap", w_swap),
    bi("over", w_over),
    bi("rot", w_rot),
    bi("-rot", w_minus_rot),
    bi("nip", w_nip),
    bi("2dup", w_two_dup),
    bi("2swap", w_two_swap),
    bi("+", w_add),
    bi("-", w_subtract),
    bi("*", w_multiply),
    bi("/", w_divide),
    bi("mod", w_modulo),
    bi("/mod", w_divmod),
    bi("^", w_power),
    bi("<<", w_shift_left),
    bi(">>", w_shift_right),
    bi("&", w_bit_and),
    bi("|", w_bit_or),
    bi("xor", w_bit_xor),
    bi("=", w_equal),
    bi("<>", w_not_equal),
    bi("<", w_less),
    bi("<=", w_less_equal),
    bi(">", w_greater),
    bi(">=", w_greater_equal),
    bi("negate", w_negate),
    bi("abs", w_abs),
    bi("invert", w_invert),
    bi("not", w_not),
    bi("and", w_and),
    bi("or", w_or),
    bi("min", w_min),
    bi("max", w_max),
];

const fn bi(name: &'static str, func: Native) -> Builtin {
    Builtin {
        name,
        immediate: false,
        func,
    }
}

const fn im(name: &'static str, func: Native) -> Builtin {
    Builtin {
        name,
        immediate: true,
        func,
    }
}

/// The outer interpreter: read a word, then execute it, compile it,
/// or treat it as a literal. Only executing a word suspends; literals
/// and compilation run straight through. The continuation pushed
/// before an execute re-enters this loop.
fn w_start(rt: &mut Routine) -> Result<Flow> {
    loop {
        let token = match rt.scan.next_token() {
            Some(t) => t,
            None => return Ok(Flow::Pause),
        };
        if let Some(word) = rt.find(&token.text) {
            if rt.ctx.immediate_mode || word.is_immediate() {
                rt.ctx.cstack.push(i32::from(rt.pc));
                return Ok(Flow::Jump(i32::from(word.addr()) - 1));
            }
            let here = rt.comma(word.addr() - 1)?;
            rt.ctx.here = here;
        } else if let Some(val) = Val::parse_literal(&token.text) {
            if rt.ctx.immediate_mode {
                rt.push(val)?;
            } else {
                let index = rt.append_lit(val);
                if index > u16::max_value() as usize {
                    return Err(error!(ResultOutOfRange;
                        format!("value would overflow: {}", index)));
                }
                let here = rt.comma(rt.lit_addr() - 1)?;
                rt.ctx.here = here;
                let here = rt.comma(index as u16)?;
                rt.ctx.here = here;
            }
        } else {
            return Err(error!(UndefinedWord, &token.location; token.text));
        }
    }
}

fn w_docol(rt: &mut Routine) -> Result<Flow> {
    let request = rt.docol()?;
    Ok(Flow::Jump(request))
}

fn w_lit(rt: &mut Routine) -> Result<Flow> {
    let ret = rt.pop_return_addr()?;
    let (ret, val) = rt.lit(ret)?;
    rt.push(val)?;
    Ok(Flow::Jump(ret))
}

fn w_word(rt: &mut Routine) -> Result<Flow> {
    let token = match rt.scan.next_token() {
        Some(t) => t,
        None => return Ok(Flow::Pause),
    };
    rt.push(Val::Str(token.text.into()))?;
    rt.next_flow()
}

fn w_find(rt: &mut Routine) -> Result<Flow> {
    let name = rt.pop()?;
    match name {
        Val::Str(s) => {
            let found = rt.find(&s).map(Val::Word).unwrap_or(Val::None);
            rt.push(found)?;
            rt.next_flow()
        }
        other => Err(error!(TypeMismatch; format!("find needs a name, got {}", other))),
    }
}

fn w_to_cfa(rt: &mut Routine) -> Result<Flow> {
    match rt.pop()? {
        Val::Word(w) => {
            rt.push(Val::Integer(i64::from(w.addr())))?;
            rt.next_flow()
        }
        other => Err(error!(TypeMismatch; format!("not a word: {}", other))),
    }
}

fn w_comma(rt: &mut Routine) -> Result<Flow> {
    let val = rt.pop()?.as_u16()?;
    let here = rt.comma(val)?;
    rt.ctx.here = here;
    rt.next_flow()
}

fn w_byte_comma(rt: &mut Routine) -> Result<Flow> {
    let val = rt.pop()?.as_u8()?;
    let here = rt.byte_comma(val)?;
    rt.ctx.here = here;
    rt.next_flow()
}

fn w_fetch(rt: &mut Routine) -> Result<Flow> {
    let addr = rt.pop()?.as_u16()?;
    let val = rt.fetch(addr)?;
    rt.push(Val::Integer(i64::from(val)))?;
    rt.next_flow()
}

fn w_byte_fetch(rt: &mut Routine) -> Result<Flow> {
    let addr = rt.pop()?.as_u16()?;
    let val = rt.byte_fetch(addr)?;
    rt.push(Val::Integer(i64::from(val)))?;
    rt.next_flow()
}

fn w_store(rt: &mut Routine) -> Result<Flow> {
    let val = rt.pop()?.as_u16()?;
    let addr = rt.pop()?.as_u16()?;
    rt.store(addr, val)?;
    rt.next_flow()
}

fn w_byte_store(rt: &mut Routine) -> Result<Flow> {
    let val = rt.pop()?.as_u8()?;
    let addr = rt.pop()?.as_u16()?;
    rt.byte_store(addr, val)?;
    rt.next_flow()
}

fn w_create(rt: &mut Routine) -> Result<Flow> {
    match rt.pop()? {
        Val::Str(s) => {
            let word = rt.create(&s)?;
            rt.ctx.latest = Some(word);
            rt.next_flow()
        }
        other => Err(error!(InvalidName; format!("create needs a name, got {}", other))),
    }
}

/// `:` reads a name, creates its word, lays down the docol header and
/// switches to compile mode.
fn w_colon(rt: &mut Routine) -> Result<Flow> {
    let token = match rt.scan.next_token() {
        Some(t) => t,
        None => return Ok(Flow::Pause),
    };
    let word = rt.create(&token.text)?;
    rt.ctx.latest = Some(word);
    let marker = rt.docol_addr();
    let here = rt.comma(marker)?;
    rt.ctx.here = here;
    rt.ctx.immediate_mode = false;
    rt.next_flow()
}

/// `;` compiles `exit` and leaves compile mode.
fn w_semicolon(rt: &mut Routine) -> Result<Flow> {
    let exit = rt
        .find("exit")
        .ok_or_else(|| error!(UndefinedWord; "exit"))?;
    let here = rt.comma(exit.addr() - 1)?;
    rt.ctx.here = here;
    rt.ctx.immediate_mode = true;
    rt.next_flow()
}

fn w_bracket_open(rt: &mut Routine) -> Result<Flow> {
    rt.ctx.immediate_mode = false;
    rt.next_flow()
}

fn w_bracket_close(rt: &mut Routine) -> Result<Flow> {
    rt.ctx.immediate_mode = true;
    rt.next_flow()
}

fn w_tick(rt: &mut Routine) -> Result<Flow> {
    let token = match rt.scan.next_token() {
        Some(t) => t,
        None => return Ok(Flow::Pause),
    };
    match rt.find(&token.text) {
        Some(word) => {
            rt.push(Val::Integer(i64::from(word.addr())))?;
            rt.next_flow()
        }
        None => Err(error!(UndefinedWord, &token.location; token.text)),
    }
}

fn w_immediate(rt: &mut Routine) -> Result<Flow> {
    match &rt.ctx.latest {
        Some(word) => word.set_immediate(true),
        None => return Err(error!(InvalidName; "no latest word")),
    }
    rt.next_flow()
}

/// A definition's last compiled cell threads here: discard the bogus
/// continuation past the definition's end and return to the caller.
fn w_exit(rt: &mut Routine) -> Result<Flow> {
    rt.pop_return_addr()?;
    rt.next_flow()
}

fn w_bye(_rt: &mut Routine) -> Result<Flow> {
    Ok(Flow::Done)
}

fn w_branch(rt: &mut Routine) -> Result<Flow> {
    let distance = rt.pop()?.as_i16()?;
    let target = rt.branch(distance)?;
    Ok(Flow::Jump(i32::from(target)))
}

fn w_zero_branch(rt: &mut Routine) -> Result<Flow> {
    let flag = rt.pop()?;
    if Operation::equal(&flag, &Val::Integer(0)).truthy() {
        w_branch(rt)
    } else {
        rt.pop()?;
        rt.next_flow()
    }
}

fn w_dot(rt: &mut Routine) -> Result<Flow> {
    let val = rt.pop()?;
    if val != Val::None {
        rt.out.push_str(&format!("{}\n", val));
    }
    rt.next_flow()
}

/// First half of `.s`: yield with no request so the dispatch loop
/// refreshes the depth cache, then fall into `__.s`.
fn w_print_stack(_rt: &mut Routine) -> Result<Flow> {
    Ok(Flow::Sync)
}

fn w_print_stack_2(rt: &mut Routine) -> Result<Flow> {
    rt.print_stack();
    rt.next_flow()
}

fn w_paren(rt: &mut Routine) -> Result<Flow> {
    loop {
        match rt.scan.next_token() {
            Some(t) => {
                if t.text == ")" {
                    return rt.next_flow();
                }
            }
            None => return Ok(Flow::Pause),
        }
    }
}

fn w_words(rt: &mut Routine) -> Result<Flow> {
    let names = rt.dict.borrow().names();
    let mut line = names.join(" ");
    line.push('\n');
    rt.out.push_str(&line);
    rt.next_flow()
}

fn w_here(rt: &mut Routine) -> Result<Flow> {
    let here = rt.ctx.here;
    rt.push(Val::Integer(i64::from(here)))?;
    rt.next_flow()
}

fn w_latest(rt: &mut Routine) -> Result<Flow> {
    let latest = rt.ctx.latest.clone().map(Val::Word).unwrap_or(Val::None);
    rt.push(latest)?;
    rt.next_flow()
}

fn w_depth(rt: &mut Routine) -> Result<Flow> {
    let depth = rt.stack.len();
    rt.push(Val::Integer(depth as i64))?;
    rt.next_flow()
}

fn w_clear(rt: &mut Routine) -> Result<Flow> {
    rt.stack.clear();
    rt.next_flow()
}

fn w_import(rt: &mut Routine) -> Result<Flow> {
    let token = match rt.scan.next_token() {
        Some(t) => t,
        None => return Ok(Flow::Pause),
    };
    let text = std::fs::read_to_string(&token.text)
        .map_err(|_| error!(NonExistentFile, &token.location; token.text.clone()))?;
    rt.import_text(&token.text, &text);
    rt.next_flow()
}

fn w_nop(rt: &mut Routine) -> Result<Flow> {
    rt.next_flow()
}

fn w_true(rt: &mut Routine) -> Result<Flow> {
    rt.push(Val::Bool(true))?;
    rt.next_flow()
}

fn w_false(rt: &mut Routine) -> Result<Flow> {
    rt.push(Val::Bool(false))?;
    rt.next_flow()
}

fn w_none(rt: &mut Routine) -> Result<Flow> {
    rt.push(Val::None)?;
    rt.next_flow()
}

fn w_dup(rt: &mut Routine) -> Result<Flow> {
    let val = rt.pop()?;
    rt.push(val.clone())?;
    rt.push(val)?;
    rt.next_flow()
}

fn w_drop(rt: &mut Routine) -> Result<Flow> {
    rt.pop()?;
    rt.next_flow()
}

fn w_swap(rt: &mut Routine) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    rt.push(b)?;
    rt.push(a)?;
    rt.next_flow()
}

fn w_over(rt: &mut Routine) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    rt.push(a.clone())?;
    rt.push(b)?;
    rt.push(a)?;
    rt.next_flow()
}

/// ( a b c -- c a b ), the host's three-way rotation.
fn w_rot(rt: &mut Routine) -> Result<Flow> {
    let c = rt.pop()?;
    let (a, b) = rt.stack.pop_2()?;
    rt.push(c)?;
    rt.push(a)?;
    rt.push(b)?;
    rt.next_flow()
}

/// ( a b c -- b c a )
fn w_minus_rot(rt: &mut Routine) -> Result<Flow> {
    let c = rt.pop()?;
    let (a, b) = rt.stack.pop_2()?;
    rt.push(b)?;
    rt.push(c)?;
    rt.push(a)?;
    rt.next_flow()
}

fn w_nip(rt: &mut Routine) -> Result<Flow> {
    let (_, b) = rt.stack.pop_2()?;
    rt.push(b)?;
    rt.next_flow()
}

fn w_two_dup(rt: &mut Routine) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    rt.push(a.clone())?;
    rt.push(b.clone())?;
    rt.push(a)?;
    rt.push(b)?;
    rt.next_flow()
}

fn w_two_swap(rt: &mut Routine) -> Result<Flow> {
    let (c, d) = rt.stack.pop_2()?;
    let (a, b) = rt.stack.pop_2()?;
    rt.push(c)?;
    rt.push(d)?;
    rt.push(a)?;
    rt.push(b)?;
    rt.next_flow()
}

fn binary(rt: &mut Routine, op: fn(Val, Val) -> Result<Val>) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    let val = op(a, b)?;
    rt.push(val)?;
    rt.next_flow()
}

fn unary(rt: &mut Routine, op: fn(Val) -> Result<Val>) -> Result<Flow> {
    let a = rt.pop()?;
    let val = op(a)?;
    rt.push(val)?;
    rt.next_flow()
}

fn w_add(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::add)
}

fn w_subtract(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::subtract)
}

fn w_multiply(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::multiply)
}

fn w_divide(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::divide)
}

fn w_modulo(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::modulo)
}

fn w_divmod(rt: &mut Routine) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    let (rem, quot) = Operation::floor_divmod(a, b)?;
    rt.push(rem)?;
    rt.push(quot)?;
    rt.next_flow()
}

fn w_power(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::power)
}

fn w_shift_left(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::shift_left)
}

fn w_shift_right(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::shift_right)
}

fn w_bit_and(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::bit_and)
}

fn w_bit_or(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::bit_or)
}

fn w_bit_xor(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::bit_xor)
}

fn w_equal(rt: &mut Routine) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    rt.push(Operation::equal(&a, &b))?;
    rt.next_flow()
}

fn w_not_equal(rt: &mut Routine) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    rt.push(Operation::not_equal(&a, &b))?;
    rt.next_flow()
}

fn w_less(rt: &mut Routine) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    rt.push(Operation::less(&a, &b)?)?;
    rt.next_flow()
}

fn w_less_equal(rt: &mut Routine) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    rt.push(Operation::less_equal(&a, &b)?)?;
    rt.next_flow()
}

fn w_greater(rt: &mut Routine) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    rt.push(Operation::greater(&a, &b)?)?;
    rt.next_flow()
}

fn w_greater_equal(rt: &mut Routine) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    rt.push(Operation::greater_equal(&a, &b)?)?;
    rt.next_flow()
}

fn w_negate(rt: &mut Routine) -> Result<Flow> {
    unary(rt, Operation::negate)
}

fn w_abs(rt: &mut Routine) -> Result<Flow> {
    unary(rt, Operation::abs)
}

fn w_invert(rt: &mut Routine) -> Result<Flow> {
    unary(rt, Operation::invert)
}

fn w_not(rt: &mut Routine) -> Result<Flow> {
    let a = rt.pop()?;
    rt.push(Operation::not(a))?;
    rt.next_flow()
}

fn w_and(rt: &mut Routine) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    rt.push(Operation::and(a, b))?;
    rt.next_flow()
}

fn w_or(rt: &mut Routine) -> Result<Flow> {
    let (a, b) = rt.stack.pop_2()?;
    rt.push(Operation::or(a, b))?;
    rt.next_flow()
}

fn w_min(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::min)
}

fn w_max(rt: &mut Routine) -> Result<Flow> {
    binary(rt, Operation::max)
}
