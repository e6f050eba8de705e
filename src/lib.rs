//! # forth-lang
//!
//! A Forth-style language hosted on a threaded-code virtual machine.
//!
//! Compiled code and data share one byte-addressable memory region.
//! Words live in a dictionary; calling one is a jump whose target is
//! read from the cell the call site compiled. The inner interpreter is
//! a dispatch loop that resumes a suspended routine over and over,
//! treating each value it yields as the next jump request.
//!
//! Begin by running the `forth` executable:
//! ```text
//! forth-lang 0.2.0
//! > : 1+ 1 + ;
//! > 41 1+ .
//! 42
//! ```
//!
//! Use `bye` or end-of-file to leave the session, and `import` to read
//! definitions from a file.

pub mod lang;
pub mod mach;
