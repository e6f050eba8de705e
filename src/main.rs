//! # Forth
//!
//! Interactive session for the forth-lang virtual machine.

use ansi_term::Colour::Red;
use forth::mach::{Event, Runtime, MEMORY};
use linefeed::{Interface, ReadResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Resumptions per pump, so interrupts get a look-in.
const CYCLES: usize = 10000;

fn main() {
    #[cfg(windows)]
    let _ = ansi_term::enable_ansi_support();

    let interrupted = Arc::new(AtomicBool::new(false));
    let int_moved = interrupted.clone();
    ctrlc::set_handler(move || {
        int_moved.store(true, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl-C handler");
    if let Err(error) = main_loop(interrupted) {
        eprintln!("{}", error);
    }
}

fn main_loop(interrupted: Arc<AtomicBool>) -> std::io::Result<()> {
    let interface = Interface::new("forth")?;
    interface.set_prompt("> ")?;
    let mut runtime = match Runtime::new(MEMORY, true) {
        Ok(runtime) => runtime,
        Err(error) => {
            eprintln!("{}", Red.paint(error.to_string()));
            return Ok(());
        }
    };
    interface.write_fmt(format_args!("forth-lang {}\n", env!("CARGO_PKG_VERSION")))?;

    loop {
        if interrupted.load(Ordering::SeqCst) {
            runtime.interrupt();
            interrupted.store(false, Ordering::SeqCst);
        };
        match runtime.execute(CYCLES) {
            Event::Print(s) => {
                interface.write_fmt(format_args!("{}", s))?;
            }
            Event::Ready => match interface.read_line()? {
                ReadResult::Input(input) => {
                    if !input.trim().is_empty() {
                        interface.add_history_unique(input.clone());
                    }
                    runtime.enter(&input);
                }
                ReadResult::Signal(_) | ReadResult::Eof => break,
            },
            Event::Running => {}
            Event::Bye => break,
            Event::Errors(errors) => {
                for error in errors {
                    eprintln!("{}", Red.paint(error.to_string()));
                }
                break;
            }
        }
    }
    Ok(())
}
