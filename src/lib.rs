// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! A parser and modal-state interpreter for simple, line-oriented G-code
//! programs.
//!
//! A program file is plain text framed by two `%` marker lines.  It may
//! declare its number with a single `O<n>` line, and contains comment lines
//! in parentheses and code lines made of whitespace-separated words like
//! `N10 G01 X10 Y5 F200`.
//!
//! Code words are case-insensitive, but the program number line must start
//! with an upper-case `O`; `o55` is an ignored code line.  G and M codes are
//! compared by value, so `G0`, `G00` and `G000` are the same command, while
//! fractional codes like `G1.5` are unrecognized.
//!
//! ## Basic usage
//!
//! Use `ncmachine::parse::parse` to load a `Program` (see `ncmachine::ast`),
//! then feed it to an `interp::Interpreter`, which owns the machine state and
//! executes one command at a time.  Status lines go to a `StatusSink` of your
//! choice; the state after every command is handed to the `run` observer.
//!
//! ```rust,no_run
//! use std::{env, fs, ops::ControlFlow};
//! use ncmachine::parse::parse;
//! use ncmachine::interp::Interpreter;
//! use ncmachine::machine::Status;
//!
//! fn main() {
//!     let filename = env::args().nth(1).unwrap();
//!     let input = fs::read_to_string(&filename).unwrap();
//!
//!     match parse(&filename, &input) {
//!         Err(e) => eprintln!("Error: {}", e),
//!         Ok(prog) => {
//!             let mut interp = Interpreter::new(|status: Status| println!("{}", status));
//!             interp.run(&prog, |step| {
//!                 println!("{} -> {}", step.command, step.state.position);
//!                 ControlFlow::Continue(())
//!             });
//!         }
//!     }
//! }
//! ```
//!
//! ## Unsupported features
//!
//! Canned cycles, cutter and tool length compensation, radius-specified arcs,
//! coordinate system offsets and subroutines are not supported.  Their codes
//! are either acknowledged without effect or rejected with an error.

pub mod ast;
pub mod parse;
pub mod arc;
pub mod machine;
pub mod interp;

// internal helpers
pub(crate) mod util;
