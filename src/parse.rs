// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use itertools::Itertools;
use pest_derive::Parser;
use pest::{Parser, Span, error::{Error as PestError, ErrorVariant}, iterators::Pair};
use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::*;

#[derive(Parser)]
#[grammar = "gcode.pest"]
pub struct GcodeParser;

type ParseResult<T> = Result<T, PestError<Rule>>;

/// Number of `%` marker lines a valid file contains.
pub const MARKER_LINES: usize = 2;

/// Errors that prevent a program from being loaded at all.
#[derive(Error, Debug)]
pub enum FileFormatError {
    #[error("invalid number of data markers ({0}, should have 2)")]
    MarkerCount(usize),
    #[error("line {lineno}: multiple program numbers found")]
    MultipleProgramNumbers { lineno: usize },
    #[error(transparent)]
    Syntax(#[from] Box<PestError<Rule>>),
}

/// What a single source line is, before any tokenizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Marker,
    Comment,
    ProgramNumber(u32),
    Code,
}

/// Classifies one line of program text, as written in the file.
///
/// The program number marker must be an upper-case `O`.
pub fn classify(line: &str) -> LineKind {
    if line.starts_with('%') {
        return LineKind::Marker;
    }
    let text = line.trim();
    if text.len() > 1 && text.starts_with('(') && text.ends_with(')') {
        return LineKind::Comment;
    }
    // "O" followed by something that is not a positive integer is just an
    // ignored code line.
    match text.strip_prefix('O').and_then(|n| n.parse::<u32>().ok()) {
        Some(n) if n > 0 => LineKind::ProgramNumber(n),
        _ => LineKind::Code,
    }
}

/// Checks that the input has exactly two marker lines.
///
/// Lines end at `\n`, `\r\n` or a lone `\r`, like in the grammar.
pub fn check_markers(input: &str) -> Result<(), FileFormatError> {
    let markers = input.split(|c: char| c == '\n' || c == '\r')
        .filter(|line| line.starts_with('%'))
        .count();
    if markers != MARKER_LINES {
        return Err(FileFormatError::MarkerCount(markers));
    }
    Ok(())
}

fn err<T>(span: Span, msg: impl Into<String>) -> ParseResult<T> {
    Err(PestError::new_from_span(ErrorVariant::CustomError { message: msg.into() }, span))
}

fn make_value(pair: &Pair<Rule>) -> ParseResult<f64> {
    match pair.as_str().parse() {
        Ok(v) => Ok(v),
        Err(_) => err(pair.as_span(), format!("invalid number {:?}", pair.as_str())),
    }
}

/// Splits a code line into commands.
///
/// Parameter words are attached to the last command, but only once a G word
/// has been seen on the line; before that they are dropped.
fn make_block(lineno: usize, line: Pair<Rule>) -> ParseResult<Option<Block>> {
    let mut commands: Vec<Command> = vec![];
    let mut gcode_seen = false;
    for token in line.into_inner() {
        if token.as_rule() != Rule::word {
            continue;
        }
        let (letter, value) = token.into_inner().collect_tuple().expect("children");
        let ch = letter.as_str().chars().next().expect("one letter");
        if ch == 'N' {
            // line numbers are accepted but ignored
            continue;
        }
        if let Some(letter) = Letter::from_char(ch) {
            if letter == Letter::G {
                gcode_seen = true;
            }
            commands.push(Command::new(letter, value.as_str()));
        } else if let Some(word) = Word::collectable(ch) {
            match commands.last_mut() {
                Some(cmd) if gcode_seen => cmd.params.push(Parameter {
                    word,
                    value: make_value(&value)?,
                }),
                _ => trace!(lineno, %word, "parameter before first G word dropped"),
            }
        }
    }
    if commands.is_empty() {
        return Ok(None);
    }
    debug!(lineno, commands = commands.len(), "parsed block");
    Ok(Some(Block { lineno, commands }))
}

/// Loads a program from its source text.
///
/// Fails without producing anything if the marker lines are wrong, the
/// program number is declared twice, or a collected parameter has a
/// non-numeric value.
pub fn parse(filename: &str, input: &str) -> Result<Program, FileFormatError> {
    check_markers(input)?;
    // ASCII-only, so that line spans stay valid in `input`
    let text = input.to_ascii_uppercase();
    let with_path = |e: PestError<Rule>| Box::new(e.with_path(filename));
    let lines = GcodeParser::parse(Rule::file, &text).map_err(with_path)?;
    let mut prog = Program { filename: filename.into(), number: None, blocks: vec![] };
    for (n, line) in lines.filter(|p| p.as_rule() == Rule::line).enumerate() {
        let lineno = n + 1;
        let span = line.as_span();
        match classify(&input[span.start()..span.end()]) {
            LineKind::Marker | LineKind::Comment => (),
            LineKind::ProgramNumber(number) => {
                if prog.number.is_some() {
                    return Err(FileFormatError::MultipleProgramNumbers { lineno });
                }
                prog.number = Some(number);
            }
            LineKind::Code => {
                if let Some(block) = make_block(lineno, line).map_err(with_path)? {
                    prog.blocks.push(block);
                }
            }
        }
    }
    debug!(blocks = prog.blocks.len(), commands = prog.command_count(), "program loaded");
    Ok(prog)
}
