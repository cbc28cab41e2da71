// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::fmt::{self, Formatter};
use itertools::Itertools;
use strum_macros::Display;

/// A parsed program: the blocks of all code lines, in source order.
#[derive(Debug, Default)]
pub struct Program {
    pub filename: String,
    /// Set by the single `O<n>` line, if the file has one.
    pub number: Option<u32>,
    pub blocks: Vec<Block>,
}

/// The commands parsed from one source line.
#[derive(Debug, Default)]
pub struct Block {
    pub lineno: usize,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub letter: Letter,
    /// Everything after the letter, verbatim (e.g. `"01"` for `G01`).
    pub suffix: String,
    pub params: Vec<Parameter>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parameter {
    pub word: Word,
    pub value: f64,
}

/// Letters that start a new command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Letter {
    G, M, T, S,
}

/// Letters that carry a value for the preceding command.
///
/// `R` is only meaningful to arc moves and is never collected from source
/// text by the block parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Word {
    X, Y, Z,
    F,
    I, J,
    R,
}

impl Letter {
    pub fn from_char(ch: char) -> Option<Self> {
        Some(match ch {
            'G' => Letter::G,
            'M' => Letter::M,
            'T' => Letter::T,
            'S' => Letter::S,
            _ => return None
        })
    }
}

impl Word {
    /// Parameter letters the block parser collects.
    pub fn collectable(ch: char) -> Option<Self> {
        Some(match ch {
            'X' => Word::X,
            'Y' => Word::Y,
            'Z' => Word::Z,
            'F' => Word::F,
            'I' => Word::I,
            'J' => Word::J,
            _ => return None
        })
    }
}

impl Command {
    pub fn new(letter: Letter, suffix: impl Into<String>) -> Self {
        Command { letter, suffix: suffix.into(), params: vec![] }
    }

    pub fn with_param(mut self, word: Word, value: f64) -> Self {
        self.params.push(Parameter { word, value });
        self
    }
}

/// Extent of all X and Y values mentioned in a program.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.x_max - self.x_min
    }

    pub fn height(&self) -> f64 {
        self.y_max - self.y_min
    }
}

impl Program {
    /// Total number of commands over all blocks.
    pub fn command_count(&self) -> usize {
        self.blocks.iter().map(|b| b.commands.len()).sum()
    }

    /// Computes the drawing extent from the X/Y parameters of all commands.
    ///
    /// Returns `None` unless there is at least one X and one Y value.
    pub fn bounds(&self) -> Option<Bounds> {
        let values = |word: Word| self.blocks.iter()
            .flat_map(|b| &b.commands)
            .flat_map(|c| &c.params)
            .filter(move |p| p.word == word)
            .map(|p| p.value)
            .minmax_by(|a, b| a.total_cmp(b))
            .into_option();
        let (x_min, x_max) = values(Word::X)?;
        let (y_min, y_max) = values(Word::Y)?;
        Some(Bounds { x_min, x_max, y_min, y_max })
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        if let Some(n) = self.number {
            writeln!(f, "O{}", n)?;
        }
        for block in &self.blocks {
            writeln!(f, "{}", block)?;
        }
        Ok(())
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.commands.iter().join(" "))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}{}", self.letter, self.suffix)?;
        for par in &self.params {
            write!(f, " {}", par)?;
        }
        Ok(())
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}{}", self.word, self.value)
    }
}
