// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::ops::ControlFlow;
use tracing::debug;

use crate::arc::{ArcDirection, ArcMove};
use crate::ast::*;
use crate::machine::*;
use crate::util::code_number;

/// Represents all commands the machine understands.
///
/// Each G or M code maps to exactly one variant; codes not listed here are
/// rejected by `Instr::decode`.
#[derive(Clone, PartialEq, Debug)]
pub enum Instr {
    // G codes
    RapidMove,                      // G0
    LinearMove,                     // G1
    ArcMove(ArcDirection),          // G2-3
    PlaneSelect(Plane),             // G17-19
    Units(Unit),                    // G20-21
    Home,                           // G28
    CutterCompOff,                  // G40
    LengthCompOff,                  // G49
    CoordSystem(u8),                // G54-59
    CannedCycleOff,                 // G80
    DistanceMode(DistanceMode),     // G90-91
    FeedMode(FeedMode),             // G93-95

    // M codes
    Spindle(SpindleMode),           // M3-5
    ManualToolChange,               // M6
    Coolant(bool),                  // M7-9
    ProgramEnd,                     // M30

    // Others
    ToolChange(String),             // T
    SpindleSpeed(i64),              // S
}

impl Instr {
    pub fn decode(cmd: &Command) -> Result<Self, ExecError> {
        let unknown = || ExecError::UnrecognizedCommand(format!("{}{}", cmd.letter, cmd.suffix));
        Ok(match cmd.letter {
            Letter::G => match code_number(&cmd.suffix, 100).ok_or_else(unknown)? {
                0  => Instr::RapidMove,
                1  => Instr::LinearMove,
                2  => Instr::ArcMove(ArcDirection::Clockwise),
                3  => Instr::ArcMove(ArcDirection::CounterClockwise),
                17 => Instr::PlaneSelect(Plane::XY),
                18 => Instr::PlaneSelect(Plane::ZX),
                19 => Instr::PlaneSelect(Plane::YZ),
                20 => Instr::Units(Unit::Inch),
                21 => Instr::Units(Unit::Mm),
                28 => Instr::Home,
                40 => Instr::CutterCompOff,
                49 => Instr::LengthCompOff,
                n @ 54..=59 => Instr::CoordSystem(n as u8 - 53),
                80 => Instr::CannedCycleOff,
                90 => Instr::DistanceMode(DistanceMode::Absolute),
                91 => Instr::DistanceMode(DistanceMode::Incremental),
                93 => Instr::FeedMode(FeedMode::InverseTime),
                94 => Instr::FeedMode(FeedMode::UnitsPerMin),
                95 => Instr::FeedMode(FeedMode::UnitsPerRev),
                _ => return Err(unknown()),
            },
            Letter::M => match code_number(&cmd.suffix, 100).ok_or_else(unknown)? {
                3  => Instr::Spindle(SpindleMode::Cw),
                4  => Instr::Spindle(SpindleMode::Ccw),
                5  => Instr::Spindle(SpindleMode::Halt),
                6  => Instr::ManualToolChange,
                7 | 8 => Instr::Coolant(true),
                9  => Instr::Coolant(false),
                30 => Instr::ProgramEnd,
                _ => return Err(unknown()),
            },
            Letter::T => Instr::ToolChange(format!("TOOL #{}", cmd.suffix)),
            Letter::S => Instr::SpindleSpeed(cmd.suffix.parse().map_err(|_| unknown())?),
        })
    }
}

/// What the observer of `Interpreter::run` sees after each command.
#[derive(Debug)]
pub struct Step<'a> {
    /// Index of the block within the program.
    pub block: usize,
    pub lineno: usize,
    pub command: &'a Command,
    /// The state after executing the command.
    pub state: &'a MachineState,
    pub arc: Option<&'a ArcMove>,
    pub error: Option<&'a ExecError>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct RunSummary {
    pub executed: usize,
    /// Commands that failed.  A refused F word inside a G1 that still moved
    /// is only reported.
    pub errors: usize,
    /// Whether the observer ended the run early.
    pub stopped: bool,
}

/// The Interpreter executes parsed commands against a single machine.
///
/// Every session starts from a fresh, all-undefined machine state.  Errors
/// are local to the failing command: they are reported to the status sink
/// and execution continues with the next command.
pub struct Interpreter<S> {
    machine: Machine<S>,
}

impl<S: StatusSink> Interpreter<S> {
    pub fn new(sink: S) -> Self {
        Interpreter { machine: Machine::new(sink) }
    }

    pub fn machine(&self) -> &Machine<S> {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine<S> {
        &mut self.machine
    }

    pub fn into_machine(self) -> Machine<S> {
        self.machine
    }

    pub fn state(&self) -> &MachineState {
        self.machine.state()
    }

    /// Executes a single command.
    ///
    /// Returns the arc descriptor for arc moves.
    pub fn execute(&mut self, command: &Command) -> Result<Option<ArcMove>, ExecError> {
        debug!(%command, "executing");
        let result = Instr::decode(command).and_then(|instr| self.apply(instr, &command.params));
        if let Err(e) = &result {
            self.machine.report_error(e.clone());
        }
        result
    }

    /// Executes all commands of `program` in order.
    ///
    /// `observe` is called after every command; returning `Break` stops the
    /// run before the next one.
    pub fn run<F>(&mut self, program: &Program, mut observe: F) -> RunSummary
    where F: FnMut(Step) -> ControlFlow<()>
    {
        let mut summary = RunSummary::default();
        for (i, block) in program.blocks.iter().enumerate() {
            for command in &block.commands {
                let result = self.execute(command);
                summary.executed += 1;
                if result.is_err() {
                    summary.errors += 1;
                }
                let step = Step {
                    block: i,
                    lineno: block.lineno,
                    command,
                    state: self.machine.state(),
                    arc: result.as_ref().ok().and_then(|arc| arc.as_ref()),
                    error: result.as_ref().err(),
                };
                if observe(step).is_break() {
                    summary.stopped = true;
                    return summary;
                }
            }
        }
        summary
    }

    fn apply(&mut self, instr: Instr, params: &[Parameter]) -> Result<Option<ArcMove>, ExecError> {
        let m = &mut self.machine;
        match instr {
            Instr::RapidMove => m.rapid_move(params)?,
            Instr::LinearMove => m.linear_move(params)?,
            Instr::ArcMove(dir) => return m.arc_move(params, dir).map(Some),
            Instr::PlaneSelect(plane) => m.set_plane(plane),
            Instr::Units(unit) => m.set_unit(unit),
            Instr::Home => m.home(params),
            Instr::CutterCompOff => m.cancel_cutter_comp(),
            Instr::LengthCompOff => m.cancel_length_comp(),
            Instr::CoordSystem(id) => m.set_coord_system(id),
            Instr::CannedCycleOff => m.cancel_canned_cycle(),
            Instr::DistanceMode(mode) => m.set_distance_mode(mode),
            Instr::FeedMode(mode) => m.set_feed_mode(mode),
            Instr::Spindle(mode) => m.set_spindle_mode(mode),
            Instr::ManualToolChange => m.manual_tool_change(),
            Instr::Coolant(on) => m.set_coolant(on),
            Instr::ProgramEnd => m.program_end(),
            Instr::ToolChange(name) => m.change_tool(name),
            Instr::SpindleSpeed(speed) => m.set_spindle_speed(speed as f64)?,
        }
        Ok(None)
    }
}
