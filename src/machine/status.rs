// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::fmt;
use tracing::{info, warn};

use crate::arc::ArcMove;
use super::enums::*;
use super::error::ExecError;

/// A progress or error report from the machine.
///
/// The `Display` form is the human-readable status line.
#[derive(Clone, PartialEq, Debug)]
pub enum Status {
    PlaneSet(Plane),
    UnitSet(Unit),
    DistanceModeSet(DistanceMode),
    FeedModeSet(FeedMode),
    MotionModeSet(MotionMode),
    SpindleModeSet(SpindleMode),
    SpindleSpeed(f64),
    CoordSystem(u8),
    ToolChanged(String),
    ManualToolChange(String),
    Coolant(bool),
    CutterCompOff,
    LengthCompCancelled,
    CannedCycleCancelled,
    ProgramEnd,
    Homing,
    /// Start of a straight move to the given target.
    MoveTo { target: Position, unit: Unit },
    FeedInUse { rate: f64, mode: FeedMode },
    /// A single axis reached a new value.
    AxisMove { axis: Axis, value: f64, unit: Unit },
    Arc(ArcMove),
    Error(ExecError),
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Status::PlaneSet(p) => write!(f, "Plane set to {}", p),
            Status::UnitSet(u) => write!(f, "Unit of measure set to {}", u),
            Status::DistanceModeSet(m) => write!(f, "Setting distance mode to {}", m),
            Status::FeedModeSet(m) => write!(f, "Feed rate mode set to {}", m),
            Status::MotionModeSet(m) => write!(f, "Setting motion mode to {}", m),
            Status::SpindleModeSet(m) => write!(f, "Setting spindle mode to {}", m),
            Status::SpindleSpeed(s) => write!(f, "Using spindle speed {} [rpm].", s),
            Status::CoordSystem(n) => write!(f, "Selecting coordinate system #{}", n),
            Status::ToolChanged(t) => write!(f, "Changing tool '{}'.", t),
            Status::ManualToolChange(t) => write!(f, "Manual tool change to '{}' requested", t),
            Status::Coolant(true) => write!(f, "Coolant turned on."),
            Status::Coolant(false) => write!(f, "Coolant turned off."),
            Status::CutterCompOff => write!(f, "Cutter compensation turned OFF"),
            Status::LengthCompCancelled => write!(f, "Tool length compensation CANCELED"),
            Status::CannedCycleCancelled => write!(f, "Canned cycles CANCELED"),
            Status::ProgramEnd => write!(f, "Program end reached."),
            Status::Homing => write!(f, "Moving selected axes to home."),
            Status::MoveTo { target, unit } => write!(f, "Moving to {} [{}].", target, unit),
            Status::FeedInUse { rate, mode } => write!(f, "Using feed rate F={:.3} {}", rate, mode),
            Status::AxisMove { axis, value, unit } =>
                write!(f, "Moving {} to {:.3} [{}].", axis, value, unit),
            Status::Arc(arc) =>
                write!(f, "Moving in a {} arc to X={} Y={} with center ({}, {}).",
                       arc.direction, arc.end.x, arc.end.y, arc.center.0, arc.center.1),
            Status::Error(e) => write!(f, "Error: {}", e),
        }
    }
}

/// Receiver of the machine's status reports.
pub trait StatusSink {
    fn report(&mut self, status: Status);
}

impl<F: FnMut(Status)> StatusSink for F {
    fn report(&mut self, status: Status) {
        self(status)
    }
}

/// Discards all reports.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl StatusSink for Silent {
    fn report(&mut self, _: Status) {}
}

/// Keeps all reports, in order.
#[derive(Clone, Debug, Default)]
pub struct Recorder(pub Vec<Status>);

impl Recorder {
    pub fn errors(&self) -> impl Iterator<Item = &ExecError> {
        self.0.iter().filter_map(|s| match s {
            Status::Error(e) => Some(e),
            _ => None,
        })
    }

    /// The status lines, as they would be printed.
    pub fn lines(&self) -> Vec<String> {
        self.0.iter().map(|s| s.to_string()).collect()
    }
}

impl StatusSink for Recorder {
    fn report(&mut self, status: Status) {
        self.0.push(status);
    }
}

/// Forwards reports to `tracing`: errors at WARN level, the rest at INFO.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl StatusSink for TracingSink {
    fn report(&mut self, status: Status) {
        match status {
            Status::Error(e) => warn!(kind = %e.kind(), "{}", e),
            other => info!("{}", other),
        }
    }
}
