// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

mod enums;
mod error;
mod status;

use tracing::{trace, warn};

use crate::arc::{self, ArcDirection, ArcMove};
use crate::ast::{Parameter, Word};

pub use self::enums::*;
pub use self::error::*;
pub use self::status::*;

/// Changes below this magnitude do not move an axis.
pub const MOVE_TOLERANCE: f64 = 0.001;

/// Factor converting the programmed feed value to the stored per-minute rate.
pub const FEED_RATE_FACTOR: f64 = 60.;

/// The modal state machine.
///
/// Owns the state of one session and reports every change to its status
/// sink.  Operations that can be refused return an `ExecError` without
/// touching the state they govern.  A refused G0/G1 move still keeps the
/// motion mode it declared.
pub struct Machine<S> {
    state: MachineState,
    sink: S,
}

impl<S: StatusSink> Machine<S> {
    pub fn new(sink: S) -> Self {
        Machine { state: MachineState::default(), sink }
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub(crate) fn report(&mut self, status: Status) {
        self.sink.report(status);
    }

    /// Logs a refused operation and reports it to the sink.
    pub(crate) fn report_error(&mut self, error: ExecError) {
        warn!(kind = %error.kind(), "{}", error);
        self.report(Status::Error(error));
    }

    // -- modal setters --

    pub fn set_plane(&mut self, plane: Plane) {
        self.state.plane = plane;
        self.report(Status::PlaneSet(plane));
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.state.unit = unit;
        self.report(Status::UnitSet(unit));
    }

    pub fn set_distance_mode(&mut self, mode: DistanceMode) {
        self.state.distance_mode = mode;
        self.report(Status::DistanceModeSet(mode));
    }

    pub fn set_feed_mode(&mut self, mode: FeedMode) {
        self.state.feed.mode = mode;
        self.report(Status::FeedModeSet(mode));
    }

    /// Sets the feed rate, interpreted according to the feed mode.
    ///
    /// Only units/min is implemented; the value is stored multiplied by 60.
    pub fn set_feed_rate(&mut self, value: f64) -> Result<(), ExecError> {
        match self.state.feed.mode {
            FeedMode::Undefined => Err(ExecError::NoFeedMode),
            FeedMode::UnitsPerMin => {
                self.state.feed.rate = value * FEED_RATE_FACTOR;
                Ok(())
            }
            mode => Err(ExecError::FeedModeNotImplemented(mode)),
        }
    }

    pub fn set_spindle_mode(&mut self, mode: SpindleMode) {
        self.state.spindle.mode = mode;
        self.state.spindle.active = matches!(mode, SpindleMode::Cw | SpindleMode::Ccw);
        self.report(Status::SpindleModeSet(mode));
    }

    pub fn set_spindle_speed(&mut self, speed: f64) -> Result<(), ExecError> {
        if speed < 0. {
            return Err(ExecError::NegativeSpindleSpeed(speed));
        }
        self.state.spindle.speed = speed;
        self.report(Status::SpindleSpeed(speed));
        Ok(())
    }

    pub fn set_coord_system(&mut self, id: u8) {
        self.state.coord_system = Some(id);
        self.report(Status::CoordSystem(id));
    }

    pub fn change_tool(&mut self, name: impl Into<String>) {
        self.state.tool_name = name.into();
        self.report(Status::ToolChanged(self.state.tool_name.clone()));
    }

    pub fn manual_tool_change(&mut self) {
        self.report(Status::ManualToolChange(self.state.tool_name.clone()));
    }

    pub fn set_coolant(&mut self, on: bool) {
        self.state.coolant_on = on;
        self.report(Status::Coolant(on));
    }

    pub fn cancel_cutter_comp(&mut self) {
        self.report(Status::CutterCompOff);
    }

    pub fn cancel_length_comp(&mut self) {
        self.report(Status::LengthCompCancelled);
    }

    pub fn cancel_canned_cycle(&mut self) {
        self.report(Status::CannedCycleCancelled);
    }

    /// Resets the machine to its end-of-program modes, in a fixed order.
    pub fn program_end(&mut self) {
        self.report(Status::ProgramEnd);
        self.set_coord_system(1);
        self.set_plane(Plane::XY);
        self.set_distance_mode(DistanceMode::Absolute);
        self.set_feed_mode(FeedMode::UnitsPerMin);
        self.set_spindle_mode(SpindleMode::Halt);
        self.set_motion_mode(MotionMode::Linear);
        self.set_coolant(false);
    }

    fn set_motion_mode(&mut self, mode: MotionMode) {
        self.state.motion_mode = mode;
        self.report(Status::MotionModeSet(mode));
    }

    // -- motion --

    /// Rapid move (G0).  Without parameters only the motion mode is set.
    pub fn rapid_move(&mut self, params: &[Parameter]) -> Result<(), ExecError> {
        if params.is_empty() {
            self.set_motion_mode(MotionMode::Rapid);
            return Ok(());
        }
        self.state.motion_mode = MotionMode::Rapid;
        let (x, y, z) = self.axis_words(params);
        self.move_to(x, y, z)
    }

    /// Linear move (G1).  Without parameters only the motion mode is set.
    ///
    /// An F word updates the feed rate before moving; if that is refused,
    /// the error is reported and the move still happens.
    pub fn linear_move(&mut self, params: &[Parameter]) -> Result<(), ExecError> {
        if params.is_empty() {
            self.set_motion_mode(MotionMode::Linear);
            return Ok(());
        }
        self.state.motion_mode = MotionMode::Linear;
        for par in params.iter().filter(|p| p.word == Word::F) {
            if let Err(e) = self.set_feed_rate(par.value) {
                self.report_error(e);
            }
        }
        let (x, y, z) = self.axis_words(params);
        self.move_to(x, y, z)
    }

    /// Target coordinates from X/Y/Z words; missing axes default to the
    /// current position.
    fn axis_words(&self, params: &[Parameter]) -> (f64, f64, f64) {
        // XXX: in incremental mode the defaults are added again as offsets,
        // so unnamed axes travel by their current coordinate.
        let mut target = self.state.position;
        for par in params {
            if let Some(axis) = Axis::from_word(par.word) {
                target.set(axis, par.value);
            }
        }
        (target.x, target.y, target.z)
    }

    /// Moves to the given coordinates, interpreted in the distance mode.
    ///
    /// When the tool rises or stays level, Z moves first, then X and Y.
    /// When it plunges, X and Y move first and Z last.
    pub fn move_to(&mut self, x: f64, y: f64, z: f64) -> Result<(), ExecError> {
        let current = self.state.position;
        let target = match self.state.distance_mode {
            DistanceMode::Absolute => Position::new(x, y, z),
            DistanceMode::Incremental => Position::new(current.x + x, current.y + y, current.z + z),
            DistanceMode::Undefined => return Err(ExecError::NoDistanceMode),
        };
        self.report(Status::MoveTo { target, unit: self.state.unit });
        if self.state.motion_mode == MotionMode::Linear {
            let feed = self.state.feed;
            self.report(Status::FeedInUse { rate: feed.rate, mode: feed.mode });
        }

        let order = if target.z >= current.z {
            [Axis::Z, Axis::X, Axis::Y]
        } else {
            [Axis::X, Axis::Y, Axis::Z]
        };
        for &axis in &order {
            if (target.get(axis) - current.get(axis)).abs() >= MOVE_TOLERANCE {
                self.move_axis(axis, target.get(axis));
            }
        }
        Ok(())
    }

    fn move_axis(&mut self, axis: Axis, value: f64) {
        trace!(%axis, value, "axis move");
        self.state.position.set(axis, value);
        self.report(Status::AxisMove { axis, value, unit: self.state.unit });
    }

    /// Arc move (G2/G3) in the XY plane.
    ///
    /// Needs both I and J; R is recognized but not implemented.  X/Y/Z give
    /// the end point, missing ones default to the current position.
    pub fn arc_move(&mut self, params: &[Parameter], direction: ArcDirection)
                    -> Result<ArcMove, ExecError> {
        if params.is_empty() {
            return Err(ExecError::MissingArcParameters);
        }
        let mut to = self.state.position;
        let (mut i, mut j, mut r) = (None, None, None);
        for par in params {
            match par.word {
                Word::X => to.x = par.value,
                Word::Y => to.y = par.value,
                Word::Z => to.z = par.value,
                Word::I => i = Some(par.value),
                Word::J => j = Some(par.value),
                Word::R => r = Some(par.value),
                Word::F => (),
            }
        }
        let arc = match (i, j, r) {
            (Some(i), Some(j), _) => arc::arc_from_offsets(self.state.position, to, i, j, direction),
            (_, _, Some(_)) => return Err(ExecError::RadiusArc),
            _ => return Err(ExecError::MissingArcParameters),
        };
        self.report(Status::Arc(arc));
        self.state.position = arc.end;
        Ok(arc)
    }

    /// Homing (G28).
    ///
    /// Named axes first travel to their programmed value (as an offset in
    /// incremental mode), then every named axis is driven to 0.
    pub fn home(&mut self, params: &[Parameter]) {
        let axes = params.iter()
            .filter_map(|p| Axis::from_word(p.word).map(|axis| (axis, p.value)))
            .collect::<Vec<_>>();
        for &(axis, value) in &axes {
            match self.state.distance_mode {
                DistanceMode::Incremental => {
                    let target = self.state.position.get(axis) + value;
                    self.move_axis(axis, target)
                }
                DistanceMode::Absolute => self.move_axis(axis, value),
                DistanceMode::Undefined => (),
            }
        }
        // XXX: this always overrides the travel above; unclear if intended.
        self.report(Status::Homing);
        for &(axis, _) in &axes {
            self.move_axis(axis, 0.);
        }
    }
}
