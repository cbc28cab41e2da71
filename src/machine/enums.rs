// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use std::fmt;
use strum_macros::Display;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::Word;

/// A linear machine axis.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    X, Y, Z,
}

impl Axis {
    pub fn from_word(word: Word) -> Option<Self> {
        Some(match word {
            Word::X => Axis::X,
            Word::Y => Axis::Y,
            Word::Z => Axis::Z,
            _ => return None
        })
    }
}

/// A plane as selected by G17-G19.
///
/// The U/V/W planes exist for completeness; no command selects them.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Plane {
    #[strum(to_string = "UNDEFINED")]
    Undefined,
    #[strum(to_string = "X/Y")]
    XY,
    #[strum(to_string = "X/Z")]
    ZX,
    #[strum(to_string = "Y/Z")]
    YZ,
    #[strum(to_string = "U/V")]
    UV,
    #[strum(to_string = "W/U")]
    WU,
    #[strum(to_string = "V/W")]
    VW,
}

impl Default for Plane {
    fn default() -> Self { Plane::Undefined }
}

/// Length unit as selected by G20/G21.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Unit {
    #[strum(to_string = "UNDEFINED")]
    Undefined,
    #[strum(to_string = "MILLIMETRES")]
    Mm,
    #[strum(to_string = "INCHES")]
    Inch,
}

impl Default for Unit {
    fn default() -> Self { Unit::Undefined }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DistanceMode {
    #[strum(to_string = "UNDEFINED")]
    Undefined,
    #[strum(to_string = "ABSOLUTE")]
    Absolute,
    #[strum(to_string = "INCREMENTAL")]
    Incremental,
}

impl Default for DistanceMode {
    fn default() -> Self { DistanceMode::Undefined }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MotionMode {
    #[strum(to_string = "UNDEFINED")]
    Undefined,
    #[strum(to_string = "RAPID")]
    Rapid,
    #[strum(to_string = "LINEAR")]
    Linear,
}

impl Default for MotionMode {
    fn default() -> Self { MotionMode::Undefined }
}

/// How the F word is to be interpreted (G93-G95).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FeedMode {
    #[strum(to_string = "UNDEFINED")]
    Undefined,
    #[strum(to_string = "INVERSE TIME")]
    InverseTime,
    #[strum(to_string = "UNITS/MIN")]
    UnitsPerMin,
    #[strum(to_string = "UNITS/REV")]
    UnitsPerRev,
}

impl Default for FeedMode {
    fn default() -> Self { FeedMode::Undefined }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpindleMode {
    #[strum(to_string = "UNDEFINED")]
    Undefined,
    #[strum(to_string = "CLOCKWISE")]
    Cw,
    #[strum(to_string = "COUNTER-CLOCKWISE")]
    Ccw,
    #[strum(to_string = "HALT")]
    Halt,
}

impl Default for SpindleMode {
    fn default() -> Self { SpindleMode::Undefined }
}

/// A point in machine coordinates, in the currently selected unit.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Position { x, y, z }
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "X={:.3} Y={:.3} Z={:.3}", self.x, self.y, self.z)
    }
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Feed {
    /// Always stored per minute.
    pub rate: f64,
    pub mode: FeedMode,
}

#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Spindle {
    pub active: bool,
    /// Revolutions per minute, never negative.
    pub speed: f64,
    pub mode: SpindleMode,
}

/// The complete modal state of one interpreter session.
///
/// A fresh state has every mode undefined and sits at the origin.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MachineState {
    pub position: Position,
    pub plane: Plane,
    pub unit: Unit,
    pub distance_mode: DistanceMode,
    pub motion_mode: MotionMode,
    pub feed: Feed,
    pub spindle: Spindle,
    pub coolant_on: bool,
    pub tool_name: String,
    /// Last selected coordinate system (1-6); offsets are not modeled.
    pub coord_system: Option<u8>,
}
