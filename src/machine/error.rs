// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

use strum_macros::Display;
use thiserror::Error;

use super::enums::*;

/// Broad category of an `ExecError`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
pub enum ErrorKind {
    InvalidState,
    UnsupportedFeature,
    UnrecognizedCommand,
}

/// An error executing a single command.
///
/// These never abort a program run and never leave a partially applied
/// operation behind.
#[derive(Error, Clone, PartialEq, Debug)]
pub enum ExecError {
    #[error("distance mode not set, cannot move")]
    NoDistanceMode,
    #[error("unknown feed rate mode, cannot set feed rate")]
    NoFeedMode,
    #[error("feed rate mode {0} not implemented")]
    FeedModeNotImplemented(FeedMode),
    #[error("spindle speed must be non-negative, got {0}")]
    NegativeSpindleSpeed(f64),
    #[error("arc move requires either I/J or R parameters")]
    MissingArcParameters,
    #[error("radius-based arcs are not implemented")]
    RadiusArc,
    #[error("unknown command {0}")]
    UnrecognizedCommand(String),
}

impl ExecError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExecError::NoDistanceMode |
            ExecError::NoFeedMode |
            ExecError::FeedModeNotImplemented(_) |
            ExecError::NegativeSpindleSpeed(_) |
            ExecError::MissingArcParameters => ErrorKind::InvalidState,
            ExecError::RadiusArc => ErrorKind::UnsupportedFeature,
            ExecError::UnrecognizedCommand(_) => ErrorKind::UnrecognizedCommand,
        }
    }
}
