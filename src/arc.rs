// Copyright (c) 2019 Georg Brandl.  Licensed under the Apache License,
// Version 2.0 <LICENSE-APACHE or http://www.apache.org/licenses/LICENSE-2.0>
// or the MIT license <LICENSE-MIT or http://opensource.org/licenses/MIT>, at
// your option. This file may not be copied, modified, or distributed except
// according to those terms.

//! Circular interpolation geometry.
//!
//! Angles are in degrees in `[0, 360)`, measured counter-clockwise from the
//! positive X axis.  The sweep convention follows the renderer: a clockwise
//! arc sweeps from the start angle by `(end - start) mod 360`, a
//! counter-clockwise one by `(start - end) mod 360`.

use strum_macros::Display;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::machine::Position;

/// Rotation sense of an arc move (G2 or G3).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Display)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ArcDirection {
    #[strum(to_string = "clockwise")]
    Clockwise,
    #[strum(to_string = "counter-clockwise")]
    CounterClockwise,
}

/// Everything a renderer needs to draw an arc in the XY plane.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ArcMove {
    pub center: (f64, f64),
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub extent: f64,
    pub direction: ArcDirection,
    /// Position after the move.
    pub end: Position,
}

fn normalize(deg: f64) -> f64 {
    let deg = deg.rem_euclid(360.);
    // rem_euclid rounds tiny negative values up to exactly 360
    if deg >= 360. { 0. } else { deg }
}

/// Angle of the point (`x`, `y`) as seen from `center`.
pub fn angle(center: (f64, f64), x: f64, y: f64) -> f64 {
    normalize((y - center.1).atan2(x - center.0).to_degrees())
}

/// Computes an arc from `from` to `to` around the center `from + (i, j)`.
///
/// Only X and Y take part in the geometry; Z of `to` is carried over as is.
pub fn arc_from_offsets(from: Position, to: Position, i: f64, j: f64,
                        direction: ArcDirection) -> ArcMove {
    let center = (from.x + i, from.y + j);
    let start_angle = angle(center, from.x, from.y);
    let end_angle = angle(center, to.x, to.y);
    let extent = match direction {
        ArcDirection::Clockwise => normalize(end_angle - start_angle),
        ArcDirection::CounterClockwise => normalize(start_angle - end_angle),
    };
    ArcMove {
        center,
        radius: i.hypot(j),
        start_angle,
        end_angle,
        extent,
        direction,
        end: to,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) {
        assert!((a - b).abs() <= 1e-9, "expected {}, got {}", b, a);
    }

    #[test]
    fn test_half_circle_cw() {
        let arc = arc_from_offsets(Position::default(), Position::new(20., 0., 0.),
                                   10., 0., ArcDirection::Clockwise);
        assert_eq!(arc.center, (10., 0.));
        approx(arc.radius, 10.);
        approx(arc.start_angle, 180.);
        approx(arc.end_angle, 0.);
        approx(arc.extent, 180.);
        assert_eq!(arc.end, Position::new(20., 0., 0.));
    }

    #[test]
    fn test_quarter_circles() {
        // from (10, 0) to (0, 10) around the origin
        let from = Position::new(10., 0., 0.);
        let to = Position::new(0., 10., -1.);
        let cw = arc_from_offsets(from, to, -10., 0., ArcDirection::Clockwise);
        approx(cw.start_angle, 0.);
        approx(cw.end_angle, 90.);
        approx(cw.extent, 90.);
        approx(cw.end.z, -1.);

        let ccw = arc_from_offsets(from, to, -10., 0., ArcDirection::CounterClockwise);
        approx(ccw.extent, 270.);
    }

    #[test]
    fn test_angles_stay_in_range() {
        let c = (0., 0.);
        approx(angle(c, 0., -1.), 270.);
        approx(angle(c, -1., -0.), 180.);
        approx(angle(c, 1., -1e-300), 0.);
        for &(x, y) in &[(1., 0.), (0., 1.), (-1., 0.), (0., -1.), (3., -4.)] {
            let a = angle(c, x, y);
            assert!((0. ..360.).contains(&a), "{} out of range", a);
        }
    }

    #[test]
    fn test_full_circle_has_no_extent() {
        let from = Position::new(5., 5., 0.);
        let arc = arc_from_offsets(from, from, 0., 5., ArcDirection::CounterClockwise);
        approx(arc.radius, 5.);
        approx(arc.extent, 0.);
    }
}
