//! World coordinates, headings and facing arcs.

use core::f64::consts::TAU;

/// Number of heading units in a full turn.
pub const HEADING_UNITS: u16 = 4096;

/// Absolute world coordinates in distance units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const ORIGIN: Position = Position { x: 0, y: 0, z: 0 };

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance truncated to whole units.
    pub fn distance_to(&self, other: &Position) -> u32 {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        let dz = f64::from(other.z) - f64::from(self.z);
        (dx * dx + dy * dy + dz * dz).sqrt() as u32
    }

    /// Heading that points from `self` towards `other`.
    pub fn heading_to(&self, other: &Position) -> Heading {
        let dx = f64::from(other.x) - f64::from(self.x);
        let dy = f64::from(other.y) - f64::from(self.y);
        let mut units = (-dx).atan2(dy) * f64::from(HEADING_UNITS) / TAU;
        if units < 0.0 {
            units += f64::from(HEADING_UNITS);
        }
        Heading::new(units as u16)
    }
}

/// Facing direction, `HEADING_UNITS` per full turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heading(u16);

impl Heading {
    pub const fn new(units: u16) -> Self {
        Self(units % HEADING_UNITS)
    }

    pub const fn units(self) -> u16 {
        self.0
    }

    /// Builds a heading from degrees, wrapping out-of-range values.
    pub fn from_degrees(degrees: f64) -> Self {
        let wrapped = degrees.rem_euclid(360.0);
        Self::new((wrapped * f64::from(HEADING_UNITS) / 360.0) as u16)
    }
}

/// Returns `true` when `other` lies inside the `arc_degrees` cone centered on
/// `heading` as seen from `origin`.
///
/// A target standing exactly on `origin` counts as in front.
pub fn is_in_front(origin: &Position, heading: Heading, other: &Position, arc_degrees: u16) -> bool {
    if origin.x == other.x && origin.y == other.y {
        return true;
    }

    let relative = origin.heading_to(other).units().wrapping_sub(heading.units()) & 0x0FFF;
    let angle = f64::from(relative) * 360.0 / f64::from(HEADING_UNITS);
    let half = f64::from(arc_degrees) / 2.0;

    angle >= 360.0 - half || angle < half
}
