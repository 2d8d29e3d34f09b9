//! Borehole sides and the immutable reference frame every transform reads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::survey::SurveyReference;

/// One of the three parallel boreholes drilled from a tunnel face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// Left borehole.
    #[serde(rename = "L")]
    Left,
    /// Middle (crown) borehole.
    #[serde(rename = "M")]
    Middle,
    /// Right borehole.
    #[serde(rename = "R")]
    Right,
}

impl Side {
    /// All sides in L, M, R order.
    pub const ALL: [Side; 3] = [Side::Left, Side::Middle, Side::Right];

    /// Single-letter code: `L`, `M` or `R`.
    pub fn letter(self) -> char {
        match self {
            Side::Left => 'L',
            Side::Middle => 'M',
            Side::Right => 'R',
        }
    }

    /// Parse a single-letter code, case-insensitive.
    pub fn from_letter(s: &str) -> Option<Side> {
        match s {
            "L" | "l" => Some(Side::Left),
            "M" | "m" => Some(Side::Middle),
            "R" | "r" => Some(Side::Right),
            _ => None,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// A value per side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideTable<T> {
    /// Left side value.
    #[serde(rename = "L")]
    pub left: T,
    /// Middle side value.
    #[serde(rename = "M")]
    pub middle: T,
    /// Right side value.
    #[serde(rename = "R")]
    pub right: T,
}

impl<T> SideTable<T> {
    /// Build a table from one value per side.
    pub fn new(left: T, middle: T, right: T) -> Self {
        Self {
            left,
            middle,
            right,
        }
    }

    /// Value for `side`.
    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Middle => &self.middle,
            Side::Right => &self.right,
        }
    }

    /// Copy of this table with `side` replaced.
    pub fn with(mut self, side: Side, value: T) -> Self {
        match side {
            Side::Left => self.left = value,
            Side::Middle => self.middle = value,
            Side::Right => self.right = value,
        }
        self
    }

    /// Apply `f` to every side.
    pub fn map<U>(&self, mut f: impl FnMut(Side, &T) -> U) -> SideTable<U> {
        SideTable {
            left: f(Side::Left, &self.left),
            middle: f(Side::Middle, &self.middle),
            right: f(Side::Right, &self.right),
        }
    }

    /// Iterate `(side, value)` in L, M, R order.
    pub fn iter(&self) -> impl Iterator<Item = (Side, &T)> {
        Side::ALL.into_iter().map(move |side| (side, self.get(side)))
    }
}

/// Planar (X, Y) coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanarCoord {
    /// Easting.
    pub x: f64,
    /// Northing.
    pub y: f64,
}

impl PlanarCoord {
    /// Create a planar coordinate.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Reference frame tying tunnel chainage to real-world coordinates.
///
/// Constructed once (usually from settings) and passed by reference into every
/// transform. Nothing in the workspace mutates a frame after construction; the
/// `with_*` methods return modified copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceFrame {
    /// Distance from the entrance (m) at which `base` was surveyed.
    pub reference_distance: f64,
    /// Tunnel heading in degrees.
    pub direction_angle_deg: f64,
    /// Base XY per side at `reference_distance`, in millimetres as recorded in
    /// the tunnel progress sheet.
    pub base: SideTable<PlanarCoord>,
    /// Collar elevation per side (m). Boreholes are treated as horizontal.
    pub elevation: SideTable<f64>,
    /// Survey point that chainage distances are measured against.
    pub survey: SurveyReference,
}

impl Default for ReferenceFrame {
    fn default() -> Self {
        Self {
            reference_distance: 967.0,
            direction_angle_deg: 65.588,
            base: SideTable::new(
                PlanarCoord::new(-660689.7596, 733147.0996),
                PlanarCoord::new(-658622.871, 737699.9102),
                PlanarCoord::new(-656556.8108, 742253.072),
            ),
            elevation: SideTable::new(17.3, 21.3, 17.3),
            survey: SurveyReference::default(),
        }
    }
}

impl ReferenceFrame {
    /// Copy with a different tunnel heading.
    pub fn with_direction_angle(&self, direction_angle_deg: f64) -> Self {
        Self {
            direction_angle_deg,
            ..self.clone()
        }
    }

    /// Copy with a different reference distance.
    pub fn with_reference_distance(&self, reference_distance: f64) -> Self {
        Self {
            reference_distance,
            ..self.clone()
        }
    }

    /// Copy with the elevation of one side replaced.
    pub fn with_elevation(&self, side: Side, z: f64) -> Self {
        Self {
            elevation: self.elevation.with(side, z),
            ..self.clone()
        }
    }

    /// Elevation for `side`.
    pub fn elevation_of(&self, side: Side) -> f64 {
        *self.elevation.get(side)
    }
}
