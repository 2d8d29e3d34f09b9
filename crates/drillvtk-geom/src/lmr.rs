//! Chainage-to-borehole base coordinates for the L/M/R boreholes.
//!
//! Reproduces the tunnel progress sheet formula, per side `s`:
//!
//! ```text
//! diff  = (distance - reference_distance) * 1000
//! angle = (90 - direction_angle) * PI / 180
//! X_s   = ROUND((-diff * COS(angle) + baseX_s) / 1000, 3)
//! Y_s   = ROUND(( diff * SIN(angle) + baseY_s) / 1000, 3)
//! ```

use crate::frame::{PlanarCoord, ReferenceFrame, Side, SideTable};

/// Default tolerance for [`BaseCoordinates::validate`].
pub const VALIDATION_TOLERANCE: f64 = 0.001;

/// Base XY of each borehole for one chainage distance, in metres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseCoordinates {
    /// Per-side collar coordinates.
    pub sides: SideTable<PlanarCoord>,
    /// Heading used for the computation (degrees).
    pub direction_angle_deg: f64,
    /// Distance from the entrance the coordinates were computed for.
    pub distance: f64,
}

impl BaseCoordinates {
    /// Collar coordinate of `side`.
    pub fn get(&self, side: Side) -> PlanarCoord {
        *self.sides.get(side)
    }

    /// Check `actual` against `expected` per side and axis within `tolerance`.
    ///
    /// Intended for regression checks against sheet values.
    pub fn validate(
        expected: &SideTable<PlanarCoord>,
        actual: &SideTable<PlanarCoord>,
        tolerance: f64,
    ) -> bool {
        Side::ALL.into_iter().all(|side| {
            let e = expected.get(side);
            let a = actual.get(side);
            (e.x - a.x).abs() <= tolerance && (e.y - a.y).abs() <= tolerance
        })
    }

    /// [`BaseCoordinates::validate`] against this result with the default tolerance.
    pub fn matches(&self, expected: &SideTable<PlanarCoord>) -> bool {
        Self::validate(expected, &self.sides, VALIDATION_TOLERANCE)
    }
}

/// Computes per-side base coordinates from a distance from the entrance.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateTransformer<'a> {
    frame: &'a ReferenceFrame,
}

impl<'a> CoordinateTransformer<'a> {
    /// Create a transformer reading `frame`.
    pub fn new(frame: &'a ReferenceFrame) -> Self {
        Self { frame }
    }

    /// Base coordinates using the frame's heading and reference distance.
    pub fn calculate(&self, distance: f64) -> BaseCoordinates {
        self.calculate_with(
            distance,
            self.frame.direction_angle_deg,
            self.frame.reference_distance,
        )
    }

    /// Base coordinates with the heading and reference distance overridden for
    /// this call only.
    pub fn calculate_with(
        &self,
        distance: f64,
        direction_angle_deg: f64,
        reference_distance: f64,
    ) -> BaseCoordinates {
        let diff = (distance - reference_distance) * 1000.0;
        let angle = (90.0 - direction_angle_deg) * std::f64::consts::PI / 180.0;
        let (sin, cos) = angle.sin_cos();

        let sides = self.frame.base.map(|_, base| PlanarCoord {
            x: round3((-diff * cos + base.x) / 1000.0),
            y: round3((diff * sin + base.y) / 1000.0),
        });

        BaseCoordinates {
            sides,
            direction_angle_deg,
            distance,
        }
    }

    /// [`CoordinateTransformer::calculate`] for several distances, in order.
    pub fn calculate_batch(&self, distances: &[f64]) -> Vec<BaseCoordinates> {
        distances.iter().map(|&d| self.calculate(d)).collect()
    }
}

/// Round to 3 decimal places, half away from zero.
fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
