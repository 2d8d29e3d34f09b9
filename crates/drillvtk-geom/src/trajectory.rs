//! Projection of depth samples along a borehole into 3D points.
//!
//! Each sample is placed `depth` metres from the collar along the tunnel
//! heading: `x = baseX - depth * sin(angle)`, `y = baseY + depth * cos(angle)`.
//! The borehole is treated as horizontal, so `z` is the side's collar elevation
//! for every sample.

use nalgebra::{Point2, Point3, Vector2};

use crate::error::{GeomError, Result};
use crate::frame::{PlanarCoord, ReferenceFrame, Side};
use crate::lmr::BaseCoordinates;
use crate::MIN_POLYLINE_POINTS;

/// One measurement along a borehole.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthSample {
    /// Distance along the hole from the collar (m).
    pub depth: f64,
    /// Measured value at that depth.
    pub value: f64,
}

impl DepthSample {
    /// Create a depth sample.
    pub fn new(depth: f64, value: f64) -> Self {
        Self { depth, value }
    }
}

impl From<(f64, f64)> for DepthSample {
    fn from((depth, value): (f64, f64)) -> Self {
        Self { depth, value }
    }
}

/// A trajectory vertex carrying the measured scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    /// Position in the tunnel coordinate system.
    pub position: Point3<f64>,
    /// Scalar measured at this vertex.
    pub scalar: f64,
}

impl TrajectoryPoint {
    /// Create a trajectory point.
    pub fn new(x: f64, y: f64, z: f64, scalar: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
            scalar,
        }
    }

    /// X coordinate.
    pub fn x(&self) -> f64 {
        self.position.x
    }

    /// Y coordinate.
    pub fn y(&self) -> f64 {
        self.position.y
    }

    /// Z coordinate.
    pub fn z(&self) -> f64 {
        self.position.z
    }
}

/// Projects depth samples from a collar along a fixed bearing.
#[derive(Debug, Clone, Copy)]
pub struct TrajectoryBuilder {
    side: Side,
    collar: Point2<f64>,
    elevation: f64,
    direction_angle_deg: f64,
}

impl TrajectoryBuilder {
    /// Create a builder for one borehole.
    pub fn new(side: Side, base: PlanarCoord, elevation: f64, direction_angle_deg: f64) -> Self {
        Self {
            side,
            collar: Point2::new(base.x, base.y),
            elevation,
            direction_angle_deg,
        }
    }

    /// Builder for `side` using base coordinates from a
    /// [`CoordinateTransformer`](crate::CoordinateTransformer) and the frame's
    /// elevation for that side.
    pub fn for_side(frame: &ReferenceFrame, coords: &BaseCoordinates, side: Side) -> Self {
        Self::new(
            side,
            coords.get(side),
            frame.elevation_of(side),
            coords.direction_angle_deg,
        )
    }

    /// The side this builder projects for.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Unit vector the hole advances along, `(-sin a, cos a)`.
    pub fn bearing(&self) -> Vector2<f64> {
        let (sin, cos) = self.direction_angle_deg.to_radians().sin_cos();
        Vector2::new(-sin, cos)
    }

    /// Project `samples` in order. Fails when fewer than two samples are given.
    pub fn build(&self, samples: &[DepthSample]) -> Result<Vec<TrajectoryPoint>> {
        if samples.len() < MIN_POLYLINE_POINTS {
            return Err(GeomError::insufficient(samples.len()));
        }

        let angle = self.direction_angle_deg * std::f64::consts::PI / 180.0;
        let (sin, cos) = angle.sin_cos();

        Ok(samples
            .iter()
            .map(|s| TrajectoryPoint {
                position: Point3::new(
                    self.collar.x - s.depth * sin,
                    self.collar.y + s.depth * cos,
                    self.elevation,
                ),
                scalar: s.value,
            })
            .collect())
    }
}
