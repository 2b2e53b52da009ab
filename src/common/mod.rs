//! Common types shared across the waypoint updater

use nalgebra::{Point2, Point3, UnitQuaternion};

/// A 2D point in the map frame, used for planar lookups
pub type Point2D = Point2<f64>;

/// A single reference waypoint with its nominal travel speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathPoint {
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
    /// Nominal target speed, never negative
    pub speed: f64,
}

impl PathPoint {
    /// Create a waypoint. Negative or NaN speeds are stored as zero.
    pub fn new(position: Point3<f64>, orientation: UnitQuaternion<f64>, speed: f64) -> Self {
        PathPoint {
            position,
            orientation,
            speed: if speed > 0.0 { speed } else { 0.0 },
        }
    }

    /// Planar waypoint at `(x, y)` facing `yaw`
    pub fn planar(x: f64, y: f64, yaw: f64, speed: f64) -> Self {
        PathPoint::new(
            Point3::new(x, y, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, yaw),
            speed,
        )
    }

    /// Copy of this waypoint with a different target speed
    pub fn with_speed(&self, speed: f64) -> Self {
        PathPoint::new(self.position, self.orientation, speed)
    }

    /// Projection onto the ground plane
    pub fn xy(&self) -> Point2D {
        Point2D::new(self.position.x, self.position.y)
    }

    /// True when every coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
    }

    /// Straight-line 3D distance to another waypoint
    pub fn distance_to(&self, other: &PathPoint) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }
}

/// Current vehicle pose from localization
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehiclePose {
    pub position: Point3<f64>,
    pub orientation: UnitQuaternion<f64>,
}

impl VehiclePose {
    pub fn new(position: Point3<f64>, orientation: UnitQuaternion<f64>) -> Self {
        VehiclePose {
            position,
            orientation,
        }
    }

    /// Planar pose at `(x, y)` with heading `yaw`
    pub fn planar(x: f64, y: f64, yaw: f64) -> Self {
        VehiclePose::new(
            Point3::new(x, y, 0.0),
            UnitQuaternion::from_euler_angles(0.0, 0.0, yaw),
        )
    }

    pub fn xy(&self) -> Point2D {
        Point2D::new(self.position.x, self.position.y)
    }

    /// True when every coordinate is a finite number
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
    }

    /// Heading (yaw) in radians, in [-pi, pi]
    pub fn heading(&self) -> f64 {
        self.orientation.euler_angles().2
    }
}

/// Where the vehicle has to come to rest, if anywhere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StopLine {
    #[default]
    None,
    At(usize),
}

impl StopLine {
    /// Wire value used when no stop is active
    pub const SENTINEL: i64 = -1;

    /// Decode the raw traffic waypoint value. Any negative value means no stop.
    pub fn from_raw(raw: i64) -> Self {
        if raw < 0 {
            StopLine::None
        } else {
            StopLine::At(raw as usize)
        }
    }

    pub fn to_raw(self) -> i64 {
        match self {
            StopLine::None => Self::SENTINEL,
            StopLine::At(index) => index as i64,
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            StopLine::None => None,
            StopLine::At(index) => Some(index),
        }
    }
}
