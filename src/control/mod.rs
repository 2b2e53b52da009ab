//! Control module: the speed-annotated waypoints handed to motion control
pub mod trajectory;
pub mod velocity_profile;
pub mod window;

pub use self::trajectory::TrajectoryGenerator;
pub use self::velocity_profile::VelocityProfiler;
pub use self::window::{extract, TrajectoryWindow};
