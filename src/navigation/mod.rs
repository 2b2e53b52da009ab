//! Navigation module: where the vehicle is on the reference path
pub mod locator;
pub mod reference_path;
pub mod spatial_index;

pub use self::locator::locate;
pub use self::reference_path::ReferencePath;
pub use self::spatial_index::SpatialIndex;
