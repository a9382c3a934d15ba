pub mod location;
pub mod view;

pub use location::{Coordinates, SavedLocation};
pub use view::{MapPoint, MapView, PointKind};
