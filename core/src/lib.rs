//! Core of the geomark location bookmarking tool.
//!
//! The crate owns the flat-file location store, the composition of the map
//! view shown on every page render, and the renderers that turn that view
//! into markup. Network lookups and HTTP serving live in the front ends.

pub mod model;
pub mod prelude;
pub mod render;
pub mod store;
pub mod telemetry;

pub use model::{Coordinates, MapPoint, MapView, PointKind, SavedLocation};
pub use prelude::{MapRenderer, RenderError, StoreError};
pub use store::{LocationStore, SaveOutcome};
