pub mod codec;
pub mod location_store;

pub use codec::{format_line, parse_line};
pub use location_store::{LoadReport, LocationStore, SaveOutcome};
