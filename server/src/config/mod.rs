pub mod app_config;

pub use app_config::{parse_fixed_location, AppConfig};
