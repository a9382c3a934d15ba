pub mod ip_lookup;

pub use ip_lookup::LocationSource;
