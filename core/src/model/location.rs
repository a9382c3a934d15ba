use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Returns `None` unless both values are finite and inside the
    /// geographic ranges.
    pub fn new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        valid.then_some(Self {
            latitude,
            longitude,
        })
    }

    /// Text shown in the address field of the page.
    pub fn address_hint(&self) -> String {
        format!(
            "{}, {}",
            format_degrees(self.latitude),
            format_degrees(self.longitude)
        )
    }
}

/// A named point persisted in the backing file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

impl SavedLocation {
    pub fn new(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
        }
    }

    pub fn at(coordinates: Coordinates, name: impl Into<String>) -> Self {
        Self::new(coordinates.latitude, coordinates.longitude, name)
    }

    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Shortest round-trip rendering that always keeps a decimal point
/// (`10.0`, `40.7`, `-74.0`). Very small or large magnitudes switch to
/// exponent form, so `0.00001` is written as `1e-5`.
pub fn format_degrees(value: f64) -> String {
    format!("{:?}", value)
}
