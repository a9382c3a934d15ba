use anyhow::Context;
use geomarkcore::render::RendererKind;
use geomarkcore::store::LocationStore;
use geomarkcore::Coordinates;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

pub const DEFAULT_LOOKUP_URL: &str = "https://ipinfo.io/json";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub bind: SocketAddr,
    pub renderer: RendererKind,
    pub lookup_url: String,
    pub lookup_timeout_secs: u64,
    /// Replaces the network lookup when set.
    pub fixed_location: Option<[f64; 2]>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(LocationStore::DEFAULT_FILE),
            bind: SocketAddr::from(([127, 0, 0, 1], 8501)),
            renderer: RendererKind::default(),
            lookup_url: DEFAULT_LOOKUP_URL.to_string(),
            lookup_timeout_secs: 5,
            fixed_location: None,
        }
    }
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading config {}", path_ref.display()))?;
        let config: AppConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Validated form of `fixed_location`.
    pub fn fixed_coordinates(&self) -> anyhow::Result<Option<Coordinates>> {
        match self.fixed_location {
            Some([latitude, longitude]) => Coordinates::new(latitude, longitude)
                .map(Some)
                .with_context(|| {
                    format!("fixed location {latitude}, {longitude} is out of range")
                }),
            None => Ok(None),
        }
    }
}

/// Parses `lat,lon` from the command line.
pub fn parse_fixed_location(value: &str) -> Result<[f64; 2], String> {
    let (latitude, longitude) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON but got {value:?}"))?;
    let latitude = latitude
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("latitude {latitude:?}: {err}"))?;
    let longitude = longitude
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("longitude {longitude:?}: {err}"))?;
    Ok([latitude, longitude])
}
