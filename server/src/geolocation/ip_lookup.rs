use crate::config::AppConfig;
use anyhow::Context;
use geomarkcore::Coordinates;
use log::{info, warn};
use serde_json::Value;
use std::time::Duration;

/// One-shot client for an IP geolocation endpoint.
#[derive(Clone)]
pub struct IpLookup {
    client: reqwest::Client,
    url: String,
}

impl IpLookup {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building geolocation client")?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Looks the caller up once. Failures are logged and become `None`.
    pub async fn locate(&self) -> Option<Coordinates> {
        match self.fetch().await {
            Ok(coordinates) => {
                info!(
                    "geolocation lookup -> {}, {}",
                    coordinates.latitude, coordinates.longitude
                );
                Some(coordinates)
            }
            Err(err) => {
                warn!("geolocation lookup via {} failed: {:#}", self.url, err);
                None
            }
        }
    }

    async fn fetch(&self) -> anyhow::Result<Coordinates> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("sending lookup request")?
            .error_for_status()
            .context("lookup service returned an error status")?;
        let body: Value = response
            .json()
            .await
            .context("decoding lookup response")?;
        parse_lookup_body(&body).context("lookup response carried no usable coordinates")
    }
}

/// Where the current location comes from.
#[derive(Clone)]
pub enum LocationSource {
    Ip(IpLookup),
    Fixed(Option<Coordinates>),
}

impl LocationSource {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        if let Some(fixed) = config.fixed_coordinates()? {
            return Ok(LocationSource::Fixed(Some(fixed)));
        }
        let lookup = IpLookup::new(
            config.lookup_url.clone(),
            Duration::from_secs(config.lookup_timeout_secs.max(1)),
        )?;
        Ok(LocationSource::Ip(lookup))
    }

    pub async fn current_location(&self) -> Option<Coordinates> {
        match self {
            LocationSource::Ip(lookup) => lookup.locate().await,
            LocationSource::Fixed(coordinates) => *coordinates,
        }
    }
}

/// Extracts coordinates from the common lookup response shapes: a
/// `"loc": "lat,lon"` string, or numeric `latitude`/`longitude` or
/// `lat`/`lon` fields.
pub fn parse_lookup_body(body: &Value) -> Option<Coordinates> {
    if let Some(loc) = body.get("loc").and_then(Value::as_str) {
        let (latitude, longitude) = loc.split_once(',')?;
        return Coordinates::new(
            latitude.trim().parse().ok()?,
            longitude.trim().parse().ok()?,
        );
    }

    for (lat_key, lon_key) in [("latitude", "longitude"), ("lat", "lon")] {
        let latitude = body.get(lat_key).and_then(Value::as_f64);
        let longitude = body.get(lon_key).and_then(Value::as_f64);
        if let (Some(latitude), Some(longitude)) = (latitude, longitude) {
            return Coordinates::new(latitude, longitude);
        }
    }

    None
}
