use crate::model::MapView;
use std::path::PathBuf;

/// Reasons a single line of the backing file is rejected.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum LineError {
    #[error("expected at least 3 comma-separated fields, found {0}")]
    TooFewFields(usize),
    #[error("latitude is not a number: {0:?}")]
    InvalidLatitude(String),
    #[error("longitude is not a number: {0:?}")]
    InvalidLongitude(String),
    #[error("coordinates out of range: {latitude}, {longitude}")]
    OutOfRange { latitude: f64, longitude: f64 },
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

/// Common error type for store operations.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("i/o failure on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("location name contains a line break: {0:?}")]
    InvalidName(String),
    #[error("coordinates out of range: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised while turning a [`MapView`] into markup.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("unknown renderer: {0}")]
    UnknownRenderer(String),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Front end that draws a composed map view as an HTML fragment.
///
/// Implementations are interchangeable: the page that embeds the fragment
/// does not know which one produced it.
pub trait MapRenderer: Send + Sync {
    fn name(&self) -> &'static str;
    fn render(&self, view: &MapView) -> RenderResult<String>;
}
