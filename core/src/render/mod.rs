pub mod escape;
pub mod leaflet;
pub mod svg;
pub mod viewport;

pub use escape::escape_html;
pub use leaflet::LeafletRenderer;
pub use svg::SvgRenderer;
pub use viewport::Viewport;

use crate::prelude::{MapRenderer, RenderError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Selects one of the interchangeable map front ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RendererKind {
    #[default]
    Leaflet,
    Svg,
}

impl RendererKind {
    pub fn build(self) -> Box<dyn MapRenderer> {
        match self {
            RendererKind::Leaflet => Box::new(LeafletRenderer::new()),
            RendererKind::Svg => Box::new(SvgRenderer::default()),
        }
    }
}

impl FromStr for RendererKind {
    type Err = RenderError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "leaflet" => Ok(RendererKind::Leaflet),
            "svg" => Ok(RendererKind::Svg),
            other => Err(RenderError::UnknownRenderer(other.to_string())),
        }
    }
}

impl fmt::Display for RendererKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RendererKind::Leaflet => write!(f, "leaflet"),
            RendererKind::Svg => write!(f, "svg"),
        }
    }
}
