use crate::model::location::{Coordinates, SavedLocation};
use serde::{Deserialize, Serialize};

/// Distinguishes the live lookup result from bookmarked points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointKind {
    Current,
    Saved,
}

/// A labelled marker handed to the renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
    pub kind: PointKind,
}

/// Everything a renderer needs to draw one page's map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    pub points: Vec<MapPoint>,
}

impl MapView {
    pub const WORLD_ZOOM: u8 = 2;
    pub const LOCAL_ZOOM: u8 = 12;
    pub const CURRENT_LABEL: &'static str = "My location";

    /// Merges the current location (if any) with the saved points.
    ///
    /// A known current location centres the view at street level and comes
    /// first; saved points follow in file order.
    pub fn compose(current: Option<Coordinates>, saved: &[SavedLocation]) -> Self {
        let mut points = Vec::with_capacity(saved.len() + 1);
        let (center, zoom) = match current {
            Some(here) => {
                points.push(MapPoint {
                    latitude: here.latitude,
                    longitude: here.longitude,
                    label: Self::CURRENT_LABEL.to_string(),
                    kind: PointKind::Current,
                });
                (here, Self::LOCAL_ZOOM)
            }
            None => (
                Coordinates {
                    latitude: 0.0,
                    longitude: 0.0,
                },
                Self::WORLD_ZOOM,
            ),
        };

        points.extend(saved.iter().map(|location| MapPoint {
            latitude: location.latitude,
            longitude: location.longitude,
            label: location.name.clone(),
            kind: PointKind::Saved,
        }));

        Self {
            center,
            zoom,
            points,
        }
    }

    pub fn current(&self) -> Option<&MapPoint> {
        self.points
            .iter()
            .find(|point| point.kind == PointKind::Current)
    }

    pub fn saved(&self) -> impl Iterator<Item = &MapPoint> {
        self.points
            .iter()
            .filter(|point| point.kind == PointKind::Saved)
    }
}
