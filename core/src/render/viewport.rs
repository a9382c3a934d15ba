use crate::model::view::MapPoint;

/// Equirectangular projection of a lat/lon box onto a pixel canvas.
///
/// Both axes share one scale so shapes are not stretched; the box is
/// centred and padded to the canvas aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    center_latitude: f64,
    center_longitude: f64,
    degrees_per_pixel: f64,
}

impl Viewport {
    /// Smallest span, in degrees, a fitted viewport will show.
    pub const MIN_SPAN: f64 = 0.01;

    pub fn world(width: f64, height: f64) -> Self {
        Self::from_bounds(width, height, (-90.0, 90.0), (-180.0, 180.0))
    }

    /// Fits all points with a margin, or the whole world if there are none.
    pub fn fit(points: &[MapPoint], width: f64, height: f64) -> Self {
        if points.is_empty() {
            return Self::world(width, height);
        }

        let (mut min_lat, mut max_lat) = (f64::INFINITY, f64::NEG_INFINITY);
        let (mut min_lon, mut max_lon) = (f64::INFINITY, f64::NEG_INFINITY);
        for point in points {
            min_lat = min_lat.min(point.latitude);
            max_lat = max_lat.max(point.latitude);
            min_lon = min_lon.min(point.longitude);
            max_lon = max_lon.max(point.longitude);
        }

        let lat_margin = ((max_lat - min_lat) * 0.1).max(Self::MIN_SPAN / 2.0);
        let lon_margin = ((max_lon - min_lon) * 0.1).max(Self::MIN_SPAN / 2.0);
        Self::from_bounds(
            width,
            height,
            (min_lat - lat_margin, max_lat + lat_margin),
            (min_lon - lon_margin, max_lon + lon_margin),
        )
    }

    fn from_bounds(width: f64, height: f64, lat: (f64, f64), lon: (f64, f64)) -> Self {
        let width = width.max(1.0);
        let height = height.max(1.0);
        let degrees_per_pixel = ((lon.1 - lon.0) / width).max((lat.1 - lat.0) / height);
        Self {
            width,
            height,
            center_latitude: (lat.0 + lat.1) / 2.0,
            center_longitude: (lon.0 + lon.1) / 2.0,
            degrees_per_pixel,
        }
    }

    /// Pixel position of a coordinate; y grows downwards.
    pub fn project(&self, latitude: f64, longitude: f64) -> (f64, f64) {
        let x = self.width / 2.0 + (longitude - self.center_longitude) / self.degrees_per_pixel;
        let y = self.height / 2.0 - (latitude - self.center_latitude) / self.degrees_per_pixel;
        (x, y)
    }

    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        let (x, y) = self.project(latitude, longitude);
        (0.0..=self.width).contains(&x) && (0.0..=self.height).contains(&y)
    }
}
