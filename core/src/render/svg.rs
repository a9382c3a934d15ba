use crate::model::view::{MapView, PointKind};
use crate::prelude::{MapRenderer, RenderResult};
use crate::render::escape::escape_html;
use crate::render::viewport::Viewport;
use std::fmt::Write;

const CURRENT_COLOR: &str = "#2b7bd6";
const SAVED_COLOR: &str = "#2e9d4f";

/// Script-free static map: points projected onto a fitted lat/lon box.
pub struct SvgRenderer {
    width: f64,
    height: f64,
}

impl SvgRenderer {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self::new(800.0, 450.0)
    }
}

impl MapRenderer for SvgRenderer {
    fn name(&self) -> &'static str {
        "svg"
    }

    fn render(&self, view: &MapView) -> RenderResult<String> {
        let viewport = Viewport::fit(&view.points, self.width, self.height);
        let (width, height) = (viewport.width, viewport.height);
        let mut svg = String::new();

        // fmt::Write into a String cannot fail.
        let _ = writeln!(
            svg,
            r#"<svg class="geomark-map" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width:.0} {height:.0}" width="100%" role="img" aria-label="Map of saved locations">"#
        );
        let _ = writeln!(
            svg,
            r##"<rect width="{width:.0}" height="{height:.0}" fill="#dfeef7" />"##
        );

        for latitude in (-60..=60).step_by(30) {
            let (_, y) = viewport.project(latitude as f64, 0.0);
            if (0.0..=height).contains(&y) {
                let _ = writeln!(
                    svg,
                    r##"<line x1="0" y1="{y:.1}" x2="{width:.0}" y2="{y:.1}" stroke="#b7cbd8" stroke-width="1" />"##
                );
            }
        }
        for longitude in (-150..=150).step_by(30) {
            let (x, _) = viewport.project(0.0, longitude as f64);
            if (0.0..=width).contains(&x) {
                let _ = writeln!(
                    svg,
                    r##"<line x1="{x:.1}" y1="0" x2="{x:.1}" y2="{height:.0}" stroke="#b7cbd8" stroke-width="1" />"##
                );
            }
        }

        for point in &view.points {
            let (x, y) = viewport.project(point.latitude, point.longitude);
            let (class, color, radius) = match point.kind {
                PointKind::Current => ("current", CURRENT_COLOR, 9.0),
                PointKind::Saved => ("saved", SAVED_COLOR, 6.0),
            };
            let label = escape_html(&point.label);
            let _ = writeln!(
                svg,
                r##"<g class="point {class}"><circle cx="{x:.1}" cy="{y:.1}" r="{radius:.0}" fill="{color}" stroke="#ffffff" stroke-width="2"><title>{label}</title></circle><text x="{tx:.1}" y="{ty:.1}" font-size="12" fill="#1d2b36">{label}</text></g>"##,
                tx = x + radius + 3.0,
                ty = y + 4.0,
            );
        }

        svg.push_str("</svg>\n");
        Ok(svg)
    }
}
