use crate::model::view::MapView;
use crate::prelude::{MapRenderer, RenderResult};
use crate::render::escape::{escape_html, script_json};

const VIEW_PLACEHOLDER: &str = "__GEOMARK_VIEW__";
const ELEMENT_PLACEHOLDER: &str = "__GEOMARK_ELEMENT__";

const LEAFLET_TEMPLATE: &str = r#"
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css" crossorigin="" />
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" crossorigin=""></script>
<style>
  .geomark-marker { font-size: 20px; line-height: 24px; text-align: center; text-shadow: 0 0 3px #fff; }
  .geomark-marker.current { color: #2b7bd6; }
  .geomark-marker.saved { color: #2e9d4f; }
</style>
<div id="__GEOMARK_ELEMENT__" class="geomark-map" style="height: 520px; width: 100%;"></div>
<script>
(function () {
  const view = __GEOMARK_VIEW__;
  const glyphs = { current: "☁", saved: "★" };
  const map = L.map("__GEOMARK_ELEMENT__").setView([view.center.latitude, view.center.longitude], view.zoom);
  L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png", {
    maxZoom: 19,
    attribution: "&copy; OpenStreetMap contributors",
  }).addTo(map);
  for (const point of view.points) {
    const icon = L.divIcon({
      className: "geomark-marker " + point.kind,
      html: glyphs[point.kind],
      iconSize: [24, 24],
    });
    const label = document.createElement("span");
    label.textContent = point.label;
    L.marker([point.latitude, point.longitude], { icon: icon, title: point.label })
      .bindPopup(label)
      .addTo(map);
  }
})();
</script>
"#;

/// Interactive slippy map backed by Leaflet and OpenStreetMap tiles.
pub struct LeafletRenderer {
    element_id: String,
}

impl LeafletRenderer {
    pub fn new() -> Self {
        Self::with_element_id("geomark-map")
    }

    pub fn with_element_id(element_id: impl Into<String>) -> Self {
        Self {
            element_id: element_id.into(),
        }
    }
}

impl Default for LeafletRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MapRenderer for LeafletRenderer {
    fn name(&self) -> &'static str {
        "leaflet"
    }

    fn render(&self, view: &MapView) -> RenderResult<String> {
        let view_json = script_json(view)?;
        let element_id = escape_html(&self.element_id);
        Ok(LEAFLET_TEMPLATE
            .replace(ELEMENT_PLACEHOLDER, &element_id)
            .replace(VIEW_PLACEHOLDER, &view_json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::location::{Coordinates, SavedLocation};

    #[test]
    fn fragment_embeds_every_point() {
        let view = MapView::compose(
            Coordinates::new(-23.55, -46.63),
            &[SavedLocation::new(40.7, -74.0, "New York,NY")],
        );
        let html = LeafletRenderer::new().render(&view).unwrap();

        assert!(html.contains(r#"id="geomark-map""#));
        assert!(html.contains("\"label\":\"My location\""));
        assert!(html.contains("\"label\":\"New York,NY\""));
        assert!(html.contains("\"zoom\":12"));
        assert!(!html.contains(VIEW_PLACEHOLDER));
    }

    #[test]
    fn labels_cannot_break_out_of_the_script() {
        let view = MapView::compose(
            None,
            &[SavedLocation::new(1.0, 2.0, "</script><img src=x>")],
        );
        let html = LeafletRenderer::new().render(&view).unwrap();
        assert!(!html.contains("</script><img"));
        assert_eq!(html.matches("</script>").count(), 2);
    }
}
