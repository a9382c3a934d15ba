use geomarkcore::model::location::format_degrees;
use geomarkcore::render::escape_html;
use geomarkcore::{Coordinates, SavedLocation};
use std::fmt::Write;

pub const LOCATION_WARNING: &str =
    "Location not found. Check that geolocation is available for this connection.";
pub const SAVED_NOTICE: &str = "Location saved successfully!";

#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    Success(String),
    Warning(String),
    Error(String),
}

impl Notice {
    fn class(&self) -> &'static str {
        match self {
            Notice::Success(_) => "success",
            Notice::Warning(_) => "warning",
            Notice::Error(_) => "error",
        }
    }

    fn message(&self) -> &str {
        match self {
            Notice::Success(message) | Notice::Warning(message) | Notice::Error(message) => {
                message
            }
        }
    }
}

/// Inputs for one full page render.
pub struct PageModel<'a> {
    pub current: Option<Coordinates>,
    pub saved: &'a [SavedLocation],
    pub map_html: &'a str,
    pub notices: &'a [Notice],
}

const STYLE: &str = r#"
  body { margin: 0; font-family: system-ui, sans-serif; color: #1d2b36; display: flex; min-height: 100vh; }
  aside { width: 320px; padding: 20px; background: #f0f2f6; box-sizing: border-box; }
  main { flex: 1; padding: 20px 32px; }
  label { display: block; margin: 12px 0 4px; font-size: 14px; }
  input[type=text] { width: 100%; padding: 6px; box-sizing: border-box; }
  button { margin-top: 8px; padding: 8px 14px; }
  .notice { padding: 10px 14px; border-radius: 4px; margin-bottom: 12px; }
  .notice.success { background: #dff5e3; }
  .notice.warning { background: #fff4d6; }
  .notice.error { background: #fde2e1; }
  .info { background: #e3eefc; padding: 10px; border-radius: 4px; }
  ol.saved { padding-left: 0; list-style: none; font-size: 14px; }
  ol.saved li { margin-bottom: 6px; }
"#;

/// Renders the whole page: sidebar with the save form and saved list, the
/// map fragment and any notices.
pub fn render_page(model: &PageModel<'_>) -> String {
    let mut html = String::new();

    // fmt::Write into a String cannot fail.
    let _ = write!(
        html,
        "<!doctype html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\" />\n<title>Location Finder</title>\n<style>{STYLE}</style>\n</head>\n<body>\n<aside>\n"
    );

    if let Some(here) = model.current {
        let _ = write!(
            html,
            "<label for=\"address\">Your address (e.g. \"São Paulo, Brazil\")</label>\n<input type=\"text\" id=\"address\" name=\"address\" value=\"{}\" />\n",
            escape_html(&here.address_hint())
        );
    }

    html.push_str(
        "<form method=\"post\" action=\"/save\">\n<label for=\"name\">Name this marker:</label>\n<input type=\"text\" id=\"name\" name=\"name\" />\n<button type=\"submit\">Save location</button>\n</form>\n",
    );

    if model.saved.is_empty() {
        html.push_str("<p class=\"info\">No locations saved yet.</p>\n");
    } else {
        html.push_str("<h2>Saved locations</h2>\n<ol class=\"saved\">\n");
        for (index, location) in model.saved.iter().enumerate() {
            let _ = writeln!(
                html,
                "<li>Location {}: {} - Latitude: {}, Longitude: {}</li>",
                index + 1,
                escape_html(&location.name),
                format_degrees(location.latitude),
                format_degrees(location.longitude)
            );
        }
        html.push_str("</ol>\n");
    }

    html.push_str("</aside>\n<main>\n<h1>Location Finder</h1>\n");
    for notice in model.notices {
        let _ = writeln!(
            html,
            "<div class=\"notice {}\">{}</div>",
            notice.class(),
            escape_html(notice.message())
        );
    }
    html.push_str(
        "<form method=\"post\" action=\"/refresh\"><button type=\"submit\">Refresh location</button></form>\n",
    );
    html.push_str(model.map_html);
    html.push_str("\n</main>\n</body>\n</html>\n");
    html
}
