use crate::web::page::{render_page, Notice, PageModel, LOCATION_WARNING, SAVED_NOTICE};
use crate::web::state::AppState;
use geomarkcore::{Coordinates, MapView, SaveOutcome};
use log::error;
use serde::Deserialize;
use serde_json::json;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::{StatusCode, Uri};
use warp::reply::{Reply, Response};
use warp::{Filter, Rejection};

const FORM_LIMIT: u64 = 4 * 1024;

#[derive(Debug, Default, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub name: String,
}

/// Every page and API route, sharing one [`AppState`].
pub fn routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());

    let index_route = warp::path::end()
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(index);

    let refresh_route = warp::path("refresh")
        .and(warp::path::end())
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(refresh);

    let save_route = warp::path("save")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(FORM_LIMIT))
        .and(warp::body::form())
        .and(state_filter.clone())
        .and_then(save);

    let api_points_route = warp::path!("api" / "points")
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(api_points);

    let api_refresh_route = warp::path!("api" / "refresh")
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(api_refresh);

    let api_save_route = warp::path!("api" / "save")
        .and(warp::post())
        .and(warp::body::content_length_limit(FORM_LIMIT))
        .and(warp::body::json())
        .and(state_filter.clone())
        .and_then(api_save);

    let api_status_route = warp::path!("api" / "status")
        .and(warp::get())
        .and(state_filter)
        .and_then(api_status);

    index_route
        .or(refresh_route)
        .unify()
        .or(save_route)
        .unify()
        .or(api_points_route)
        .unify()
        .or(api_refresh_route)
        .unify()
        .or(api_save_route)
        .unify()
        .or(api_status_route)
        .unify()
}

async fn index(state: Arc<AppState>) -> Result<Response, Infallible> {
    let current = state.page_location().await;
    Ok(page_response(&state, current, Vec::new()))
}

async fn refresh(state: Arc<AppState>) -> Result<Response, Infallible> {
    state.refresh_for_next_page().await;
    Ok(warp::redirect::see_other(Uri::from_static("/")).into_response())
}

async fn save(form: SaveRequest, state: Arc<AppState>) -> Result<Response, Infallible> {
    let mut notices = Vec::new();
    match state.save(&form.name) {
        Ok(SaveOutcome::Saved(_)) => notices.push(Notice::Success(SAVED_NOTICE.to_string())),
        Ok(SaveOutcome::EmptyName) | Ok(SaveOutcome::LocationUnknown) => {}
        Err(err) => {
            error!("save failed: {}", err);
            notices.push(Notice::Error(format!("Could not save location: {err}")));
        }
    }
    Ok(page_response(&state, state.last_location(), notices))
}

async fn api_points(state: Arc<AppState>) -> Result<Response, Infallible> {
    Ok(view_response(&state, state.last_location()))
}

async fn api_refresh(state: Arc<AppState>) -> Result<Response, Infallible> {
    let current = state.refresh_location().await;
    Ok(view_response(&state, current))
}

async fn api_save(request: SaveRequest, state: Arc<AppState>) -> Result<Response, Infallible> {
    let reply = match state.save(&request.name) {
        Ok(SaveOutcome::Saved(location)) => warp::reply::with_status(
            warp::reply::json(&json!({"status": "saved", "location": location})),
            StatusCode::OK,
        ),
        Ok(SaveOutcome::EmptyName) => warp::reply::with_status(
            warp::reply::json(&json!({"status": "empty_name"})),
            StatusCode::OK,
        ),
        Ok(SaveOutcome::LocationUnknown) => warp::reply::with_status(
            warp::reply::json(&json!({"status": "location_unknown"})),
            StatusCode::OK,
        ),
        Err(err) => {
            error!("api save failed: {}", err);
            warp::reply::with_status(
                warp::reply::json(&json!({"status": "error", "error": err.to_string()})),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
        }
    };
    Ok(reply.into_response())
}

async fn api_status(state: Arc<AppState>) -> Result<Response, Infallible> {
    let snapshot = state.metrics().snapshot();
    Ok(warp::reply::json(&json!({
        "renderer": state.renderer().name(),
        "store": state.store().path().display().to_string(),
        "location_known": state.last_location().is_some(),
        "metrics": snapshot,
    }))
    .into_response())
}

fn page_response(
    state: &AppState,
    current: Option<Coordinates>,
    mut notices: Vec<Notice>,
) -> Response {
    if current.is_none() {
        notices.push(Notice::Warning(LOCATION_WARNING.to_string()));
    }

    let saved = match state.store().load() {
        Ok(saved) => saved,
        Err(err) => {
            error!("loading saved locations failed: {}", err);
            notices.push(Notice::Error(format!("Could not read saved locations: {err}")));
            Vec::new()
        }
    };

    let view = MapView::compose(current, &saved);
    let map_html = match state.renderer().render(&view) {
        Ok(html) => html,
        Err(err) => {
            error!("{} renderer failed: {}", state.renderer().name(), err);
            notices.push(Notice::Error(format!("Could not draw the map: {err}")));
            String::new()
        }
    };

    warp::reply::html(render_page(&PageModel {
        current,
        saved: &saved,
        map_html: &map_html,
        notices: &notices,
    }))
    .into_response()
}

fn view_response(state: &AppState, current: Option<Coordinates>) -> Response {
    match state.compose(current) {
        Ok((view, _)) => warp::reply::json(&view).into_response(),
        Err(err) => {
            error!("loading saved locations failed: {}", err);
            warp::reply::with_status(
                warp::reply::json(&json!({"error": err.to_string()})),
                StatusCode::INTERNAL_SERVER_ERROR,
            )
            .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geolocation::LocationSource;
    use geomarkcore::render::RendererKind;
    use geomarkcore::LocationStore;
    use std::fs;
    use tempfile::TempDir;

    fn state(dir: &TempDir, location: Option<Coordinates>) -> Arc<AppState> {
        Arc::new(AppState::new(
            LocationStore::new(dir.path().join("saved_locations.txt")),
            RendererKind::Svg.build(),
            LocationSource::Fixed(location),
        ))
    }

    fn body_text(response: &warp::http::Response<warp::hyper::body::Bytes>) -> String {
        String::from_utf8(response.body().to_vec()).unwrap()
    }

    #[tokio::test]
    async fn index_lists_saved_locations() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("saved_locations.txt"), "40.7,-74.0,New York,NY\n").unwrap();
        let filter = routes(state(&dir, Coordinates::new(-23.5, -46.6)));

        let response = warp::test::request().method("GET").path("/").reply(&filter).await;
        let body = body_text(&response);

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body.contains("Location 1: New York,NY - Latitude: 40.7, Longitude: -74.0"));
        assert!(body.contains("value=\"-23.5, -46.6\""));
        assert!(!body.contains(LOCATION_WARNING));
    }

    #[tokio::test]
    async fn unknown_location_shows_a_warning() {
        let dir = TempDir::new().unwrap();
        let filter = routes(state(&dir, None));

        let response = warp::test::request().method("GET").path("/").reply(&filter).await;
        let body = body_text(&response);

        assert_eq!(response.status(), StatusCode::OK);
        assert!(body.contains(LOCATION_WARNING));
        assert!(body.contains("No locations saved yet."));
    }

    #[tokio::test]
    async fn form_save_appends_and_confirms() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir, Coordinates::new(10.0, 20.0));
        let filter = routes(state.clone());

        warp::test::request().method("POST").path("/refresh").reply(&filter).await;
        let response = warp::test::request()
            .method("POST")
            .path("/save")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("name=Home")
            .reply(&filter)
            .await;

        assert!(body_text(&response).contains(SAVED_NOTICE));
        assert_eq!(
            fs::read_to_string(state.store().path()).unwrap(),
            "10.0,20.0,Home\n"
        );
    }

    #[tokio::test]
    async fn refresh_redirects_to_the_page_with_one_lookup() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir, Coordinates::new(35.68, 139.69));
        let filter = routes(state.clone());

        let response = warp::test::request()
            .method("POST")
            .path("/refresh")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()["location"], "/");
        assert!(response.body().is_empty());

        let page = warp::test::request().method("GET").path("/").reply(&filter).await;
        assert!(body_text(&page).contains("value=\"35.68, 139.69\""));
        assert_eq!(state.metrics().snapshot().lookups, 1);
    }

    #[tokio::test]
    async fn blank_form_save_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let state = state(&dir, Coordinates::new(10.0, 20.0));
        let filter = routes(state.clone());

        warp::test::request().method("GET").path("/").reply(&filter).await;
        let response = warp::test::request()
            .method("POST")
            .path("/save")
            .header("content-type", "application/x-www-form-urlencoded")
            .body("name=+++")
            .reply(&filter)
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(!body_text(&response).contains(SAVED_NOTICE));
        assert!(!state.store().path().exists());
    }

    #[tokio::test]
    async fn api_round_trip() {
        let dir = TempDir::new().unwrap();
        let filter = routes(state(&dir, Coordinates::new(48.85, 2.35)));

        let refreshed = warp::test::request()
            .method("POST")
            .path("/api/refresh")
            .reply(&filter)
            .await;
        let view: MapView = serde_json::from_slice(refreshed.body()).unwrap();
        assert_eq!(view.zoom, MapView::LOCAL_ZOOM);
        assert_eq!(view.points.len(), 1);

        let saved = warp::test::request()
            .method("POST")
            .path("/api/save")
            .json(&json!({"name": "Paris"}))
            .reply(&filter)
            .await;
        let reply: serde_json::Value = serde_json::from_slice(saved.body()).unwrap();
        assert_eq!(reply["status"], "saved");
        assert_eq!(reply["location"]["name"], "Paris");

        let points = warp::test::request()
            .method("GET")
            .path("/api/points")
            .reply(&filter)
            .await;
        let view: MapView = serde_json::from_slice(points.body()).unwrap();
        assert_eq!(view.saved().count(), 1);

        let status = warp::test::request()
            .method("GET")
            .path("/api/status")
            .reply(&filter)
            .await;
        let status: serde_json::Value = serde_json::from_slice(status.body()).unwrap();
        assert_eq!(status["metrics"]["saves"], 1);
        assert_eq!(status["renderer"], "svg");
    }

    #[tokio::test]
    async fn api_save_without_location_is_reported() {
        let dir = TempDir::new().unwrap();
        let filter = routes(state(&dir, None));

        let response = warp::test::request()
            .method("POST")
            .path("/api/save")
            .json(&json!({"name": "Nowhere"}))
            .reply(&filter)
            .await;
        let reply: serde_json::Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(reply["status"], "location_unknown");
    }
}
