// Route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::header,
    response::{Html, IntoResponse},
};
use serde::{Deserialize, Serialize};

use crate::activity;
use crate::github::{EventRecord, EventSource};

use super::{AppState, HtmlError, JsonError, chart, html};

/// Optional `?type=PushEvent` filter shared by the feed routes.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub cached_subjects: usize,
}

pub async fn index() -> &'static str {
    "Hello, GitHub Activity Dashboard!"
}

pub async fn health<S: EventSource + 'static>(
    State(state): State<AppState<S>>,
) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        cached_subjects: state.fetcher.store().len(),
    })
}

/// `GET /api/u/:user/events` - raw event records as JSON.
pub async fn events_json<S: EventSource + 'static>(
    State(state): State<AppState<S>>,
    Path(user): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<Vec<EventRecord>>, JsonError> {
    let events = state
        .fetcher
        .fetch_events(&user, state.page_size, state.max_pages)
        .await?;

    let selected = activity::select(&events, query.event_type.as_deref());
    Ok(Json(selected.into_iter().cloned().collect()))
}

/// `GET /u/:user` - HTML activity listing.
pub async fn events_html<S: EventSource + 'static>(
    State(state): State<AppState<S>>,
    Path(user): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Html<String>, HtmlError> {
    let events = state
        .fetcher
        .fetch_events(&user, state.page_size, state.max_pages)
        .await?;

    let event_type = query.event_type.as_deref().filter(|t| !t.is_empty());
    let selected = activity::select(&events, event_type);
    Ok(Html(html::render_events_page(&user, &selected, event_type)))
}

/// `GET /u/:user/chart.svg` - events per day as a bar chart.
pub async fn events_chart<S: EventSource + 'static>(
    State(state): State<AppState<S>>,
    Path(user): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<impl IntoResponse, HtmlError> {
    let events = state
        .fetcher
        .fetch_events(&user, state.page_size, state.max_pages)
        .await?;

    let event_type = query.event_type.as_deref().filter(|t| !t.is_empty());
    let counts = activity::group_by_date(activity::select(&events, event_type));
    let title = match event_type {
        Some(t) => format!("{} activity: {}", user, t),
        None => format!("{} activity", user),
    };

    Ok((
        [(header::CONTENT_TYPE, "image/svg+xml")],
        chart::render_chart(&title, &counts),
    ))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use tower::ServiceExt; // for `oneshot`

    use crate::cache::fetcher::tests::{ScriptedSource, make_events};
    use crate::cache::{CacheStore, EventFetcher};
    use crate::error::PulseError;
    use crate::web::router;

    use super::*;

    fn test_app() -> (Arc<ScriptedSource>, Router) {
        let source = Arc::new(ScriptedSource::default());
        let fetcher = EventFetcher::new(Arc::clone(&source), Arc::new(CacheStore::new()));
        let app = router(AppState::new(fetcher).with_paging(10, 2));
        (source, app)
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String, Option<String>) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap(), content_type)
    }

    #[tokio::test]
    async fn test_index() {
        let (_source, app) = test_app();
        let (status, body, _) = get(app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Hello, GitHub Activity Dashboard!");
    }

    #[tokio::test]
    async fn test_json_events_with_filter() {
        let (source, app) = test_app();
        source.push_page(make_events(0, 4), None);

        let (status, body, _) = get(app, "/api/u/alice/events?type=PushEvent").await;
        assert_eq!(status, StatusCode::OK);

        let events: Vec<serde_json::Value> = serde_json::from_str(&body).unwrap();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e["type"] == "PushEvent"));
        assert_eq!(source.calls()[0].2, 10);
    }

    #[tokio::test]
    async fn test_json_not_found() {
        let (source, app) = test_app();
        source.push(Err(PulseError::NotFound("ghost".to_string())));

        let (status, body, _) = get(app, "/api/u/ghost/events").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let error: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert!(error["error"].as_str().unwrap().contains("ghost"));
    }

    #[tokio::test]
    async fn test_json_rate_limited() {
        let (source, app) = test_app();
        source.push(Err(PulseError::UpstreamRejected {
            status: StatusCode::FORBIDDEN,
            reset_at: "12:00:00 UTC".to_string(),
        }));

        let (status, _, _) = get(app, "/api/u/alice/events").await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn test_html_page_escapes_and_links_chart() {
        let (source, app) = test_app();
        source.push_page(make_events(0, 3), None);

        let (status, body, content_type) = get(app, "/u/alice").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        assert!(body.contains("alice/dotfiles"));
        assert!(body.contains("/u/alice/chart.svg"));
    }

    #[tokio::test]
    async fn test_html_unknown_user_is_escaped() {
        let (source, app) = test_app();
        source.push(Err(PulseError::NotFound("<script>".to_string())));

        let (status, body, _) = get(app, "/u/%3Cscript%3E").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("&lt;script&gt;"));
        assert!(!body.contains("<script>"));
        assert_eq!(source.calls()[0].0, "<script>");
    }

    #[tokio::test]
    async fn test_blank_user_is_bad_request() {
        let (source, app) = test_app();

        let (status, _, _) = get(app, "/api/u/%20%20/events").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_chart_is_svg() {
        let (source, app) = test_app();
        source.push_page(make_events(0, 5), None);

        let (status, body, content_type) = get(app, "/u/alice/chart.svg").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("image/svg+xml"));
        assert!(body.starts_with("<svg"));
        assert!(body.contains("2024-05-01"));
    }

    #[tokio::test]
    async fn test_health_counts_cached_subjects() {
        let (source, app) = test_app();
        source.push_page(make_events(0, 1), None);

        let (status, _, _) = get(app.clone(), "/api/u/alice/events").await;
        assert_eq!(status, StatusCode::OK);

        let (status, body, _) = get(app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        let health: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(health["status"], "ok");
        assert_eq!(health["cached_subjects"], 1);
    }
}
