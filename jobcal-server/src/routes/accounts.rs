//! Per-account sync endpoints

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use jobcal_core::{CalendarIntegration, PullOutcome, PushOutcome};
use serde::Deserialize;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/accounts/{account}/pull", post(pull))
        .route("/accounts/{account}/push", post(push))
        .route("/accounts/{account}/integration", get(integration))
        .route("/accounts/{account}/deactivate", post(deactivate))
}

/// Request body for a pull-sync
#[derive(Deserialize)]
pub struct PullRequest {
    pub url: String,
}

/// POST /accounts/:account/pull - Import a remote feed
async fn pull(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    Json(request): Json<PullRequest>,
) -> Result<Json<PullOutcome>, AppError> {
    let outcome = state
        .coordinator()
        .pull_sync(&account_id, &request.url)
        .await?;
    Ok(Json(outcome))
}

/// POST /accounts/:account/push - Publish upcoming jobs as a feed
async fn push(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<PushOutcome>, AppError> {
    let outcome = state.coordinator().push_sync(&account_id).await?;
    Ok(Json(outcome))
}

/// GET /accounts/:account/integration
async fn integration(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<CalendarIntegration>, AppError> {
    state
        .coordinator()
        .integration(&account_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Integration for {account_id}")))
}

/// POST /accounts/:account/deactivate
async fn deactivate(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<CalendarIntegration>, AppError> {
    state
        .coordinator()
        .deactivate(&account_id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Integration for {account_id}")))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use jobcal_core::fetch::FetchResponse;
    use jobcal_core::jobs::MemoryJobs;
    use jobcal_core::store::FileStore;
    use jobcal_core::{FetchError, JobRecord};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::routes::router;
    use crate::routes::test_support::{REMOTE_DOC, StaticFetcher, ok_state, state_with};
    use crate::state::AppState;

    async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = router(state).oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, value)
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::post(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_pull_returns_events_and_record() {
        let (status, body) = send(
            ok_state(),
            post_json(
                "/accounts/acct-1/pull",
                json!({ "url": "https://cal.example.com/ical/abc.ics" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["event_count"], 1);
        assert_eq!(body["events"][0]["summary"], "Site visit");
        assert_eq!(body["integration"]["is_active"], true);
        assert_eq!(
            body["integration"]["feed_url"],
            "https://cal.example.com/ical/abc.ics"
        );
    }

    #[tokio::test]
    async fn test_pull_rejects_non_feed_url() {
        let (status, body) = send(
            ok_state(),
            post_json(
                "/accounts/acct-1/pull",
                json!({ "url": "https://example.com/calendar" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "not_a_feed_url");
        assert_eq!(body["retryable"], false);
    }

    #[tokio::test]
    async fn test_pull_rejects_malformed_url() {
        let (status, body) = send(
            ok_state(),
            post_json("/accounts/acct-1/pull", json!({ "url": "not a url" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "malformed_url");
    }

    #[tokio::test]
    async fn test_pull_upstream_failure_is_bad_gateway() {
        let state = state_with(
            StaticFetcher(Err(FetchError::Status(503))),
            Arc::new(MemoryJobs::new()),
        );
        let (status, body) = send(
            state,
            post_json(
                "/accounts/acct-1/pull",
                json!({ "url": "https://cal.example.com/ical/abc.ics" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["kind"], "fetch_error");
        assert_eq!(body["retryable"], true);
    }

    #[tokio::test]
    async fn test_pull_non_calendar_body_is_bad_request() {
        let state = state_with(
            StaticFetcher(Ok(FetchResponse {
                status: 200,
                body: "<html>login</html>".to_string(),
            })),
            Arc::new(MemoryJobs::new()),
        );
        let (status, body) = send(
            state,
            post_json(
                "/accounts/acct-1/pull",
                json!({ "url": "https://cal.example.com/ical/abc.ics" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "invalid_feed_format");
    }

    #[tokio::test]
    async fn test_unusable_account_id_is_permanent_bad_request() {
        let dir = tempfile::tempdir().unwrap();
        let coordinator = jobcal_core::SyncCoordinator::new(
            Arc::new(StaticFetcher(Ok(FetchResponse {
                status: 200,
                body: REMOTE_DOC.to_string(),
            }))),
            Arc::new(FileStore::new(dir.path())),
            Arc::new(MemoryJobs::new()),
            jobcal_core::FeedLocator::parse("https://jobs.example.com").unwrap(),
        );

        let (status, body) = send(
            AppState::new(coordinator),
            post_json(
                "/accounts/a%20b/pull",
                json!({ "url": "https://cal.example.com/ical/abc.ics" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "storage_error");
        assert_eq!(body["retryable"], false);
    }

    #[tokio::test]
    async fn test_push_reports_feed_url() {
        let jobs = Arc::new(MemoryJobs::new());
        let mut job = JobRecord::new("7", "Deep Clean");
        job.scheduled_date = Some("2099-01-01".to_string());
        job.scheduled_time = Some("09:00".to_string());
        jobs.set("acct-1", vec![job]);

        let state = state_with(
            StaticFetcher(Err(FetchError::Transport("unused".to_string()))),
            jobs,
        );
        let (status, body) = send(state, post_empty("/accounts/acct-1/push")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["event_count"], 1);
        assert_eq!(body["feed_url"], "https://jobs.example.com/feeds/acct-1.ics");
        assert_eq!(body["integration"]["is_active"], true);
    }

    #[tokio::test]
    async fn test_integration_unknown_account_is_not_found() {
        let (status, body) = send(
            ok_state(),
            Request::get("/accounts/nobody/integration")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");
    }

    #[tokio::test]
    async fn test_deactivate_keeps_record() {
        let state = ok_state();
        state.coordinator().push_sync("acct-1").await.unwrap();

        let (status, body) = send(state.clone(), post_empty("/accounts/acct-1/deactivate")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_active"], false);

        let (status, body) = send(
            state,
            Request::get("/accounts/acct-1/integration")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_active"], false);
    }

    #[tokio::test]
    async fn test_deactivate_unknown_account_is_not_found() {
        let (status, _) = send(ok_state(), post_empty("/accounts/nobody/deactivate")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
