pub mod accounts;
pub mod feeds;

use axum::{
    Json, Router,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use jobcal_core::store::StoreError;
use jobcal_core::{JobSourceError, SyncError};
use serde::Serialize;

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(feeds::router())
        .merge(accounts::router())
        .with_state(state)
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: &'static str,
    pub retryable: bool,
}

/// Sync errors keep their kind so callers can decide whether to retry
pub enum AppError {
    Sync(SyncError),
    NotFound(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Sync(e) => match e {
                SyncError::MalformedUrl(_)
                | SyncError::NotAFeedUrl(_)
                | SyncError::InvalidFeedFormat { .. }
                | SyncError::Storage(StoreError::InvalidAccountId(_))
                | SyncError::JobSource(JobSourceError::InvalidAccountId(_)) => {
                    StatusCode::BAD_REQUEST
                }
                SyncError::Fetch(_) => StatusCode::BAD_GATEWAY,
                SyncError::Storage(_) | SyncError::JobSource(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Sync(e) => ErrorResponse {
                error: e.to_string(),
                kind: e.kind(),
                retryable: e.is_retryable(),
            },
            AppError::NotFound(what) => ErrorResponse {
                error: format!("{what} not found"),
                kind: "not_found",
                retryable: false,
            },
        };
        (status, Json(body)).into_response()
    }
}

impl From<SyncError> for AppError {
    fn from(err: SyncError) -> Self {
        AppError::Sync(err)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono_tz::Tz;
    use jobcal_core::FetchError;
    use jobcal_core::fetch::{FeedFetcher, FetchResponse};
    use jobcal_core::jobs::MemoryJobs;
    use jobcal_core::store::MemoryStore;
    use jobcal_core::{FeedLocator, SyncCoordinator};
    use url::Url;

    use crate::state::AppState;

    pub const REMOTE_DOC: &str = "BEGIN:VCALENDAR\r\nBEGIN:VEVENT\r\nUID:r-1\r\nSUMMARY:Site visit\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";

    pub struct StaticFetcher(pub Result<FetchResponse, FetchError>);

    #[async_trait]
    impl FeedFetcher for StaticFetcher {
        async fn fetch_text(&self, _url: &Url) -> Result<FetchResponse, FetchError> {
            self.0.clone()
        }
    }

    pub fn state_with(fetcher: StaticFetcher, jobs: Arc<MemoryJobs>) -> AppState {
        let coordinator = SyncCoordinator::new(
            Arc::new(fetcher),
            Arc::new(MemoryStore::new()),
            jobs,
            FeedLocator::parse("https://jobs.example.com").unwrap(),
        )
        .with_timezone(Tz::UTC);
        AppState::new(coordinator)
    }

    pub fn ok_state() -> AppState {
        state_with(
            StaticFetcher(Ok(FetchResponse {
                status: 200,
                body: REMOTE_DOC.to_string(),
            })),
            Arc::new(MemoryJobs::new()),
        )
    }
}
