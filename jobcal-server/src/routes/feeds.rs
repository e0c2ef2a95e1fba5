//! Published feed endpoint that calendar apps subscribe to

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
};
use jobcal_core::constants::ICS_MEDIA_TYPE;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/feeds/{file}", get(get_feed))
}

/// GET /feeds/:account.ics - Serve the last pushed document
async fn get_feed(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let account_id = file
        .strip_suffix(".ics")
        .ok_or_else(|| AppError::NotFound(format!("Feed {file}")))?;

    let document = state
        .coordinator()
        .published_document(account_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Feed for {account_id}")))?;

    Ok(([(header::CONTENT_TYPE, ICS_MEDIA_TYPE)], document))
}
