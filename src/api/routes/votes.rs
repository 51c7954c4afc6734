//! Vote Routes
//!
//! - POST /api/v1/votes - Vote for a dish
//! - GET /api/v1/votes - Session tally, highest count first

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use super::require_table;
use crate::api::cookie::{read_cookie, WithSession};
use crate::api::dto::{TallyResponse, VoteRequest, VoteResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::dashboard::{cast_vote, seed_tally};

/// POST /api/v1/votes
///
/// A rejected vote still carries the session cookie, so the session it
/// started stays reachable.
pub async fn cast(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<VoteRequest>,
) -> ApiResult<WithSession<Response>> {
    if req.dish.trim().is_empty() {
        return Err(ApiError::Validation("Dish cannot be empty".to_string()));
    }

    let outcome = state.load_dataset().await;
    require_table(&outcome)?;
    let cookie = read_cookie(&headers, state.cookie_name());

    let entered = state
        .sessions
        .enter(cookie.as_deref(), |s| {
            cast_vote(&outcome, &mut s.tally, &req.dish).map(|receipt| VoteResponse {
                dish: receipt.dish,
                count: receipt.count,
                message: receipt.message.to_string(),
                tally: s.tally.sorted(),
            })
        })
        .await;

    let inner = match entered.value {
        Ok(response) => {
            tracing::debug!(
                session_id = %entered.session_id,
                dish = %response.dish,
                count = response.count,
                "Vote recorded"
            );
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => {
            tracing::debug!(session_id = %entered.session_id, dish = %req.dish, "Vote rejected");
            ApiError::from(e).into_response()
        }
    };

    Ok(WithSession::new(
        state.cookie_name(),
        &entered.session_id,
        entered.created,
        inner,
    ))
}

/// GET /api/v1/votes
pub async fn list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<WithSession<Json<TallyResponse>>> {
    let outcome = state.load_dataset().await;
    require_table(&outcome)?;
    let cookie = read_cookie(&headers, state.cookie_name());

    let entered = state
        .sessions
        .enter(cookie.as_deref(), |s| {
            seed_tally(&outcome, &mut s.tally);
            TallyResponse {
                total_votes: s.tally.total_votes(),
                entries: s.tally.sorted(),
            }
        })
        .await;

    Ok(WithSession::new(
        state.cookie_name(),
        &entered.session_id,
        entered.created,
        Json(entered.value),
    ))
}
