//! Dashboard Routes
//!
//! The server-rendered page and its JSON form.
//!
//! - GET / - HTML dashboard
//! - POST /vote - Form submit, answers with the re-rendered page
//! - GET /api/v1/dashboard - Render pass as JSON

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Html,
    Form, Json,
};
use std::sync::Arc;

use crate::api::cookie::{read_cookie, WithSession};
use crate::api::dto::VoteRequest;
use crate::api::state::AppState;
use crate::dashboard::{cast_vote, render_html, render_pass, DashboardView, Notice};

/// GET /
pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> WithSession<Html<String>> {
    let outcome = state.load_dataset().await;
    let cookie = read_cookie(&headers, state.cookie_name());

    let entered = state
        .sessions
        .enter(cookie.as_deref(), |s| render_pass(&outcome, &mut s.tally, None))
        .await;

    WithSession::new(
        state.cookie_name(),
        &entered.session_id,
        entered.created,
        Html(render_html(&entered.value)),
    )
}

/// POST /vote
///
/// Records the vote and answers with the page, showing the acknowledgment
/// or, for a dish that is not on the menu, an error notice.
pub async fn submit_vote(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<VoteRequest>,
) -> WithSession<(StatusCode, Html<String>)> {
    let outcome = state.load_dataset().await;
    let cookie = read_cookie(&headers, state.cookie_name());

    let entered = state
        .sessions
        .enter(cookie.as_deref(), |s| {
            match cast_vote(&outcome, &mut s.tally, &form.dish) {
                Ok(receipt) => (
                    StatusCode::OK,
                    render_pass(&outcome, &mut s.tally, Some(&receipt)),
                ),
                Err(e) => {
                    let mut view = render_pass(&outcome, &mut s.tally, None);
                    view.notices.insert(0, Notice::Error(e.to_string()));
                    (StatusCode::BAD_REQUEST, view)
                }
            }
        })
        .await;

    let (status, view) = entered.value;
    tracing::debug!(
        session_id = %entered.session_id,
        dish = %form.dish,
        accepted = status.is_success(),
        "Vote submitted from form"
    );

    WithSession::new(
        state.cookie_name(),
        &entered.session_id,
        entered.created,
        (status, Html(render_html(&view))),
    )
}

/// GET /api/v1/dashboard
pub async fn dashboard_json(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> WithSession<Json<DashboardView>> {
    let outcome = state.load_dataset().await;
    let cookie = read_cookie(&headers, state.cookie_name());

    let entered = state
        .sessions
        .enter(cookie.as_deref(), |s| render_pass(&outcome, &mut s.tally, None))
        .await;

    WithSession::new(
        state.cookie_name(),
        &entered.session_id,
        entered.created,
        Json(entered.value),
    )
}
