//! Chart Routes
//!
//! - GET /api/v1/charts/trend - Calorie trend spec
//! - GET /api/v1/charts/tally - Session tally spec
//!
//! Both take `?format=json` (default) or `?format=svg`.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

use super::require_table;
use crate::api::cookie::{read_cookie, WithSession};
use crate::api::dto::ChartParams;
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::charts::{render_bar_chart, render_line_chart, tally_chart, trend_chart};
use crate::dashboard::seed_tally;

enum ChartFormat {
    Json,
    Svg,
}

fn parse_format(format: &str) -> ApiResult<ChartFormat> {
    match format.to_lowercase().as_str() {
        "json" => Ok(ChartFormat::Json),
        "svg" => Ok(ChartFormat::Svg),
        other => Err(ApiError::Validation(format!(
            "Unsupported chart format '{}', expected json or svg",
            other
        ))),
    }
}

fn respond<T: Serialize>(format: ChartFormat, spec: T, svg: impl FnOnce(&T) -> String) -> Response {
    match format {
        ChartFormat::Json => Json(spec).into_response(),
        ChartFormat::Svg => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "image/svg+xml; charset=utf-8")],
            svg(&spec),
        )
            .into_response(),
    }
}

/// GET /api/v1/charts/trend
pub async fn trend(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartParams>,
) -> ApiResult<Response> {
    let format = parse_format(&params.format)?;
    let outcome = state.load_dataset().await;
    let table = require_table(&outcome)?;

    Ok(respond(format, trend_chart(&table.records), render_line_chart))
}

/// GET /api/v1/charts/tally
pub async fn tally(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ChartParams>,
    headers: HeaderMap,
) -> ApiResult<WithSession<Response>> {
    let format = parse_format(&params.format)?;
    let outcome = state.load_dataset().await;
    require_table(&outcome)?;
    let cookie = read_cookie(&headers, state.cookie_name());

    let entered = state
        .sessions
        .enter(cookie.as_deref(), |s| {
            seed_tally(&outcome, &mut s.tally);
            tally_chart(&s.tally)
        })
        .await;

    Ok(WithSession::new(
        state.cookie_name(),
        &entered.session_id,
        entered.created,
        respond(format, entered.value, render_bar_chart),
    ))
}
