//! Meal Routes
//!
//! Read-only views of the loaded dataset.
//!
//! - GET /api/v1/meals - All records in file order
//! - GET /api/v1/dishes - Distinct dish names

use axum::{extract::State, Json};
use std::sync::Arc;

use super::require_table;
use crate::api::dto::{DishesResponse, MealsResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;

/// GET /api/v1/meals
pub async fn list_meals(State(state): State<Arc<AppState>>) -> ApiResult<Json<MealsResponse>> {
    let outcome = state.load_dataset().await;
    let table = require_table(&outcome)?;

    Ok(Json(MealsResponse {
        source: table.source.display().to_string(),
        encoding: table.encoding.to_string(),
        total: table.len(),
        records: table.records.clone(),
    }))
}

/// GET /api/v1/dishes
pub async fn list_dishes(State(state): State<Arc<AppState>>) -> ApiResult<Json<DishesResponse>> {
    let outcome = state.load_dataset().await;
    let table = require_table(&outcome)?;

    Ok(Json(DishesResponse {
        dishes: table.distinct_dishes(),
    }))
}
