use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{error::AppError, extract::QueryParams, state::AppState};

use super::dto::{PageParams, RecipePage, SearchParams};
use super::services;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/search", get(search_recipes))
}

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    QueryParams(p): QueryParams<PageParams>,
) -> Result<Json<RecipePage>, AppError> {
    let page = p.validate()?;
    let body = services::list_recipes(&state.db, page).await?;
    Ok(Json(body))
}

#[instrument(skip(state))]
pub async fn search_recipes(
    State(state): State<AppState>,
    QueryParams(p): QueryParams<SearchParams>,
) -> Result<Json<RecipePage>, AppError> {
    let (filters, page) = p.validate()?;
    let body = services::search_recipes(&state.db, &filters, page).await?;
    Ok(Json(body))
}
