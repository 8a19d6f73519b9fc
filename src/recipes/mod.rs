pub mod dto;
pub mod filters;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;

use crate::state::AppState;
use axum::Router;

pub use repo_types::{NewRecipe, Nutrients, Recipe};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::read_routes())
}
