use sqlx::PgPool;
use tracing::debug;

use crate::recipes::dto::{Page, RecipePage, RecipeResponse};
use crate::recipes::filters::{Condition, SearchFilters};
use crate::recipes::repo;

async fn query_page(
    db: &PgPool,
    conditions: &[Condition],
    page: Page,
) -> Result<RecipePage, sqlx::Error> {
    let total = repo::count(db, conditions).await?;
    let rows = repo::fetch_page(db, conditions, page.limit, page.offset).await?;
    debug!(
        total,
        returned = rows.len(),
        conditions = conditions.len(),
        "recipes page fetched"
    );
    Ok(RecipePage {
        page: page.page,
        limit: page.limit,
        total,
        data: rows.into_iter().map(RecipeResponse::from).collect(),
    })
}

pub async fn list_recipes(db: &PgPool, page: Page) -> Result<RecipePage, sqlx::Error> {
    query_page(db, &[], page).await
}

pub async fn search_recipes(
    db: &PgPool,
    filters: &SearchFilters,
    page: Page,
) -> Result<RecipePage, sqlx::Error> {
    query_page(db, &filters.conditions(), page).await
}
