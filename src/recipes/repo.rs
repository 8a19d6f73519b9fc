use sqlx::{types::Json, Executor, PgPool, Postgres, QueryBuilder};

use crate::recipes::filters::{push_where, Condition};
use crate::recipes::repo_types::{NewRecipe, Recipe, RECIPE_COLUMNS};

/// Number of rows matching every condition.
pub async fn count(db: &PgPool, conditions: &[Condition]) -> Result<i64, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM recipes");
    push_where(&mut qb, conditions);
    qb.build_query_scalar::<i64>().fetch_one(db).await
}

/// One page of matching rows, best rated first, unrated last, ties by id.
pub async fn fetch_page(
    db: &PgPool,
    conditions: &[Condition],
    limit: i64,
    offset: i64,
) -> Result<Vec<Recipe>, sqlx::Error> {
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes"));
    push_where(&mut qb, conditions);
    qb.push(" ORDER BY rating DESC NULLS LAST, id ASC LIMIT ")
        .push_bind(limit)
        .push(" OFFSET ")
        .push_bind(offset);
    qb.build_query_as::<Recipe>().fetch_all(db).await
}

fn insert_query(rows: &[NewRecipe]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::<Postgres>::new(
        "INSERT INTO recipes (cuisine, title, rating, prep_time, cook_time, total_time, \
         description, nutrients, serves) ",
    );
    qb.push_values(rows.iter().cloned(), |mut b, r| {
        b.push_bind(r.cuisine)
            .push_bind(r.title)
            .push_bind(r.rating)
            .push_bind(r.prep_time)
            .push_bind(r.cook_time)
            .push_bind(r.total_time)
            .push_bind(r.description)
            .push_bind(r.nutrients.map(Json))
            .push_bind(r.serves);
    });
    qb
}

/// Multi-row insert of `rows`; an empty slice is a no-op.
pub async fn insert_batch<'c, E>(executor: E, rows: &[NewRecipe]) -> Result<u64, sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    if rows.is_empty() {
        return Ok(0);
    }
    let mut qb = insert_query(rows);
    let done = qb.build().execute(executor).await?;
    Ok(done.rows_affected())
}

/// Removes every row and restarts id assignment.
pub async fn truncate<'c, E>(executor: E) -> Result<(), sqlx::Error>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query("TRUNCATE TABLE recipes RESTART IDENTITY")
        .execute(executor)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_binds_nine_columns_per_row() {
        let rows = vec![NewRecipe::default(), NewRecipe::default()];
        let qb = insert_query(&rows);
        let sql = qb.sql();
        assert!(sql.starts_with("INSERT INTO recipes (cuisine, title, rating"));
        assert!(sql.contains("$18"));
        assert!(!sql.contains("$19"));
    }
}
