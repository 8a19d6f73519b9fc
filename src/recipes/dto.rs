use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::recipes::filters::{RangeFilter, SearchFilters};
use crate::recipes::repo_types::{Nutrients, Recipe};

const MAX_LIMIT: i64 = 100;
const MAX_RATING: f64 = 5.0;

fn default_page() -> i64 {
    1
}
fn default_limit() -> i64 {
    10
}

#[derive(Debug, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<f64>,
    pub rating_gte: Option<f64>,
    pub rating_lte: Option<f64>,
    pub total_time: Option<i64>,
    pub total_time_gte: Option<i64>,
    pub total_time_lte: Option<i64>,
    pub calories: Option<i64>,
    pub calories_gte: Option<i64>,
    pub calories_lte: Option<i64>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
    pub offset: i64,
}

impl Page {
    pub fn new(page: i64, limit: i64) -> Result<Self, AppError> {
        if page < 1 {
            return Err(AppError::validation("page", "must be greater than or equal to 1"));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(AppError::validation(
                "limit",
                format!("must be between 1 and {MAX_LIMIT}"),
            ));
        }
        let offset = (page - 1)
            .checked_mul(limit)
            .ok_or_else(|| AppError::validation("page", "is too large"))?;
        Ok(Self {
            page,
            limit,
            offset,
        })
    }
}

impl PageParams {
    pub fn validate(&self) -> Result<Page, AppError> {
        Page::new(self.page, self.limit)
    }
}

fn check_rating(field: &'static str, v: Option<f64>) -> Result<Option<f64>, AppError> {
    match v {
        Some(r) if !(0.0..=MAX_RATING).contains(&r) => Err(AppError::validation(
            field,
            format!("must be between 0 and {MAX_RATING}"),
        )),
        _ => Ok(v),
    }
}

fn check_non_negative<T>(field: &'static str, v: Option<T>) -> Result<Option<T>, AppError>
where
    T: PartialOrd + Default + Copy,
{
    match v {
        Some(n) if n < T::default() => Err(AppError::validation(
            field,
            "must be greater than or equal to 0",
        )),
        _ => Ok(v),
    }
}

impl SearchParams {
    pub fn validate(self) -> Result<(SearchFilters, Page), AppError> {
        let page = Page::new(self.page, self.limit)?;
        let rating = RangeFilter::new(
            check_rating("rating", self.rating)?,
            check_rating("rating_gte", self.rating_gte)?,
            check_rating("rating_lte", self.rating_lte)?,
        );
        let total_time = RangeFilter::new(
            check_non_negative("total_time", self.total_time)?,
            check_non_negative("total_time_gte", self.total_time_gte)?,
            check_non_negative("total_time_lte", self.total_time_lte)?,
        );
        let calories = RangeFilter::new(
            check_non_negative("calories", self.calories)?,
            check_non_negative("calories_gte", self.calories_gte)?,
            check_non_negative("calories_lte", self.calories_lte)?,
        );
        let filters = SearchFilters {
            title: self.title,
            cuisine: self.cuisine,
            rating,
            total_time,
            calories,
        };
        Ok((filters, page))
    }
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: i64,
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub rating: Option<f64>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub total_time: Option<i32>,
    pub description: Option<String>,
    pub nutrients: Option<Nutrients>,
    pub serves: Option<String>,
}

impl From<Recipe> for RecipeResponse {
    fn from(r: Recipe) -> Self {
        Self {
            id: r.id,
            title: r.title,
            cuisine: r.cuisine,
            rating: r.rating,
            prep_time: r.prep_time,
            cook_time: r.cook_time,
            total_time: r.total_time,
            description: r.description,
            nutrients: r.nutrients.map(|n| n.0),
            serves: r.serves,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecipePage {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub data: Vec<RecipeResponse>,
}
