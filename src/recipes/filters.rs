//! Search filter composition.
//!
//! Query parameters are lowered into a flat list of [`Condition`]s, AND-ed
//! together, and only then rendered into SQL. Listing is a search with no
//! conditions.

use sqlx::{Postgres, QueryBuilder};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Title,
    Cuisine,
    Rating,
    TotalTime,
}

impl Column {
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Title => "title",
            Column::Cuisine => "cuisine",
            Column::Rating => "rating",
            Column::TotalTime => "total_time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Eq,
    Gte,
    Lte,
}

impl Cmp {
    fn sql(self) -> &'static str {
        match self {
            Cmp::Eq => "=",
            Cmp::Gte => ">=",
            Cmp::Lte => "<=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Real(f64),
    Int(i64),
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::Real(v)
    }
}

// Bound as int8; values past the INTEGER column range simply match nothing.
impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::Int(v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Case-insensitive literal substring match.
    Contains { column: Column, needle: String },
    Compare { column: Column, cmp: Cmp, value: Scalar },
    /// Literal substring of the serialized nutrients blob.
    NutrientsText(String),
}

/// The exact/gte/lte trio for one field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeFilter<T> {
    pub exact: Option<T>,
    pub gte: Option<T>,
    pub lte: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            exact: None,
            gte: None,
            lte: None,
        }
    }
}

impl<T: Copy> RangeFilter<T> {
    pub fn new(exact: Option<T>, gte: Option<T>, lte: Option<T>) -> Self {
        Self { exact, gte, lte }
    }

    /// An exact value overrides both bounds. Otherwise every bound present is
    /// handed to `comparator`, which may decline it by returning `None`.
    pub fn lower<F>(&self, mut comparator: F) -> Vec<Condition>
    where
        F: FnMut(Cmp, T) -> Option<Condition>,
    {
        if let Some(v) = self.exact {
            return comparator(Cmp::Eq, v).into_iter().collect();
        }
        [(Cmp::Gte, self.gte), (Cmp::Lte, self.lte)]
            .into_iter()
            .filter_map(|(cmp, v)| v.and_then(|v| comparator(cmp, v)))
            .collect()
    }
}

/// Comparator for a plain scalar column.
pub fn on_column<T: Into<Scalar>>(column: Column) -> impl FnMut(Cmp, T) -> Option<Condition> {
    move |cmp, v| {
        Some(Condition::Compare {
            column,
            cmp,
            value: v.into(),
        })
    }
}

/// Comparator for calories, which only exist as text inside `nutrients`.
///
/// Range bounds have no textual equivalent and are dropped: `calories_gte`
/// and `calories_lte` are accepted but have no effect on results.
pub fn on_calories_text(cmp: Cmp, kcal: i64) -> Option<Condition> {
    match cmp {
        Cmp::Eq => Some(Condition::NutrientsText(format!(
            "\"calories\": \"{kcal} kcal\""
        ))),
        Cmp::Gte | Cmp::Lte => None,
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    pub title: Option<String>,
    pub cuisine: Option<String>,
    pub rating: RangeFilter<f64>,
    pub total_time: RangeFilter<i64>,
    pub calories: RangeFilter<i64>,
}

impl SearchFilters {
    pub fn conditions(&self) -> Vec<Condition> {
        let mut out = Vec::new();
        for (column, needle) in [(Column::Title, &self.title), (Column::Cuisine, &self.cuisine)] {
            if let Some(needle) = needle.as_deref().filter(|s| !s.is_empty()) {
                out.push(Condition::Contains {
                    column,
                    needle: needle.to_string(),
                });
            }
        }
        out.extend(self.rating.lower(on_column(Column::Rating)));
        out.extend(self.total_time.lower(on_column(Column::TotalTime)));
        out.extend(self.calories.lower(on_calories_text));
        out
    }
}

/// `%needle%` with LIKE metacharacters in `needle` escaped.
pub fn contains_pattern(needle: &str) -> String {
    let mut out = String::with_capacity(needle.len() + 2);
    out.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

pub fn push_where(qb: &mut QueryBuilder<'_, Postgres>, conditions: &[Condition]) {
    for (i, condition) in conditions.iter().enumerate() {
        qb.push(if i == 0 { " WHERE " } else { " AND " });
        match condition {
            Condition::Contains { column, needle } => {
                qb.push(column.as_str())
                    .push(" ILIKE ")
                    .push_bind(contains_pattern(needle));
            }
            Condition::Compare { column, cmp, value } => {
                qb.push(column.as_str()).push(" ").push(cmp.sql()).push(" ");
                match *value {
                    Scalar::Real(v) => qb.push_bind(v),
                    Scalar::Int(v) => qb.push_bind(v),
                };
            }
            Condition::NutrientsText(fragment) => {
                qb.push("nutrients::text LIKE ")
                    .push_bind(contains_pattern(fragment));
            }
        }
    }
}
