//! Normalization of raw recipe entries.
//!
//! Input files mark absent values inconsistently: `null`, `""`, `"NaN"`,
//! `"null"`. All of them become `None` here.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::recipes::{NewRecipe, Nutrients};

const CUISINE_MAX: usize = 255;
const TITLE_MAX: usize = 500;
const SERVES_MAX: usize = 100;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntryError {
    #[error("entry is not a JSON object")]
    NotAnObject,

    #[error("field `{0}` is not a scalar value")]
    NotText(&'static str),

    #[error("field `{field}` is longer than {max} characters")]
    TooLong { field: &'static str, max: usize },

    #[error("field `{0}` contains a NUL character")]
    ContainsNul(&'static str),
}

pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => {
            s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("null")
        }
        _ => false,
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !is_missing(v))
}

/// Scalar as text: strings verbatim, numbers and booleans in JSON form.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn text_field(
    entry: &Map<String, Value>,
    field: &'static str,
    max: Option<usize>,
) -> Result<Option<String>, EntryError> {
    let Some(value) = present(entry.get(field)) else {
        return Ok(None);
    };
    let text = scalar_text(value).ok_or(EntryError::NotText(field))?;
    reject_nul(field, &text)?;
    if let Some(max) = max {
        if text.chars().count() > max {
            return Err(EntryError::TooLong { field, max });
        }
    }
    Ok(Some(text))
}

/// Postgres text and JSONB cannot hold U+0000.
fn reject_nul(field: &'static str, text: &str) -> Result<(), EntryError> {
    if text.contains('\0') {
        return Err(EntryError::ContainsNul(field));
    }
    Ok(())
}

/// Decimal rating; unparsable, NaN or infinite values are absent.
pub fn parse_rating(value: Option<&Value>) -> Option<f64> {
    let rating = match present(value)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    rating.is_finite().then_some(rating)
}

/// Non-negative whole minutes.
pub fn parse_minutes(value: Option<&Value>) -> Option<i32> {
    let minutes = match present(value)? {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i as f64,
            None => n.as_f64()?,
        },
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    if minutes.fract() != 0.0 || !(0.0..=i32::MAX as f64).contains(&minutes) {
        return None;
    }
    Some(minutes as i32)
}

/// Drops missing values; an empty result, a missing value or a non-object is absent.
pub fn clean_nutrients(value: Option<&Value>) -> Result<Option<Nutrients>, EntryError> {
    let Some(Value::Object(map)) = present(value) else {
        return Ok(None);
    };
    let mut cleaned = Vec::with_capacity(map.len());
    for (name, v) in map.iter().filter(|(_, v)| !is_missing(v)) {
        let text = scalar_text(v).unwrap_or_else(|| v.to_string());
        reject_nul("nutrients", name)?;
        reject_nul("nutrients", &text)?;
        cleaned.push((name.clone(), text));
    }
    let cleaned: Nutrients = cleaned.into_iter().collect();
    Ok((!cleaned.is_empty()).then_some(cleaned))
}

pub fn parse_entry(entry: &Value) -> Result<NewRecipe, EntryError> {
    let Value::Object(entry) = entry else {
        return Err(EntryError::NotAnObject);
    };
    Ok(NewRecipe {
        cuisine: text_field(entry, "cuisine", Some(CUISINE_MAX))?,
        title: text_field(entry, "title", Some(TITLE_MAX))?,
        rating: parse_rating(entry.get("rating")),
        prep_time: parse_minutes(entry.get("prep_time")),
        cook_time: parse_minutes(entry.get("cook_time")),
        total_time: parse_minutes(entry.get("total_time")),
        description: text_field(entry, "description", None)?,
        nutrients: clean_nutrients(entry.get("nutrients"))?,
        serves: text_field(entry, "serves", Some(SERVES_MAX))?,
    })
}
