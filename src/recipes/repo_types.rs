use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};

/// Nutrient name to textual value (e.g. `"calories" => "250 kcal"`). No keys are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Nutrients(BTreeMap<String, String>);

impl Nutrients {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Nutrients {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One row of the `recipes` table.
#[derive(Debug, Clone, FromRow)]
pub struct Recipe {
    pub id: i64,
    pub cuisine: Option<String>,
    pub title: Option<String>,
    pub rating: Option<f64>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub total_time: Option<i32>,
    pub description: Option<String>,
    pub nutrients: Option<Json<Nutrients>>,
    pub serves: Option<String>,
}

/// A cleaned row ready for insertion; ids are assigned by the store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewRecipe {
    pub cuisine: Option<String>,
    pub title: Option<String>,
    pub rating: Option<f64>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub total_time: Option<i32>,
    pub description: Option<String>,
    pub nutrients: Option<Nutrients>,
    pub serves: Option<String>,
}

pub(crate) const RECIPE_COLUMNS: &str = "id, cuisine, title, rating, prep_time, cook_time, \
     total_time, description, nutrients, serves";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nutrients_serialize_as_flat_object() {
        let n: Nutrients = [("protein", "10 g"), ("calories", "250 kcal")]
            .into_iter()
            .collect();
        let json = serde_json::to_string(&n).unwrap();
        assert_eq!(json, r#"{"calories":"250 kcal","protein":"10 g"}"#);

        let back: Nutrients = serde_json::from_str(&json).unwrap();
        assert_eq!(back, n);
        assert_eq!(back.get("protein"), Some("10 g"));
    }
}
