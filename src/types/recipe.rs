//! Recipe records as returned by the recipe-search provider.

use serde::{Deserialize, Deserializer, Serialize};

/// One recipe record.
///
/// Every field defaults, since the search endpoints populate different
/// subsets (`findByIngredients` omits instructions and servings, for one).
/// An explicit `null` reads as the default too.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub image_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub servings: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ready_in_minutes: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub extended_ingredients: Vec<RecipeIngredient>,
}

/// An ingredient line of a [`Recipe`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub unit: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
