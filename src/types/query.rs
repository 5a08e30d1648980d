//! Inbound query types.

use serde::{Deserialize, Serialize};

use crate::{EldhrimnirError, Result};

/// Which kind of question is being asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    /// "What can I make with these ingredients?"
    Ingredients,
    /// "How do I make this dish?"
    Dish,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryType::Ingredients => "ingredients",
            QueryType::Dish => "dish",
        }
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Request shape accepted from callers, mirroring the JSON body
/// `{ "queryType", "ingredients", "dishName" }`.
///
/// `query_type` is kept as a raw string so unknown values can be rejected
/// with a readable message instead of a deserialization error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    #[serde(default)]
    pub query_type: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub dish_name: String,
}

impl RecipeRequest {
    /// Build an ingredient request.
    pub fn ingredients<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            query_type: QueryType::Ingredients.as_str().to_string(),
            ingredients: items.into_iter().map(Into::into).collect(),
            dish_name: String::new(),
        }
    }

    /// Build a dish request.
    pub fn dish(name: impl Into<String>) -> Self {
        Self {
            query_type: QueryType::Dish.as_str().to_string(),
            ingredients: Vec::new(),
            dish_name: name.into(),
        }
    }

    /// Validate and convert into a [`RecipeQuery`].
    pub fn into_query(self) -> Result<RecipeQuery> {
        let query = match self.query_type.as_str() {
            "ingredients" => RecipeQuery::Ingredients(self.ingredients),
            "dish" => RecipeQuery::Dish(self.dish_name),
            _ => {
                return Err(EldhrimnirError::InvalidInput(
                    "query type must be 'ingredients' or 'dish'".to_string(),
                ));
            }
        };
        query.normalized()
    }
}

/// A validated query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipeQuery {
    Ingredients(Vec<String>),
    Dish(String),
}

impl RecipeQuery {
    pub fn query_type(&self) -> QueryType {
        match self {
            RecipeQuery::Ingredients(_) => QueryType::Ingredients,
            RecipeQuery::Dish(_) => QueryType::Dish,
        }
    }

    /// Trim every item and drop blank ingredients.
    ///
    /// Fails with [`EldhrimnirError::InvalidInput`] when nothing is left.
    pub fn normalized(self) -> Result<Self> {
        match self {
            RecipeQuery::Ingredients(items) => {
                let items: Vec<String> = items
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect();
                if items.is_empty() {
                    return Err(EldhrimnirError::InvalidInput(
                        "ingredient list must not be empty".to_string(),
                    ));
                }
                Ok(RecipeQuery::Ingredients(items))
            }
            RecipeQuery::Dish(name) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(EldhrimnirError::InvalidInput(
                        "dish name must not be empty".to_string(),
                    ));
                }
                Ok(RecipeQuery::Dish(name.to_string()))
            }
        }
    }
}
