//! Outbound answer types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{QueryType, Recipe};
use crate::{EldhrimnirError, Result};

/// Metadata describing which sources contributed to an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementaryData {
    pub ai_available: bool,
    pub api_available: bool,
    /// Number of reference recipes obtained from search.
    pub reference_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_recipes: Option<Vec<Recipe>>,
    /// Short note on the supplementary material (ingredient queries only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutrition_tips: Option<String>,
}

/// A successful answer for one query. Built fresh per request.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeAnswer {
    pub result: String,
    pub query_type: QueryType,
    pub timestamp: DateTime<Utc>,
    pub supplementary_data: SupplementaryData,
}

/// Wire shape returned to callers: success payload or failure message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeResponse {
    #[serde(default)]
    pub result: String,
    #[serde(rename = "type", default)]
    pub query_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(
        rename = "supplementaryData",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub supplementary_data: Option<SupplementaryData>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RecipeResponse {
    /// Failure response carrying a human-readable message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            result: String::new(),
            query_type: String::new(),
            timestamp: None,
            supplementary_data: None,
            success: false,
            message: Some(message.into()),
        }
    }

    /// Failure response for an error, using wording fit for end users.
    pub fn from_error(err: &EldhrimnirError) -> Self {
        match err {
            EldhrimnirError::InvalidInput(msg) => Self::failure(msg.clone()),
            EldhrimnirError::NoSourcesAvailable => {
                Self::failure("no recipe sources are available, please try again later")
            }
            _ => Self::failure("request processing failed, please try again later"),
        }
    }

    pub fn from_result(result: Result<RecipeAnswer>) -> Self {
        match result {
            Ok(answer) => answer.into(),
            Err(e) => Self::from_error(&e),
        }
    }
}

impl From<RecipeAnswer> for RecipeResponse {
    fn from(answer: RecipeAnswer) -> Self {
        Self {
            result: answer.result,
            query_type: answer.query_type.as_str().to_string(),
            timestamp: Some(answer.timestamp),
            supplementary_data: Some(answer.supplementary_data),
            success: true,
            message: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_serializes_with_wire_names() {
        let answer = RecipeAnswer {
            result: "text".to_string(),
            query_type: QueryType::Dish,
            timestamp: Utc::now(),
            supplementary_data: SupplementaryData {
                ai_available: true,
                api_available: false,
                reference_count: 0,
                api_recipes: None,
                nutrition_tips: None,
            },
        };
        let json = serde_json::to_value(RecipeResponse::from(answer)).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["type"], "dish");
        assert_eq!(json["supplementaryData"]["ai_available"], true);
        assert_eq!(json["supplementaryData"]["api_available"], false);
        assert!(json["supplementaryData"].get("api_recipes").is_none());
        assert!(json.get("message").is_none());
    }

    #[test]
    fn failure_has_message_and_no_payload() {
        let json =
            serde_json::to_value(RecipeResponse::from_error(&EldhrimnirError::NoSourcesAvailable))
                .unwrap();
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("no recipe sources"));
        assert!(json.get("supplementaryData").is_none());
        assert_eq!(json["result"], "");
    }
}
