//! Core types for eldhrimnir

pub mod answer;
pub mod query;
pub mod recipe;

pub use answer::{RecipeAnswer, RecipeResponse, SupplementaryData};
pub use query::{QueryType, RecipeQuery, RecipeRequest};
pub use recipe::{Recipe, RecipeIngredient};
