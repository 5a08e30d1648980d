//! Provider traits for the two upstream sources.
//!
//! The orchestrator and the resolver talk to upstreams only through these
//! traits, so tests (and alternative backends) can swap in their own
//! implementations:
//!
//! - [`GenerativeProvider`]: free-form text from a single prompt. Used for
//!   culinary analysis and for name translation.
//! - [`RecipeSource`]: structured recipe search.
//!
//! # Failure semantics
//!
//! Every failure is an `Err`. An empty-but-successful upstream answer is the
//! implementation's call: [`ChatCompletionClient`](super::ChatCompletionClient)
//! reports blank content as [`EmptyResponse`](crate::EldhrimnirError::EmptyResponse)
//! rather than returning `Ok("")`.

use async_trait::async_trait;

use crate::Result;
use crate::types::Recipe;

/// Provider for single-turn text generation.
#[async_trait]
pub trait GenerativeProvider: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Generate a completion for one user prompt.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Provider for structured recipe search.
///
/// A source without credentials may return `Ok(vec![])`; that counts as an
/// available source with no references.
#[async_trait]
pub trait RecipeSource: Send + Sync {
    /// Provider name for logging/debugging.
    fn name(&self) -> &str;

    /// Recipes that use the given ingredients.
    async fn search_by_ingredients(&self, ingredients: &[String]) -> Result<Vec<Recipe>>;

    /// Recipes matching a dish name.
    async fn search_by_dish(&self, dish_name: &str) -> Result<Vec<Recipe>>;
}
