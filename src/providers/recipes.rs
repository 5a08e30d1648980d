//! Spoonacular-style recipe search client.
//!
//! Every search follows the same path:
//!
//! 1. no API key → empty result, not an error;
//! 2. resolve the query through the [`NameResolver`]; nothing resolvable →
//!    empty result without an upstream call;
//! 3. look up the raw response body cached under the *original* query;
//! 4. on a miss, GET the endpoint (failures propagate, no retry);
//! 5. cache the raw body and return the parsed records.
//!
//! See: <https://spoonacular.com/food-api/docs>

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use super::traits::RecipeSource;
use super::{DEFAULT_HTTP_TIMEOUT, check_status, http_client, record_request};
use crate::cache::TtlCache;
use crate::resolver::NameResolver;
use crate::types::Recipe;
use crate::{EldhrimnirError, Result};

/// Default base URL for the recipe API.
pub const DEFAULT_BASE_URL: &str = "https://api.spoonacular.com/recipes";

/// How long an ingredient search body stays cached.
pub const INGREDIENT_SEARCH_TTL: Duration = Duration::from_secs(30 * 60);

/// How long a dish search body stays cached.
pub const DISH_SEARCH_TTL: Duration = Duration::from_secs(60 * 60);

/// How long a single recipe lookup stays cached.
pub const RECIPE_INFO_TTL: Duration = Duration::from_secs(60 * 60);

/// Recipes requested per search.
const RESULTS_PER_SEARCH: &str = "5";

/// Client for the recipe-search API.
pub struct RecipeSearchClient {
    api_key: Option<String>,
    http: Client,
    base_url: String,
    resolver: Arc<NameResolver>,
    cache: Arc<TtlCache<String>>,
}

impl RecipeSearchClient {
    /// Create a client for the default endpoint. With `api_key` unset every
    /// search returns no recipes.
    pub fn new(
        api_key: Option<String>,
        resolver: Arc<NameResolver>,
        cache: Arc<TtlCache<String>>,
    ) -> Result<Self> {
        Ok(Self {
            api_key,
            http: http_client(DEFAULT_HTTP_TIMEOUT)?,
            base_url: DEFAULT_BASE_URL.to_string(),
            resolver,
            cache,
        })
    }

    /// Use a custom base URL (for testing with wiremock).
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Replace the HTTP request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = http_client(timeout)?;
        Ok(self)
    }

    /// Whether an API key is configured.
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search recipes that use the given ingredients.
    #[instrument(skip(self))]
    pub async fn search_by_ingredients(&self, ingredients: &[String]) -> Result<Vec<Recipe>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };

        let terms = self.resolver.resolve_ingredients(ingredients).await;
        if terms.is_empty() {
            debug!("no ingredient resolved to a search term");
            return Ok(Vec::new());
        }

        let cache_key = format!("ingredients:{}", ingredients.join("|"));
        if let Some(recipes) = self.cached::<Vec<Recipe>>(&cache_key) {
            return Ok(recipes);
        }

        let url = format!("{}/findByIngredients", self.base_url);
        let query = [
            ("ingredients", terms.join(",")),
            ("number", RESULTS_PER_SEARCH.to_string()),
            ("apiKey", api_key.to_string()),
        ];
        let body = self.fetch("search_by_ingredients", &url, &query).await?;
        let recipes: Vec<Recipe> = serde_json::from_str(&body)?;

        self.cache.put(cache_key, body, INGREDIENT_SEARCH_TTL);
        Ok(recipes)
    }

    /// Search recipes matching a dish name.
    #[instrument(skip(self))]
    pub async fn search_by_dish(&self, dish_name: &str) -> Result<Vec<Recipe>> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(Vec::new());
        };

        let Some(term) = self.resolver.resolve_dish(dish_name).await else {
            debug!("dish name did not resolve to a search term");
            return Ok(Vec::new());
        };

        let cache_key = format!("dish:{dish_name}");
        if let Some(page) = self.cached::<SearchPage>(&cache_key) {
            return Ok(page.results);
        }

        let url = format!("{}/complexSearch", self.base_url);
        let query = [
            ("query", term),
            ("number", RESULTS_PER_SEARCH.to_string()),
            ("addRecipeInformation", "true".to_string()),
            ("apiKey", api_key.to_string()),
        ];
        let body = self.fetch("search_by_dish", &url, &query).await?;
        let page: SearchPage = serde_json::from_str(&body)?;

        self.cache.put(cache_key, body, DISH_SEARCH_TTL);
        Ok(page.results)
    }

    /// Fetch full information for one recipe.
    ///
    /// Unlike the searches, this requires an API key.
    #[instrument(skip(self))]
    pub async fn recipe_information(&self, id: u64) -> Result<Recipe> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(EldhrimnirError::NotConfigured("recipe search"))?;

        let cache_key = format!("recipe_info:{id}");
        if let Some(recipe) = self.cached::<Recipe>(&cache_key) {
            return Ok(recipe);
        }

        let url = format!("{}/{id}/information", self.base_url);
        let query = [
            ("includeNutrition", "false".to_string()),
            ("apiKey", api_key.to_string()),
        ];
        let body = self.fetch("recipe_information", &url, &query).await?;
        let recipe: Recipe = serde_json::from_str(&body)?;

        self.cache.put(cache_key, body, RECIPE_INFO_TTL);
        Ok(recipe)
    }

    /// Decode a cached body. A body that no longer decodes counts as a miss.
    fn cached<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let body = self.cache.get(key)?;
        match serde_json::from_str(&body) {
            Ok(value) => {
                debug!(key, "recipe cache hit");
                Some(value)
            }
            Err(e) => {
                warn!(key, error = %e, "discarding undecodable cached body");
                None
            }
        }
    }

    async fn fetch(
        &self,
        operation: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<String> {
        let start = Instant::now();
        let result = self.get_body(url, query).await;
        record_request("spoonacular", operation, start, result.is_ok());
        result
    }

    async fn get_body(&self, url: &str, query: &[(&str, String)]) -> Result<String> {
        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| EldhrimnirError::Http(e.to_string()))?;

        check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| EldhrimnirError::Http(e.to_string()))
    }
}

/// `complexSearch` response page.
#[derive(Deserialize)]
struct SearchPage {
    #[serde(default)]
    results: Vec<Recipe>,
}

#[async_trait]
impl RecipeSource for RecipeSearchClient {
    fn name(&self) -> &str {
        "spoonacular"
    }

    async fn search_by_ingredients(&self, ingredients: &[String]) -> Result<Vec<Recipe>> {
        RecipeSearchClient::search_by_ingredients(self, ingredients).await
    }

    async fn search_by_dish(&self, dish_name: &str) -> Result<Vec<Recipe>> {
        RecipeSearchClient::search_by_dish(self, dish_name).await
    }
}

/// Render recipes as reference prose.
///
/// Preparation text from upstream is never reproduced; a recipe that has
/// instructions gets a placeholder line instead.
pub fn format_references(recipes: &[Recipe]) -> String {
    if recipes.is_empty() {
        return "No reference recipes found.".to_string();
    }

    let mut out = String::from("## Reference Recipes\n\n");
    for (i, recipe) in recipes.iter().enumerate() {
        let _ = writeln!(out, "### Reference {}: {}", i + 1, recipe.title);

        if recipe.ready_in_minutes > 0 {
            let _ = writeln!(out, "- **Ready in**: {} minutes", recipe.ready_in_minutes);
        }
        if recipe.servings > 0 {
            let _ = writeln!(out, "- **Servings**: {}", recipe.servings);
        }
        if !recipe.extended_ingredients.is_empty() {
            out.push_str("- **Ingredients**:\n");
            for ing in &recipe.extended_ingredients {
                let _ = writeln!(out, "  - {}: {:.1} {}", ing.name, ing.amount, ing.unit);
            }
        }
        if !recipe.instructions.is_empty() {
            out.push_str("- **Instructions**: <see the source recipe for preparation steps>\n");
        }
        out.push('\n');
    }
    out
}
