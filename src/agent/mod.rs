//! Dual-source recipe answering.
//!
//! [`RecipeAgent`] fans each query out to two independent sources and merges
//! whatever comes back:
//!
//! ```text
//!                 ┌──► CulinaryAnalyst::analyze ──────┐
//!   RecipeQuery ──┤                                    ├──► classify ──► RecipeAnswer
//!                 └──► RecipeSource::search_by_* ─────┘
//! ```
//!
//! Both calls run as their own tokio task. The join waits for the analysis
//! first, then the search, under one shared deadline. A source that fails,
//! panics, or misses the deadline is treated as unavailable; only when both
//! are unavailable does the request fail. Late tasks keep running and their
//! results are discarded.

pub mod analysis;
mod templates;

pub use analysis::CulinaryAnalyst;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, instrument, warn};

use crate::cache::Caches;
use crate::providers::{RecipeSource, format_references};
use crate::telemetry;
use crate::types::{
    QueryType, Recipe, RecipeAnswer, RecipeQuery, RecipeRequest, RecipeResponse,
    SupplementaryData,
};
use crate::{EldhrimnirError, Result};

/// Default deadline for both sources of one request.
pub const DEFAULT_JOIN_TIMEOUT: Duration = Duration::from_secs(90);

/// Answers recipe queries from a generative analyst and a recipe search.
pub struct RecipeAgent {
    analyst: Arc<CulinaryAnalyst>,
    recipes: Arc<dyn RecipeSource>,
    caches: Caches,
    join_timeout: Duration,
}

impl RecipeAgent {
    pub fn new(
        analyst: Arc<CulinaryAnalyst>,
        recipes: Arc<dyn RecipeSource>,
        caches: Caches,
    ) -> Self {
        Self {
            analyst,
            recipes,
            caches,
            join_timeout: DEFAULT_JOIN_TIMEOUT,
        }
    }

    /// Set the deadline shared by both sources of a request.
    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    /// The caches this agent's components read and write.
    pub fn caches(&self) -> &Caches {
        &self.caches
    }

    /// Validate a raw request and answer it, folding any error into a
    /// failure response.
    pub async fn handle(&self, request: RecipeRequest) -> RecipeResponse {
        let result = match request.into_query() {
            Ok(query) => self.answer(&query).await,
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            debug!(error = %e, "request failed");
        }
        RecipeResponse::from_result(result)
    }

    /// Answer one query.
    ///
    /// Fails with [`EldhrimnirError::InvalidInput`] for an empty query and
    /// with [`EldhrimnirError::NoSourcesAvailable`] when neither source
    /// produced anything.
    #[instrument(skip_all, fields(query_type = %query.query_type()))]
    pub async fn answer(&self, query: &RecipeQuery) -> Result<RecipeAnswer> {
        let query = query.clone().normalized()?;
        let deadline = Instant::now() + self.join_timeout;

        let analysis = {
            let analyst = Arc::clone(&self.analyst);
            let query = query.clone();
            tokio::spawn(async move { analyst.analyze(&query).await })
        };
        let search = {
            let recipes = Arc::clone(&self.recipes);
            let query = query.clone();
            tokio::spawn(async move {
                match &query {
                    RecipeQuery::Ingredients(items) => recipes.search_by_ingredients(items).await,
                    RecipeQuery::Dish(name) => recipes.search_by_dish(name).await,
                }
            })
        };

        let analysis_provider = self.analyst.provider_name().unwrap_or("none");
        let analysis = self
            .settle("analysis", analysis_provider, analysis, deadline)
            .await;
        let search = self
            .settle("search", self.recipes.name(), search, deadline)
            .await;

        let outcome = match (&analysis, &search) {
            (Ok(_), Ok(_)) => "both",
            (Ok(_), Err(_)) => "analysis_only",
            (Err(_), Ok(_)) => "search_only",
            (Err(_), Err(_)) => "none",
        };
        metrics::counter!(telemetry::ANSWERS_TOTAL, "outcome" => outcome).increment(1);
        info!(outcome, "sources joined");

        let (result, supplementary_data) = match (analysis, search) {
            (Err(_), Err(_)) => return Err(EldhrimnirError::NoSourcesAvailable),
            (Ok(text), Err(_)) => analysis_only(&query, text),
            (Err(_), Ok(recipes)) => search_only(&query, recipes),
            (Ok(text), Ok(recipes)) => merged(&query, text, recipes),
        };

        Ok(RecipeAnswer {
            result,
            query_type: query.query_type(),
            timestamp: Utc::now(),
            supplementary_data,
        })
    }

    /// Await one source task against the shared deadline.
    ///
    /// Upstream failures are logged at warn. A task that timed out or
    /// panicked is logged at error.
    async fn settle<T>(
        &self,
        source: &'static str,
        provider: &str,
        handle: JoinHandle<Result<T>>,
        deadline: Instant,
    ) -> Result<T> {
        let result = match tokio::time::timeout_at(deadline, handle).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(EldhrimnirError::Task(join_err.to_string())),
            Err(_) => Err(EldhrimnirError::Timeout(self.join_timeout)),
        };

        match &result {
            Ok(_) => {}
            Err(EldhrimnirError::NotConfigured(_)) => {
                debug!(source, provider, "source not configured")
            }
            Err(e) if e.is_upstream() => {
                warn!(source, provider, error = %e, "upstream provider failed")
            }
            Err(e) => error!(source, provider, error = %e, "source did not complete"),
        }
        result
    }
}

fn analysis_only(query: &RecipeQuery, text: String) -> (String, SupplementaryData) {
    let data = SupplementaryData {
        ai_available: true,
        api_available: false,
        reference_count: 0,
        api_recipes: None,
        nutrition_tips: ingredient_note(query, || {
            "Nutrition analysis is currently unavailable".to_string()
        }),
    };
    (text, data)
}

fn search_only(query: &RecipeQuery, recipes: Vec<Recipe>) -> (String, SupplementaryData) {
    let references = format_references(&recipes);
    let text = match query {
        RecipeQuery::Ingredients(items) => templates::ingredient_overview(items, &references),
        RecipeQuery::Dish(name) => templates::dish_guide(name, &references),
    };
    let count = recipes.len();
    let data = SupplementaryData {
        ai_available: false,
        api_available: true,
        reference_count: count,
        api_recipes: Some(recipes),
        nutrition_tips: ingredient_note(query, || format!("Found {count} reference recipes")),
    };
    (text, data)
}

fn merged(
    query: &RecipeQuery,
    analysis: String,
    recipes: Vec<Recipe>,
) -> (String, SupplementaryData) {
    let references = format_references(&recipes);
    let heading = match query.query_type() {
        QueryType::Ingredients => "Recipe Search References",
        QueryType::Dish => "Reference Recipe Details",
    };
    let text = templates::with_references(&analysis, heading, &references);
    let count = recipes.len();
    let data = SupplementaryData {
        ai_available: true,
        api_available: true,
        reference_count: count,
        api_recipes: Some(recipes),
        nutrition_tips: ingredient_note(query, || {
            format!("AI analysis complete with {count} reference recipes")
        }),
    };
    (text, data)
}

/// Notes are only attached to ingredient answers.
fn ingredient_note(query: &RecipeQuery, note: impl FnOnce() -> String) -> Option<String> {
    matches!(query, RecipeQuery::Ingredients(_)).then(note)
}
