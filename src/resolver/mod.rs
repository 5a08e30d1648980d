//! Name resolution for recipe search.
//!
//! Recipe search expects English terms; users type Chinese. [`NameResolver`]
//! maps one to the other through a cascade, stopping at the first stage that
//! yields a term:
//!
//! ```text
//!   text ──► identity ──► static table ──► cache ──► generative ──► keywords
//!            (no CJK)     (exact match)    (24h)     (10s bound)    (substring)
//! ```
//!
//! A term produced by the generative stage is written back to the cache.
//! When every stage comes up empty the input is untranslatable and the
//! resolver returns `None`; callers skip that item rather than failing.

mod vocabulary;

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::providers::GenerativeProvider;
use crate::telemetry;
use crate::{EldhrimnirError, Result};

/// Default bound on a single generative translation call.
pub const DEFAULT_TRANSLATION_TIMEOUT: Duration = Duration::from_secs(10);

/// How long a generative translation stays cached.
pub const TRANSLATION_TTL: Duration = Duration::from_secs(24 * 3600);

/// What kind of name is being resolved. Selects the prompt and cache prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Ingredient,
    Dish,
}

impl TermKind {
    fn cache_prefix(&self) -> &'static str {
        match self {
            TermKind::Ingredient => "ingredient:",
            TermKind::Dish => "dish:",
        }
    }

    fn prompt(&self, text: &str) -> String {
        match self {
            TermKind::Ingredient => format!(
                "Translate the following Chinese ingredient name into English. \
                 Reply with a single English word or phrase and no explanation:\n{text}"
            ),
            TermKind::Dish => format!(
                "Translate the following Chinese dish name into the English dish name \
                 best suited for a recipe search. Reply with the name only:\n{text}"
            ),
        }
    }
}

/// Cascade stage that produced a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStage {
    Identity,
    Static,
    Cache,
    Generative,
    Keyword,
}

impl ResolutionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionStage::Identity => "identity",
            ResolutionStage::Static => "static",
            ResolutionStage::Cache => "cache",
            ResolutionStage::Generative => "generative",
            ResolutionStage::Keyword => "keyword",
        }
    }
}

/// A resolved search term and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub term: String,
    pub stage: ResolutionStage,
}

/// Cascading source-language → search-term resolver.
pub struct NameResolver {
    translator: Option<Arc<dyn GenerativeProvider>>,
    cache: Arc<TtlCache<String>>,
    timeout: Duration,
}

impl NameResolver {
    /// Create a resolver. Without a translator the generative stage is
    /// skipped and resolution falls through to keywords.
    pub fn new(
        translator: Option<Arc<dyn GenerativeProvider>>,
        cache: Arc<TtlCache<String>>,
    ) -> Self {
        Self {
            translator,
            cache,
            timeout: DEFAULT_TRANSLATION_TIMEOUT,
        }
    }

    /// Set the bound on a single generative translation call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run the cascade for one name. `None` means untranslatable.
    pub async fn resolve(&self, text: &str, kind: TermKind) -> Option<Resolution> {
        let resolution = self.cascade(text, kind).await;
        let stage = resolution.as_ref().map_or("unresolved", |r| r.stage.as_str());
        metrics::counter!(telemetry::RESOLUTIONS_TOTAL, "stage" => stage).increment(1);
        debug!(
            text,
            term = ?resolution.as_ref().map(|r| r.term.as_str()),
            stage,
            "resolved name"
        );
        resolution
    }

    /// Resolve an ingredient name to its search term.
    pub async fn resolve_ingredient(&self, ingredient: &str) -> Option<String> {
        self.resolve(ingredient, TermKind::Ingredient)
            .await
            .map(|r| r.term)
    }

    /// Resolve a dish name to its search term.
    pub async fn resolve_dish(&self, dish_name: &str) -> Option<String> {
        self.resolve(dish_name, TermKind::Dish).await.map(|r| r.term)
    }

    /// Resolve all ingredients concurrently, dropping untranslatable ones.
    ///
    /// Terms keep input order. Total latency is bounded by one translation
    /// timeout rather than one per item.
    pub async fn resolve_ingredients(&self, ingredients: &[String]) -> Vec<String> {
        join_all(ingredients.iter().map(|i| self.resolve_ingredient(i)))
            .await
            .into_iter()
            .flatten()
            .collect()
    }

    async fn cascade(&self, text: &str, kind: TermKind) -> Option<Resolution> {
        if !vocabulary::contains_cjk(text) {
            return Some(resolution(text, ResolutionStage::Identity));
        }

        if let Some(term) = vocabulary::common_term(text) {
            return Some(resolution(term, ResolutionStage::Static));
        }

        let cache_key = format!("{}{text}", kind.cache_prefix());
        if let Some(term) = self.cache.get(&cache_key) {
            return Some(resolution(term, ResolutionStage::Cache));
        }

        match self.translate(text, kind).await {
            Ok(term) => {
                self.cache.put(cache_key, term.clone(), TRANSLATION_TTL);
                return Some(resolution(term, ResolutionStage::Generative));
            }
            Err(EldhrimnirError::NotConfigured(_)) => {}
            Err(e) => warn!(text, error = %e, "generative translation failed, using keywords"),
        }

        vocabulary::keyword_term(text).map(|term| resolution(term, ResolutionStage::Keyword))
    }

    async fn translate(&self, text: &str, kind: TermKind) -> Result<String> {
        let translator = self
            .translator
            .as_ref()
            .ok_or(EldhrimnirError::NotConfigured("translation"))?;

        let raw = tokio::time::timeout(self.timeout, translator.complete(&kind.prompt(text)))
            .await
            .map_err(|_| EldhrimnirError::Timeout(self.timeout))??;

        let term = normalize_term(&raw);
        if term.is_empty() {
            return Err(EldhrimnirError::EmptyResponse);
        }
        Ok(term)
    }
}

fn resolution(term: impl Into<String>, stage: ResolutionStage) -> Resolution {
    Resolution {
        term: term.into(),
        stage,
    }
}

/// Trim whitespace, strip surrounding quotes, lowercase.
fn normalize_term(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .to_lowercase()
}
