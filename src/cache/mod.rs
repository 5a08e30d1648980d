//! Caching subsystem.
//!
//! Two independent [`TtlCache`] instances, bundled in [`Caches`]:
//!
//! - `recipes`: raw recipe-search response bodies, keyed on the original
//!   (untranslated) query. Used by
//!   [`RecipeSearchClient`](crate::providers::RecipeSearchClient).
//!
//! - `translations`: generative name translations, keyed on
//!   `"ingredient:"`/`"dish:"` plus the source text. Used by
//!   [`NameResolver`](crate::resolver::NameResolver).
//!
//! Both are memory-resident for the life of the process. They are built by
//! the process root (usually [`EldhrimnirBuilder`](crate::EldhrimnirBuilder))
//! and handed to each component, so tests get fresh instances.

pub mod ttl;

pub use ttl::{CacheStatus, TtlCache};

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;

/// Shared cache handles for one process (or one test).
#[derive(Clone)]
pub struct Caches {
    pub recipes: Arc<TtlCache<String>>,
    pub translations: Arc<TtlCache<String>>,
}

/// Status of every cache in a [`Caches`] bundle.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CachesStatus {
    pub recipes: CacheStatus,
    pub translations: CacheStatus,
}

impl Caches {
    /// Create empty caches.
    pub fn new() -> Self {
        Self {
            recipes: Arc::new(TtlCache::new("recipes")),
            translations: Arc::new(TtlCache::new("translations")),
        }
    }

    /// Sweep both caches, returning the total number of entries removed.
    pub fn sweep(&self) -> usize {
        self.recipes.sweep() + self.translations.sweep()
    }

    /// Entry counts for both caches.
    pub fn status(&self) -> CachesStatus {
        CachesStatus {
            recipes: self.recipes.status(),
            translations: self.translations.status(),
        }
    }

    /// Start a periodic sweeper for each cache.
    pub fn spawn_sweepers(&self, period: Duration) -> Vec<JoinHandle<()>> {
        vec![
            self.recipes.spawn_sweeper(period),
            self.translations.spawn_sweeper(period),
        ]
    }
}

impl Default for Caches {
    fn default() -> Self {
        Self::new()
    }
}
