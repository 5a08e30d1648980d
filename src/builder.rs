//! Builder for wiring a [`RecipeAgent`].

use std::sync::Arc;
use std::time::Duration;

use crate::Result;
use crate::agent::{CulinaryAnalyst, DEFAULT_JOIN_TIMEOUT, RecipeAgent};
use crate::cache::Caches;
use crate::providers::{
    ChatCompletionClient, DEFAULT_HTTP_TIMEOUT, GenerativeProvider, RecipeSearchClient,
};
use crate::resolver::{DEFAULT_TRANSLATION_TIMEOUT, NameResolver};

/// Main entry point for creating agents.
pub struct Eldhrimnir;

impl Eldhrimnir {
    /// Create a new builder for configuring an agent.
    pub fn builder() -> EldhrimnirBuilder {
        EldhrimnirBuilder::new()
    }
}

/// Builder for configuring agents.
///
/// Every source is optional. Without a chat key the agent answers from
/// recipe search alone; without a recipe key, from generative analysis alone.
pub struct EldhrimnirBuilder {
    chat_key: Option<String>,
    chat_base_url: Option<String>,
    chat_model: Option<String>,
    recipe_key: Option<String>,
    recipe_base_url: Option<String>,
    http_timeout: Duration,
    translation_timeout: Duration,
    join_timeout: Duration,
    caches: Option<Caches>,
}

impl EldhrimnirBuilder {
    pub fn new() -> Self {
        Self {
            chat_key: None,
            chat_base_url: None,
            chat_model: None,
            recipe_key: None,
            recipe_base_url: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            translation_timeout: DEFAULT_TRANSLATION_TIMEOUT,
            join_timeout: DEFAULT_JOIN_TIMEOUT,
            caches: None,
        }
    }

    /// Configure the chat-completion provider used for analysis and
    /// name translation.
    pub fn chat(mut self, api_key: impl Into<String>) -> Self {
        self.chat_key = Some(api_key.into());
        self
    }

    /// Point the chat provider at another OpenAI-compatible endpoint.
    pub fn chat_base_url(mut self, url: impl Into<String>) -> Self {
        self.chat_base_url = Some(url.into());
        self
    }

    pub fn chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = Some(model.into());
        self
    }

    /// Configure the recipe-search provider.
    pub fn recipes(mut self, api_key: impl Into<String>) -> Self {
        self.recipe_key = Some(api_key.into());
        self
    }

    pub fn recipes_base_url(mut self, url: impl Into<String>) -> Self {
        self.recipe_base_url = Some(url.into());
        self
    }

    /// Timeout applied to every upstream HTTP request.
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Bound on a single generative name translation.
    pub fn translation_timeout(mut self, timeout: Duration) -> Self {
        self.translation_timeout = timeout;
        self
    }

    /// Deadline shared by both sources of one request.
    pub fn join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    /// Use existing caches instead of fresh ones.
    pub fn caches(mut self, caches: Caches) -> Self {
        self.caches = Some(caches);
        self
    }

    /// Build the agent.
    pub fn build(self) -> Result<RecipeAgent> {
        let caches = self.caches.unwrap_or_default();

        let chat: Option<Arc<dyn GenerativeProvider>> = match self.chat_key {
            Some(key) => {
                let mut client = match self.chat_base_url {
                    Some(url) => ChatCompletionClient::with_base_url(key, url)?,
                    None => ChatCompletionClient::new(key)?,
                };
                if let Some(model) = self.chat_model {
                    client = client.model(model);
                }
                Some(Arc::new(client.timeout(self.http_timeout)?))
            }
            None => None,
        };

        let resolver = Arc::new(
            NameResolver::new(chat.clone(), Arc::clone(&caches.translations))
                .with_timeout(self.translation_timeout),
        );

        let mut recipes =
            RecipeSearchClient::new(self.recipe_key, resolver, Arc::clone(&caches.recipes))?
                .timeout(self.http_timeout)?;
        if let Some(url) = self.recipe_base_url {
            recipes = recipes.base_url(url);
        }

        let analyst = Arc::new(CulinaryAnalyst::new(chat));
        Ok(RecipeAgent::new(analyst, Arc::new(recipes), caches)
            .with_join_timeout(self.join_timeout))
    }
}

impl Default for EldhrimnirBuilder {
    fn default() -> Self {
        Self::new()
    }
}
