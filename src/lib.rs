//! Eldhrimnir - dual-source recipe answering engine
//!
//! Answers "what can I cook with these ingredients?" and "how do I cook this
//! dish?" by querying a generative chat model and a structured recipe-search
//! API concurrently, then merging the results. When one source is missing or
//! failing the answer degrades instead of erroring; the request only fails
//! when neither source produced anything.
//!
//! # Example
//!
//! ```rust,no_run
//! use eldhrimnir::{Eldhrimnir, RecipeRequest};
//!
//! #[tokio::main]
//! async fn main() -> eldhrimnir::Result<()> {
//!     let agent = Eldhrimnir::builder()
//!         .chat("sk-your-deepseek-key")
//!         .recipes("your-spoonacular-key")
//!         .build()?;
//!
//!     let response = agent.handle(RecipeRequest::ingredients(["鸡蛋", "西红柿"])).await;
//!     println!("{}", response.result);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod builder;
pub mod cache;
pub mod error;
pub mod providers;
pub mod resolver;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod types;
pub mod version;

// Re-export main types at crate root
pub use agent::{CulinaryAnalyst, RecipeAgent};
pub use builder::{Eldhrimnir, EldhrimnirBuilder};
pub use cache::{CacheStatus, Caches, CachesStatus, TtlCache};
pub use error::{EldhrimnirError, Result};
pub use providers::{GenerativeProvider, RecipeSource};
pub use resolver::{NameResolver, Resolution, ResolutionStage, TermKind};
pub use types::{
    QueryType, Recipe, RecipeAnswer, RecipeIngredient, RecipeQuery, RecipeRequest, RecipeResponse,
    SupplementaryData,
};
pub use version::{BuildInfo, PKG_VERSION, version_string};
