//! Upstream provider clients.
//!
//! - [`ChatCompletionClient`]: OpenAI-compatible chat completions (DeepSeek
//!   by default), implementing [`GenerativeProvider`].
//! - [`RecipeSearchClient`]: Spoonacular-style recipe search with caching
//!   and name resolution, implementing [`RecipeSource`].

pub mod chat;
pub mod recipes;
pub mod traits;

pub use chat::ChatCompletionClient;
pub use recipes::{RecipeSearchClient, format_references};
pub use traits::{GenerativeProvider, RecipeSource};

use std::time::{Duration, Instant};

use reqwest::{Client, Response};

use crate::telemetry;
use crate::{EldhrimnirError, Result};

/// Default timeout applied to every upstream HTTP request.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Build the shared HTTP client for a provider.
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| EldhrimnirError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Check response status and map to the appropriate error.
///
/// The body of a failed response is read into the error message.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        401 | 403 => Err(EldhrimnirError::AuthenticationFailed),
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(EldhrimnirError::RateLimited { retry_after })
        }
        code => {
            let message = response.text().await.unwrap_or_default();
            Err(EldhrimnirError::Api {
                status: code,
                message,
            })
        }
    }
}

/// Record upstream request outcome metrics (counter + histogram).
pub(crate) fn record_request(
    provider: &'static str,
    operation: &'static str,
    start: Instant,
    ok: bool,
) {
    let status = if ok { "ok" } else { "error" };
    metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL,
        "provider" => provider,
        "operation" => operation,
        "status" => status,
    )
    .increment(1);
    metrics::histogram!(telemetry::UPSTREAM_DURATION_SECONDS,
        "provider" => provider,
        "operation" => operation,
    )
    .record(start.elapsed().as_secs_f64());
}
