//! HTTP service mode.
//!
//! This module provides:
//! - The axum router exposing [`RecipeAgent`](crate::RecipeAgent) (`http`)
//! - Configuration and secrets loading for the `eldd` daemon (`config`)

pub mod config;
pub mod http;

pub use http::{AppState, HealthResponse, router};
