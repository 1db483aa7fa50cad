//! # Middleware
//!
//! Tower/Axum middleware shared across the API surface.

pub mod metrics;
