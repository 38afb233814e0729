//! HTTP module
//!
//! The request executor: turns one [`RequestDescriptor`] into a JSON payload
//! or a typed error.
//!
//! # Features
//!
//! - **Typed failures**: 400/403/404/429/500/504 and client-side timeouts
//! - **Retry**: fixed-delay, bounded retries for rate limiting (429) only
//! - **Rate Limiting**: optional token bucket throttle using governor
//! - **Tracing**: request traces with an equivalent `curl` command

mod client;
mod rate_limit;
mod request;

pub use client::{ApiRequester, RequestExecutor};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
pub use request::{QueryParams, RequestDescriptor};
