//! HTTP client module for the billing probe
//!
//! Provides the outbound HTTP session shared across a probe run.

mod client;

pub use client::{HttpClient, HttpResponse};
