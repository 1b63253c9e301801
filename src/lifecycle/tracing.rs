//! # Observability & Tracing
//!
//! This module provides the tracing infrastructure for the whole access layer.
//!
//! ## Overview
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//! Services open a span per call (`#[instrument]`), the request cache logs every
//! fetch, cache hit, invalidation and completed transport call with structured fields.
//!
//! ## Configuration
//!
//! - **Structured logging** with `tracing` crate
//! - **Configurable log levels** via `RUST_LOG` environment variable
//! - **Compact format** with module paths hidden (`with_target(false)`)
//!
//! ## Usage Examples
//!
//! ```bash
//! # Completed requests and invalidations only
//! RUST_LOG=info cargo run -- config/policy-access.json
//!
//! # Every forwarded search with its options, plus cache hits
//! RUST_LOG=debug cargo run -- config/policy-access.json
//!
//! # Only the request cache
//! RUST_LOG=policy_access::framework=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=debug`**, a resource search followed by the same search again:
//!
//! ```text
//! DEBUG search_by_resource: Sending request options=FindListOptions { .., search_params: [SearchParam { field_name: "uuid", .. }, SearchParam { field_name: "action", .. }] } resource_id="res-1" action=Some(Read)
//! DEBUG search_by_resource:search_by: Sending request href=http://localhost:8080/server/api/authz/resourcepolicies/search/resource?uuid=res-1&action=READ
//! DEBUG Fetch href=... size=1
//! INFO Request ok method="GET" href=... status=Some(200)
//! DEBUG Cache hit href=...
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
