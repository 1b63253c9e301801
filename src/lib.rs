#![doc(html_logo_url = "https://www.rust-lang.org/logos/rust-logo-128x128.png")]
#![doc(html_favicon_url = "https://www.rust-lang.org/favicon.ico")]
//! # Policy Access
//!
//! > **Typed, cached access to resource policies over a HAL REST API.**
//!
//! A resource policy binds a person or group to an action (`READ`, `WRITE`, ...)
//! on a protected resource, optionally within a validity window. This crate
//! fetches and searches them without ever blocking the caller: every operation
//! answers with a [`RemoteDataHandle`](framework::RemoteDataHandle), an observable
//! envelope that moves from pending to success or error.
//!
//! ## 🏗️ Design Philosophy
//!
//! ### Thin typed services, one generic data layer
//!
//! - **Typed services** ([`ResourcePolicyService`](clients::ResourcePolicyService)) only translate
//!   typed inputs into [`FindListOptions`](framework::FindListOptions) and forward them.
//! - **The data layer** ([`DataService`](framework::DataService)) owns everything else:
//!   href resolution, caching, de-duplication, decoding, error reporting.
//!
//! Caching policy is therefore written once and applies to every resource type.
//!
//! ### Errors are data
//! A failed request is an envelope in the `Error` state carrying status code and
//! message. Nothing in the request path returns `Err` or panics at the caller.
//!
//! ## 👩‍💻 Architecture Notes
//!
//! ### 1. One request cache, one task
//! The [`RequestActor`](framework::RequestActor) owns the cache and processes its
//! messages sequentially, so the cache needs no lock. Identical hrefs share one
//! in-flight request; failed entries are retried on the next request.
//!
//! ### 2. Envelopes are watch channels
//! Many observers can follow one request. Typed handles are derived from raw
//! JSON handles by a forwarding task that stops when nobody observes anymore.
//!
//! ### 3. Observability
//! We use `tracing` everywhere with structured fields.
//! See the [`lifecycle::tracing`] module for details.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! - **Role**: Envelope, options, endpoint resolution, request cache, transport.
//! - **Key items**: [`DataService`](framework::DataService), [`RequestActor`](framework::RequestActor),
//!   [`RemoteData`](framework::RemoteData).
//!
//! ### 2. The Orchestrator ([`lifecycle`])
//! - **Role**: Wires config, transport, cache and services; shuts them down.
//! - **Key items**: [`PolicyAccessSystem`](lifecycle::PolicyAccessSystem).
//!
//! ### 3. The Interface ([`clients`])
//! - **Role**: Typed services on top of the data layer.
//! - **Key items**: [`ResourcePolicyService`](clients::ResourcePolicyService), [`DataClient`](clients::DataClient).
//!
//! ### 4. The Data ([`model`])
//! - **Role**: Resource and form models, serde-mapped to their REST shape.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Search the policies of a resource
//! RUST_LOG=info cargo run -- config/policy-access.json <resource-uuid> [ACTION]
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
