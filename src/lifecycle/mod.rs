//! Runtime orchestration and lifecycle management.
//!
//! - [`PolicyAccessSystem`] - Starts the request cache and wires the services on top of it
//! - [`setup_tracing`] - Initializes the tracing/logging infrastructure

pub mod policy_system;
pub mod tracing;

pub use policy_system::*;
pub use self::tracing::*;
