//! Generic data-access framework for HAL REST resources.
//!
//! This module provides the building blocks typed services are made of: the
//! remote data envelope, query options, endpoint resolution, the request cache
//! and the transport seam.
//!
//! # Main Components
//!
//! - [`RemoteData`] / [`RemoteDataHandle`] - The envelope every fetch answers with
//! - [`DataService`] - Trait typed services delegate to
//! - [`RestDataService`] - Its implementation over [`RequestActor`] and a [`RestTransport`]
//! - [`FrameworkError`] - Common error types
//!
//! # Testing
//!
//! See [`mock`] module for a recording [`DataService`] fake and an in-memory transport.

pub mod core;
pub mod data_service;
pub mod endpoint;
pub mod error;
pub mod mock;
pub mod options;
pub mod remote_data;
pub mod transport;

// Re-export core types for convenience
pub use self::core::*;
pub use data_service::{DataService, RestDataService};
pub use endpoint::HalEndpoint;
pub use error::FrameworkError;
pub use options::{FindListOptions, PageInfo, PaginatedList, SearchParam, SortDirection, SortOptions};
pub use remote_data::{RemoteData, RemoteDataHandle, RequestState};
pub use transport::{HttpTransport, RestMethod, RestRequest, RestResponse, RestTransport};
