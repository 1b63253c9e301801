//! Type-safe services on top of [`DataService`](crate::framework::DataService).

pub mod data_client;
pub mod resource_policy_service;

pub use data_client::*;
pub use resource_policy_service::*;
