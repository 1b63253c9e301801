//! Pure data structures (DTOs); REST resources implement [`RestResource`](crate::framework::RestResource).

pub mod dynamic_row_array;
pub mod resource_policy;

pub use dynamic_row_array::*;
pub use resource_policy::*;
