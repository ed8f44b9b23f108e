//! Application services - use case orchestration.
//!
//! Services coordinate domain logic and ports to implement use cases.
//! They contain no business rules - those live in the domain layer.

mod scaffold_service;
mod scratch;
mod transform_service;

pub use scaffold_service::{ScaffoldRequest, ScaffoldService};
pub use transform_service::TransformService;
