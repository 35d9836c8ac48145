//! Kernel module - infrastructure seams and their implementations.

pub mod match_service;
pub mod test_dependencies;
pub mod traits;

pub use match_service::HttpMatchService;
pub use test_dependencies::{MockLocationProvider, MockMapSurface, MockMatchService};
pub use traits::*;
