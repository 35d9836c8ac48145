pub mod errors;
pub mod machine;
pub mod markers;
pub mod models;
pub mod workflow;

// Re-export commonly used types
pub use errors::{ValidationError, WorkflowError};
pub use machine::{LocationTicket, SearchTicket, WorkflowMachine, WorkflowState};
pub use markers::{buddy_label, MarkerSet, SELF_MARKER_LABEL, SELF_ZOOM};
pub use models::{Status, UserSession};
pub use workflow::{BuddyWorkflow, DEFAULT_ZOOM};
