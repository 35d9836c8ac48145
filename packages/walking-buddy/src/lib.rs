//! # Walking Buddy
//!
//! Client-side workflow for finding walking buddies headed to the same place:
//! acquire the device location, ask the matching service for nearby walkers
//! and keep the map markers in step with the latest answer.
//!
//! ## Layout
//!
//! - [`kernel`]: infrastructure seams (location, map, matching) and test doubles
//! - [`domains::buddies`]: marker lifecycle, state machine and the workflow itself
//! - [`config`] / [`logging`]: environment configuration and tracing setup
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use walking_buddy::{BuddyWorkflow, Config, HttpMatchService};
//!
//! let config = Config::from_env()?;
//! let matcher = Arc::new(HttpMatchService::from_config(&config)?);
//! let workflow = BuddyWorkflow::new(device_location, leaflet_map, matcher);
//!
//! workflow.acquire_location().await;
//! let status = workflow.find_walking_buddy_to("Waterloo Station").await;
//! println!("{status}");
//! ```

pub mod config;
pub mod domains;
pub mod kernel;
pub mod logging;

pub use buddy_client::{BuddyMatch, Coordinate, MatchRequest, UserId};
pub use config::Config;
pub use domains::buddies::{
    BuddyWorkflow, MarkerSet, Status, ValidationError, WorkflowError, WorkflowState,
};
pub use kernel::{
    BaseLocationProvider, BaseMapSurface, BaseMatchService, HttpMatchService, LocationFailure,
    MapError, MarkerHandle, MatchFailure, MatchResult,
};
