//! Failures of the two user-triggered actions.
//!
//! Each variant's `Display` is the exact text shown to the user.

use thiserror::Error;

use crate::kernel::{LocationFailure, MapError, MatchFailure};

/// A search that was refused before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please click 'Use My Location' first.")]
    MissingLocation,

    #[error("Enter a destination address.")]
    EmptyDestination,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("Geolocation not supported on this device.")]
    LocationUnsupported,

    #[error("Could not get location.")]
    LocationUnavailable(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Error connecting to Walking Buddy service.")]
    Connection(String),

    /// Shown verbatim
    #[error("{0}")]
    Server(String),

    #[error("Walking Buddy service returned an unexpected response.")]
    MalformedResponse(String),
}

impl From<LocationFailure> for WorkflowError {
    fn from(failure: LocationFailure) -> Self {
        match failure {
            LocationFailure::Unsupported => Self::LocationUnsupported,
            LocationFailure::Unavailable(reason) => Self::LocationUnavailable(reason),
        }
    }
}

impl From<MatchFailure> for WorkflowError {
    fn from(failure: MatchFailure) -> Self {
        match failure {
            MatchFailure::Connection(reason) => Self::Connection(reason),
            MatchFailure::Server(message) => Self::Server(message),
            MatchFailure::MalformedResponse(reason) => Self::MalformedResponse(reason),
        }
    }
}

impl From<MapError> for WorkflowError {
    fn from(err: MapError) -> Self {
        Self::MalformedResponse(err.to_string())
    }
}
