// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no workflow logic.
// The device, the map widget and the matching backend all sit behind these seams.
//
// Naming convention: Base* for trait names (e.g., BaseLocationProvider, BaseMapSurface)

use async_trait::async_trait;
use buddy_client::{BuddyMatch, Coordinate, MatchRequest};
use thiserror::Error;

// =============================================================================
// Location Provider Trait (Infrastructure - device positioning)
// =============================================================================

/// Why the device could not produce a position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocationFailure {
    /// The device has no positioning capability at all
    #[error("geolocation is not supported")]
    Unsupported,

    /// Permission denied, no fix, or timed out
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait BaseLocationProvider: Send + Sync {
    /// Single attempt, no retry.
    async fn acquire_coordinate(&self) -> Result<Coordinate, LocationFailure>;
}

// =============================================================================
// Map Surface Trait (Infrastructure - rendering)
// =============================================================================

/// Opaque reference to a marker drawn on a map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map rejected marker: {0}")]
    PlacementRejected(String),
}

pub trait BaseMapSurface: Send {
    /// Draw a labeled marker and return its handle.
    fn place_marker(&mut self, coord: Coordinate, label: &str) -> Result<MarkerHandle, MapError>;

    /// Remove a marker previously returned by `place_marker`. Unknown handles are ignored.
    fn remove_marker(&mut self, handle: MarkerHandle);

    /// Move the visible area to `coord` at `zoom`.
    fn recenter(&mut self, coord: Coordinate, zoom: u8);
}

// =============================================================================
// Match Service Trait (Infrastructure - remote matching)
// =============================================================================

/// Typed failure of one matching call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchFailure {
    /// No response (network error, refused, timed out)
    #[error("connection error: {0}")]
    Connection(String),

    /// Non-2xx with the service's message
    #[error("{0}")]
    Server(String),

    /// 2xx but the body could not be trusted
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Outcome of one completed search: the ordered matches, or why there are none.
pub type MatchResult = Result<Vec<BuddyMatch>, MatchFailure>;

#[async_trait]
pub trait BaseMatchService: Send + Sync {
    /// Exactly one exchange with the matching service per call.
    async fn find_buddies(&self, request: &MatchRequest) -> MatchResult;
}
