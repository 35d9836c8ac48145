//! Lifecycle of the markers the workflow draws on the map.
//!
//! A `MarkerSet` owns its map surface. It holds at most one self marker and one
//! buddy marker per entry of the most recently applied match list, and never a
//! mix of two lists: old markers are always removed before new ones are placed.

use buddy_client::{BuddyMatch, Coordinate};
use tracing::{debug, warn};

use crate::kernel::{BaseMapSurface, MapError, MarkerHandle};

pub const SELF_MARKER_LABEL: &str = "You are here 📍";

/// Zoom level used when centering on the user's own position.
pub const SELF_ZOOM: u8 = 15;

/// Popup text for a buddy marker.
pub fn buddy_label(buddy: &BuddyMatch) -> String {
    format!(
        "{} · Distance: {} km away",
        buddy.user_id, buddy.distance_km
    )
}

pub struct MarkerSet<M> {
    surface: M,
    self_marker: Option<MarkerHandle>,
    buddy_markers: Vec<MarkerHandle>,
}

impl<M: BaseMapSurface> MarkerSet<M> {
    pub fn new(surface: M) -> Self {
        Self {
            surface,
            self_marker: None,
            buddy_markers: Vec::new(),
        }
    }

    pub fn recenter(&mut self, coord: Coordinate, zoom: u8) {
        self.surface.recenter(coord, zoom);
    }

    /// Replace the self marker with one at `coord` and center the map on it.
    ///
    /// The previous marker is removed first, so a placement failure leaves no
    /// self marker rather than a stale one.
    pub fn set_self_marker(&mut self, coord: Coordinate) -> Result<MarkerHandle, MapError> {
        if let Some(old) = self.self_marker.take() {
            self.surface.remove_marker(old);
        }

        let handle = self.surface.place_marker(coord, SELF_MARKER_LABEL)?;
        self.self_marker = Some(handle);
        self.surface.recenter(coord, SELF_ZOOM);
        debug!(marker = handle.id(), %coord, "Self marker placed");
        Ok(handle)
    }

    /// Remove every buddy marker, then draw one per entry of `matches` in order.
    ///
    /// All or nothing: if the surface rejects any placement, the markers placed by
    /// this call are removed again and the set is left empty.
    pub fn replace_buddy_markers(&mut self, matches: &[BuddyMatch]) -> Result<(), MapError> {
        self.clear_buddy_markers();

        let mut placed = Vec::with_capacity(matches.len());
        for buddy in matches {
            match self.surface.place_marker(buddy.start_coord, &buddy_label(buddy)) {
                Ok(handle) => placed.push(handle),
                Err(e) => {
                    warn!(
                        user_id = %buddy.user_id,
                        error = %e,
                        rolled_back = placed.len(),
                        "Buddy marker rejected, rolling back"
                    );
                    for handle in placed {
                        self.surface.remove_marker(handle);
                    }
                    return Err(e);
                }
            }
        }

        debug!(count = placed.len(), "Buddy markers placed");
        self.buddy_markers = placed;
        Ok(())
    }

    pub fn clear_buddy_markers(&mut self) {
        for handle in self.buddy_markers.drain(..) {
            self.surface.remove_marker(handle);
        }
    }

    pub fn has_self_marker(&self) -> bool {
        self.self_marker.is_some()
    }

    pub fn self_marker(&self) -> Option<MarkerHandle> {
        self.self_marker
    }

    pub fn buddy_count(&self) -> usize {
        self.buddy_markers.len()
    }

    pub fn buddy_handles(&self) -> &[MarkerHandle] {
        &self.buddy_markers
    }
}
