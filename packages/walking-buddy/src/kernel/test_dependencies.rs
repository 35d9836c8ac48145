// TestDependencies - mock implementations for testing
//
// Provides mock services that can be injected into BuddyWorkflow for tests.

use async_trait::async_trait;
use buddy_client::{BuddyMatch, Coordinate, MatchRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use super::{
    BaseLocationProvider, BaseMapSurface, BaseMatchService, LocationFailure, MapError,
    MarkerHandle, MatchFailure, MatchResult,
};

// =============================================================================
// Mock Location Provider
// =============================================================================

type LocationOutcome = Result<Coordinate, LocationFailure>;

struct QueuedLocation {
    outcome: LocationOutcome,
    gate: Option<oneshot::Receiver<()>>,
}

pub struct MockLocationProvider {
    outcomes: Mutex<VecDeque<QueuedLocation>>,
    calls: Mutex<usize>,
}

impl MockLocationProvider {
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            calls: Mutex::new(0),
        }
    }

    /// Queue a successful fix
    pub fn with_coordinate(self, coord: Coordinate) -> Self {
        self.push(Ok(coord));
        self
    }

    /// Queue a failure
    pub fn with_failure(self, failure: LocationFailure) -> Self {
        self.push(Err(failure));
        self
    }

    pub fn push(&self, outcome: LocationOutcome) {
        self.outcomes.lock().unwrap().push_back(QueuedLocation {
            outcome,
            gate: None,
        });
    }

    /// Queue an outcome that is held back until the returned sender fires
    pub fn push_gated(&self, outcome: LocationOutcome) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.outcomes.lock().unwrap().push_back(QueuedLocation {
            outcome,
            gate: Some(rx),
        });
        tx
    }

    /// Number of acquisition attempts so far
    pub fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

impl Default for MockLocationProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseLocationProvider for MockLocationProvider {
    async fn acquire_coordinate(&self) -> LocationOutcome {
        *self.calls.lock().unwrap() += 1;
        let queued = self.outcomes.lock().unwrap().pop_front();

        let Some(QueuedLocation { outcome, gate }) = queued else {
            return Err(LocationFailure::Unavailable("no queued location".into()));
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        outcome
    }
}

// =============================================================================
// Mock Map Surface
// =============================================================================

/// A marker currently drawn on the mock map.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedMarker {
    pub handle: MarkerHandle,
    pub coord: Coordinate,
    pub label: String,
}

#[derive(Default)]
struct MapRecord {
    next_id: u64,
    live: Vec<PlacedMarker>,
    removed: Vec<MarkerHandle>,
    recenters: Vec<(Coordinate, u8)>,
    placements_before_failure: Option<usize>,
}

/// Cloneable handle onto one shared in-memory map.
///
/// The workflow owns one clone; the test keeps another to inspect what was drawn.
#[derive(Clone, Default)]
pub struct MockMapSurface {
    record: Arc<Mutex<MapRecord>>,
}

impl MockMapSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allow `count` more placements, then reject every placement after that
    pub fn fail_placements_after(&self, count: usize) {
        self.record.lock().unwrap().placements_before_failure = Some(count);
    }

    /// Accept placements again
    pub fn stop_failing(&self) {
        self.record.lock().unwrap().placements_before_failure = None;
    }

    /// Markers currently drawn, in placement order
    pub fn live_markers(&self) -> Vec<PlacedMarker> {
        self.record.lock().unwrap().live.clone()
    }

    pub fn live_labels(&self) -> Vec<String> {
        self.live_markers().into_iter().map(|m| m.label).collect()
    }

    pub fn marker_count(&self) -> usize {
        self.record.lock().unwrap().live.len()
    }

    /// Number of live markers whose label matches `label` exactly
    pub fn count_labeled(&self, label: &str) -> usize {
        self.record
            .lock()
            .unwrap()
            .live
            .iter()
            .filter(|m| m.label == label)
            .count()
    }

    pub fn removed(&self) -> Vec<MarkerHandle> {
        self.record.lock().unwrap().removed.clone()
    }

    pub fn recenters(&self) -> Vec<(Coordinate, u8)> {
        self.record.lock().unwrap().recenters.clone()
    }
}

impl BaseMapSurface for MockMapSurface {
    fn place_marker(&mut self, coord: Coordinate, label: &str) -> Result<MarkerHandle, MapError> {
        let mut record = self.record.lock().unwrap();

        if let Some(remaining) = record.placements_before_failure.as_mut() {
            if *remaining == 0 {
                return Err(MapError::PlacementRejected(label.to_string()));
            }
            *remaining -= 1;
        }

        record.next_id += 1;
        let handle = MarkerHandle::new(record.next_id);
        record.live.push(PlacedMarker {
            handle,
            coord,
            label: label.to_string(),
        });
        Ok(handle)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        let mut record = self.record.lock().unwrap();
        let before = record.live.len();
        record.live.retain(|m| m.handle != handle);
        if record.live.len() != before {
            record.removed.push(handle);
        }
    }

    fn recenter(&mut self, coord: Coordinate, zoom: u8) {
        self.record.lock().unwrap().recenters.push((coord, zoom));
    }
}

// =============================================================================
// Mock Match Service
// =============================================================================

struct QueuedResult {
    result: MatchResult,
    gate: Option<oneshot::Receiver<()>>,
}

/// Replays queued results in call order.
///
/// A gated result is held back until its sender fires (or is dropped), which lets a
/// test decide the order in which concurrent searches resolve.
pub struct MockMatchService {
    queued: Mutex<VecDeque<QueuedResult>>,
    requests: Mutex<Vec<MatchRequest>>,
}

impl MockMatchService {
    pub fn new() -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue an immediately available result
    pub fn with_result(self, result: MatchResult) -> Self {
        self.push(result);
        self
    }

    pub fn push(&self, result: MatchResult) {
        self.queued
            .lock()
            .unwrap()
            .push_back(QueuedResult { result, gate: None });
    }

    /// Queue a result that is only released once the returned sender fires
    pub fn push_gated(&self, result: MatchResult) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.queued.lock().unwrap().push_back(QueuedResult {
            result,
            gate: Some(rx),
        });
        tx
    }

    /// Get all requests that were sent
    pub fn requests(&self) -> Vec<MatchRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Default for MockMatchService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMatchService for MockMatchService {
    async fn find_buddies(&self, request: &MatchRequest) -> MatchResult {
        // Record the call
        self.requests.lock().unwrap().push(request.clone());

        let queued = self.queued.lock().unwrap().pop_front();
        let Some(QueuedResult { result, gate }) = queued else {
            return Err(MatchFailure::Connection("no queued result".into()));
        };

        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Build a match entry; panics on an invalid coordinate.
pub fn buddy(user_id: &str, lat: f64, lon: f64, distance_km: f64) -> BuddyMatch {
    BuddyMatch {
        user_id: user_id.to_string(),
        start_coord: Coordinate::new(lat, lon).unwrap(),
        distance_km,
    }
}
