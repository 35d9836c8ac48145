//! The walking buddy workflow.
//!
//! Ties the location provider, the matching service and the marker set together
//! behind two user actions: acquire location and find buddies.
//!
//! # Concurrency
//!
//! Both actions take `&self`. Internal state sits behind a mutex that is never
//! held across an `.await`, so a second search can start while the first is
//! still waiting on the network. The policy is supersede-with-latest: starting a
//! search makes every earlier one stale, and a stale resolution is dropped
//! without touching markers, status or state. Location requests follow the
//! same rule with their own sequence.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use buddy_client::{BuddyMatch, Coordinate, MatchRequest, UserId};
use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::errors::{ValidationError, WorkflowError};
use super::machine::{SearchTicket, WorkflowMachine, WorkflowState};
use super::markers::MarkerSet;
use super::models::{Status, UserSession};
use crate::kernel::{BaseLocationProvider, BaseMapSurface, BaseMatchService, MatchResult};

/// Zoom level of the initial campus overview.
pub const DEFAULT_ZOOM: u8 = 14;

struct WorkflowInner<M> {
    session: UserSession,
    markers: MarkerSet<M>,
    machine: WorkflowMachine,
}

pub struct BuddyWorkflow<M> {
    location: Arc<dyn BaseLocationProvider>,
    matcher: Arc<dyn BaseMatchService>,
    inner: Mutex<WorkflowInner<M>>,
    status: watch::Sender<Status>,
}

impl<M: BaseMapSurface> BuddyWorkflow<M> {
    /// Build a workflow drawing into `map`. The map starts on the campus overview.
    pub fn new(
        location: Arc<dyn BaseLocationProvider>,
        map: M,
        matcher: Arc<dyn BaseMatchService>,
    ) -> Self {
        let mut markers = MarkerSet::new(map);
        markers.recenter(Coordinate::LAURIER_CAMPUS, DEFAULT_ZOOM);

        let (status, _) = watch::channel(Status::Ready);
        Self {
            location,
            matcher,
            inner: Mutex::new(WorkflowInner {
                session: UserSession::new(),
                markers,
                machine: WorkflowMachine::new(),
            }),
            status,
        }
    }

    fn lock(&self) -> MutexGuard<'_, WorkflowInner<M>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, status: Status) -> Status {
        self.status.send_replace(status.clone());
        status
    }

    pub fn status(&self) -> Status {
        self.status.borrow().clone()
    }

    /// Receive every status change from now on.
    pub fn subscribe_status(&self) -> watch::Receiver<Status> {
        self.status.subscribe()
    }

    pub fn state(&self) -> WorkflowState {
        self.lock().machine.state()
    }

    pub fn self_location(&self) -> Option<Coordinate> {
        self.lock().session.self_location()
    }

    pub fn destination(&self) -> String {
        self.lock().session.destination().to_string()
    }

    pub fn set_destination(&self, destination: impl Into<String>) {
        self.lock().session.set_destination(destination);
    }

    /// Read-only view of the markers currently drawn.
    pub fn with_markers<R>(&self, f: impl FnOnce(&MarkerSet<M>) -> R) -> R {
        f(&self.lock().markers)
    }

    /// Ask the device for its position and mark it on the map.
    ///
    /// On failure the previous location, if any, is kept. If a newer request
    /// starts before this one resolves, this one's outcome is discarded and the
    /// status current at that point is returned.
    pub async fn acquire_location(&self) -> Status {
        let ticket = self.lock().machine.on_location_requested();
        debug!(ticket = ticket.sequence(), "Acquiring device location");

        let outcome = self.location.acquire_coordinate().await;

        let mut inner = self.lock();
        if !inner.machine.on_location_resolved(ticket, outcome.is_ok()) {
            warn!(
                ticket = ticket.sequence(),
                "Dropping result of superseded location request"
            );
            return self.status();
        }

        let coord = match outcome {
            Ok(coord) => coord,
            Err(failure) => {
                warn!(error = %failure, "Location acquisition failed");
                return self.publish(Status::Failed(failure.into()));
            }
        };

        inner.session.set_self_location(coord);
        if let Err(e) = inner.markers.set_self_marker(coord) {
            warn!(%coord, error = %e, "Map rejected self marker");
        }
        info!(%coord, "Location acquired");

        self.publish(Status::Located(coord))
    }

    /// Set the destination, then search.
    pub async fn find_walking_buddy_to(&self, destination: impl Into<String>) -> Status {
        self.set_destination(destination);
        self.find_walking_buddy().await
    }

    /// Search for walkers near the self location headed to the destination.
    ///
    /// Refused without a network call when there is no location yet or the
    /// destination is blank. If a newer search starts before this one resolves,
    /// this one's outcome is discarded and the status current at that point is
    /// returned.
    pub async fn find_walking_buddy(&self) -> Status {
        let (ticket, request) = match self.begin_search() {
            Ok(started) => started,
            Err(err) => {
                warn!(error = %err, "Search refused");
                return self.publish(Status::Failed(err.into()));
            }
        };

        info!(
            ticket = ticket.sequence(),
            user_id = %request.user_id(),
            destination = %request.destination_address(),
            "Searching for walking buddies"
        );
        let result = self.matcher.find_buddies(&request).await;

        self.finish_search(ticket, result)
    }

    /// Validate, issue a ticket and clear stale markers, all under one lock.
    fn begin_search(&self) -> Result<(SearchTicket, MatchRequest), ValidationError> {
        let mut inner = self.lock();

        let coord = inner
            .session
            .self_location()
            .ok_or(ValidationError::MissingLocation)?;
        let destination = inner
            .session
            .search_destination()
            .ok_or(ValidationError::EmptyDestination)?
            .to_string();

        let ticket = inner.machine.on_search_started();
        inner.markers.clear_buddy_markers();
        self.publish(Status::Searching);

        let request = MatchRequest::new(UserId::generate(), coord, &destination, Utc::now());
        Ok((ticket, request))
    }

    fn finish_search(&self, ticket: SearchTicket, result: MatchResult) -> Status {
        let mut inner = self.lock();

        if !inner.machine.on_search_resolved(ticket) {
            warn!(
                ticket = ticket.sequence(),
                "Dropping result of superseded search"
            );
            return self.status();
        }

        let status = match result {
            Ok(matches) if matches.is_empty() => {
                info!("No walking buddies found");
                Status::NoBuddies
            }
            Ok(matches) => apply_matches(&mut inner.markers, &matches),
            Err(failure) => {
                warn!(error = %failure, "Walking buddy search failed");
                Status::Failed(failure.into())
            }
        };

        self.publish(status)
    }
}

fn apply_matches<M: BaseMapSurface>(markers: &mut MarkerSet<M>, matches: &[BuddyMatch]) -> Status {
    match markers.replace_buddy_markers(matches) {
        Ok(()) => {
            info!(count = matches.len(), "Walking buddies found");
            Status::Found(matches.len())
        }
        Err(e) => Status::Failed(WorkflowError::from(e)),
    }
}
