//! Pure state machine behind the buddy workflow.
//!
//! No IO, no async. It tracks which phase the workflow is in and which search
//! and location request are the current ones, so that resolutions of superseded
//! requests can be told apart and dropped.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowState {
    /// No self location yet
    Idle,
    /// Self location known, nothing outstanding
    Located,
    /// A search is outstanding
    Searching,
}

/// Identifies one search. Only the most recently issued ticket is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct SearchTicket(u64);

impl SearchTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// Identifies one location request. Only the most recently issued ticket is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LocationTicket(u64);

impl LocationTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct WorkflowMachine {
    state: WorkflowState,
    latest: u64,
    latest_location: u64,
}

impl WorkflowMachine {
    pub fn new() -> Self {
        Self {
            state: WorkflowState::Idle,
            latest: 0,
            latest_location: 0,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    /// Issue a new location request. Any earlier ticket stops being current.
    pub fn on_location_requested(&mut self) -> LocationTicket {
        self.latest_location += 1;
        LocationTicket(self.latest_location)
    }

    pub fn is_current_location(&self, ticket: LocationTicket) -> bool {
        ticket.0 == self.latest_location
    }

    /// A location request resolved. Returns whether its outcome should be applied.
    ///
    /// A successful current fix moves `Idle` to `Located`; an outstanding search
    /// stays outstanding. A stale ticket changes nothing.
    pub fn on_location_resolved(&mut self, ticket: LocationTicket, acquired: bool) -> bool {
        if !self.is_current_location(ticket) {
            debug!(
                ticket = ticket.0,
                latest = self.latest_location,
                "Ignoring resolution of superseded location request"
            );
            return false;
        }
        if acquired && self.state == WorkflowState::Idle {
            self.transition(WorkflowState::Located);
        }
        true
    }

    /// Issue a new search. Any earlier ticket stops being current.
    pub fn on_search_started(&mut self) -> SearchTicket {
        self.latest += 1;
        self.transition(WorkflowState::Searching);
        SearchTicket(self.latest)
    }

    pub fn is_current(&self, ticket: SearchTicket) -> bool {
        ticket.0 == self.latest
    }

    /// A search resolved. Returns whether its outcome should be applied.
    ///
    /// Only the current ticket moves the machine back to `Located`; a stale one
    /// leaves everything untouched.
    pub fn on_search_resolved(&mut self, ticket: SearchTicket) -> bool {
        if !self.is_current(ticket) || self.state != WorkflowState::Searching {
            debug!(
                ticket = ticket.0,
                latest = self.latest,
                "Ignoring resolution of superseded search"
            );
            return false;
        }
        self.transition(WorkflowState::Located);
        true
    }

    fn transition(&mut self, next: WorkflowState) {
        if self.state != next {
            debug!(from = ?self.state, to = ?next, "Workflow transition");
            self.state = next;
        }
    }
}

impl Default for WorkflowMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        assert_eq!(WorkflowMachine::new().state(), WorkflowState::Idle);
    }

    fn locate(machine: &mut WorkflowMachine) {
        let ticket = machine.on_location_requested();
        assert!(machine.on_location_resolved(ticket, true));
    }

    #[test]
    fn test_location_moves_idle_to_located() {
        let mut machine = WorkflowMachine::new();
        locate(&mut machine);
        assert_eq!(machine.state(), WorkflowState::Located);

        locate(&mut machine);
        assert_eq!(machine.state(), WorkflowState::Located);
    }

    #[test]
    fn test_failed_location_stays_idle() {
        let mut machine = WorkflowMachine::new();
        let ticket = machine.on_location_requested();
        assert!(machine.on_location_resolved(ticket, false));
        assert_eq!(machine.state(), WorkflowState::Idle);
    }

    #[test]
    fn test_superseded_location_is_dropped() {
        let mut machine = WorkflowMachine::new();
        let first = machine.on_location_requested();
        let second = machine.on_location_requested();

        assert!(machine.on_location_resolved(second, true));
        assert!(!machine.on_location_resolved(first, true));
        assert!(!machine.is_current_location(first));
    }

    #[test]
    fn test_stale_location_does_not_leave_idle() {
        let mut machine = WorkflowMachine::new();
        let first = machine.on_location_requested();
        let _second = machine.on_location_requested();

        assert!(!machine.on_location_resolved(first, true));
        assert_eq!(machine.state(), WorkflowState::Idle);
    }

    #[test]
    fn test_location_during_search_keeps_searching() {
        let mut machine = WorkflowMachine::new();
        locate(&mut machine);
        let ticket = machine.on_search_started();

        locate(&mut machine);
        assert_eq!(machine.state(), WorkflowState::Searching);
        assert!(machine.on_search_resolved(ticket));
        assert_eq!(machine.state(), WorkflowState::Located);
    }

    #[test]
    fn test_tickets_increase_monotonically() {
        let mut machine = WorkflowMachine::new();
        let a = machine.on_search_started();
        let b = machine.on_search_started();
        let c = machine.on_search_started();
        assert!(a < b && b < c);
        assert!(machine.is_current(c));
        assert!(!machine.is_current(a));
    }

    #[test]
    fn test_superseded_resolution_is_dropped_in_either_order() {
        let mut machine = WorkflowMachine::new();
        locate(&mut machine);

        // Late arrival of the older search after the newer one resolved
        let first = machine.on_search_started();
        let second = machine.on_search_started();
        assert!(machine.on_search_resolved(second));
        assert!(!machine.on_search_resolved(first));
        assert_eq!(machine.state(), WorkflowState::Located);

        // Older search resolves while the newer one is still outstanding
        let third = machine.on_search_started();
        let fourth = machine.on_search_started();
        assert!(!machine.on_search_resolved(third));
        assert_eq!(machine.state(), WorkflowState::Searching);
        assert!(machine.on_search_resolved(fourth));
        assert_eq!(machine.state(), WorkflowState::Located);
    }

    #[test]
    fn test_double_resolution_is_ignored() {
        let mut machine = WorkflowMachine::new();
        locate(&mut machine);
        let ticket = machine.on_search_started();
        assert!(machine.on_search_resolved(ticket));
        assert!(!machine.on_search_resolved(ticket));
    }
}
