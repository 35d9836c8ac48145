use std::fmt;

use buddy_client::Coordinate;

use super::errors::WorkflowError;

/// What the user has told the workflow so far.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserSession {
    self_location: Option<Coordinate>,
    destination: String,
}

impl UserSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn self_location(&self) -> Option<Coordinate> {
        self.self_location
    }

    pub fn set_self_location(&mut self, coord: Coordinate) {
        self.self_location = Some(coord);
    }

    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn set_destination(&mut self, destination: impl Into<String>) {
        self.destination = destination.into();
    }

    /// Trimmed destination, or `None` when only whitespace
    pub fn search_destination(&self) -> Option<&str> {
        let trimmed = self.destination.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Status line shown to the user after each step.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Ready,
    Located(Coordinate),
    Searching,
    Found(usize),
    NoBuddies,
    Failed(WorkflowError),
}

impl Status {
    pub fn is_failure(&self) -> bool {
        matches!(self, Status::Failed(_))
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Ready => f.write_str("Share your location to find walking buddies."),
            Status::Located(coord) => write!(f, "Your location: {}", coord),
            Status::Searching => f.write_str("Finding nearby walkers... ⏳"),
            Status::Found(count) => write!(f, "Found {} walking buddy match(es)!", count),
            Status::NoBuddies => f.write_str("No walking buddies nearby right now 😕"),
            Status::Failed(err) => write!(f, "{}", err),
        }
    }
}

impl From<WorkflowError> for Status {
    fn from(err: WorkflowError) -> Self {
        Status::Failed(err)
    }
}
