use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoordinateError;

/// A validated (latitude, longitude) pair.
///
/// On the wire a coordinate is a two element array `[lat, lon]`. Deserialization
/// goes through [`Coordinate::new`], so a payload can never smuggle in an
/// out-of-range or non-finite value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Wilfrid Laurier University, Waterloo campus.
    pub const LAURIER_CAMPUS: Coordinate = Coordinate {
        latitude: 43.4731,
        longitude: -80.5267,
    };

    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinateError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordinateError::NotFinite);
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinateError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinateError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = CoordinateError;

    fn try_from([latitude, longitude]: [f64; 2]) -> Result<Self, Self::Error> {
        Self::new(latitude, longitude)
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coord: Coordinate) -> Self {
        [coord.latitude, coord.longitude]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// Opaque correlation token sent with each match request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// `user_` followed by seven random hex characters.
    pub fn generate() -> Self {
        let token = Uuid::new_v4().simple().to_string();
        Self(format!("user_{}", &token[..7]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /service/v1/walking_buddy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRequest {
    user_id: UserId,
    start_coord: Coordinate,
    destination_address: String,
    timestamp: DateTime<Utc>,
}

impl MatchRequest {
    pub fn new(
        user_id: UserId,
        start_coord: Coordinate,
        destination_address: &str,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            start_coord,
            destination_address: destination_address.trim().to_string(),
            timestamp,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn start_coord(&self) -> Coordinate {
        self.start_coord
    }

    pub fn destination_address(&self) -> &str {
        &self.destination_address
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// A single candidate walker returned by the matching service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuddyMatch {
    pub user_id: String,
    pub start_coord: Coordinate,
    pub distance_km: f64,
}

/// Successful response of the matching endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResponse {
    pub count: u64,
    pub matches: Vec<BuddyMatch>,
}

/// Error body returned with a non-2xx status.
///
/// `detail` is usually a string, but validation failures report a list of
/// problems there instead, so it is kept as raw JSON.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    #[default]
    Driving,
    Walking,
}

/// Body of `POST /service/v1/route`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start: String,
    pub destination: String,
    #[serde(default)]
    pub mode: TravelMode,
}

impl RouteRequest {
    pub fn walking(start: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            destination: destination.into(),
            mode: TravelMode::Walking,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    Osrm,
    HaversineFallback,
}

/// Planned route between two geocoded addresses.
///
/// When the routing engine is unavailable the service falls back to a straight
/// line: `fallback` is set, `duration_s` is absent and `polyline` holds only the
/// two endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub start: String,
    pub destination: String,
    pub start_coord: Coordinate,
    pub dest_coord: Coordinate,
    pub distance_m: f64,
    pub duration_s: Option<f64>,
    pub polyline: Vec<Coordinate>,
    #[serde(default)]
    pub steps: Vec<serde_json::Value>,
    pub source: RouteSource,
    pub fallback: bool,
    #[serde(default)]
    pub error: Option<String>,
}
