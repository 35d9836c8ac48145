//! Pure Walking Buddy REST API client.
//!
//! A minimal client for the campus navigator backend. Supports looking up
//! walking buddies headed to the same destination and planning a route
//! between two addresses.
//!
//! # Example
//!
//! ```rust,ignore
//! use buddy_client::{BuddyClient, Coordinate, MatchRequest, UserId};
//!
//! let client = BuddyClient::new(buddy_client::DEFAULT_BASE_URL);
//!
//! let request = MatchRequest::new(
//!     UserId::generate(),
//!     Coordinate::new(43.4731, -80.5267)?,
//!     "Waterloo Station",
//!     chrono::Utc::now(),
//! );
//! let response = client.find_buddies(&request).await?;
//! for buddy in &response.matches {
//!     println!("{} is {} km away", buddy.user_id, buddy.distance_km);
//! }
//! ```

pub mod error;
pub mod response;
pub mod types;

pub use error::{BuddyClientError, CoordinateError, Result};
pub use response::{interpret_match_response, interpret_route_response, GENERIC_SERVER_ERROR};
pub use types::{
    BuddyMatch, Coordinate, MatchRequest, MatchResponse, RoutePlan, RouteRequest, RouteSource,
    TravelMode, UserId,
};

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{debug, warn};

/// Public deployment of the backend.
pub const DEFAULT_BASE_URL: &str = "https://cp317-group-18-project.onrender.com";

const WALKING_BUDDY_PATH: &str = "/service/v1/walking_buddy";
const ROUTE_PATH: &str = "/service/v1/route";

/// Settings for building a [`BuddyClient`].
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
            user_agent: None,
        }
    }
}

/// Walking Buddy API client. Stateless between calls; cheap to clone.
#[derive(Clone)]
pub struct BuddyClient {
    http_client: Client,
    base_url: String,
}

impl BuddyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: normalize_base_url(base_url.into()),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(BuddyClientError::Config(format!(
                "base URL must be http(s): {}",
                config.base_url
            )));
        }

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        let http_client = builder
            .build()
            .map_err(|e| BuddyClientError::Config(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: normalize_base_url(config.base_url.clone()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send one JSON POST and return the status with the raw body.
    ///
    /// Any failure before the full body is read counts as a connection error.
    async fn post_json<B: Serialize>(&self, path: &str, body: &B) -> Result<(u16, String)> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Sending request");

        let resp = self
            .http_client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Walking Buddy service unreachable");
                BuddyClientError::Connection(e.to_string())
            })?;

        let status = resp.status().as_u16();
        let text = resp.text().await.map_err(|e| {
            warn!(url = %url, status, error = %e, "Failed to read response body");
            BuddyClientError::Connection(e.to_string())
        })?;

        Ok((status, text))
    }

    /// Find walkers near `request.start_coord` heading to the same destination.
    ///
    /// Exactly one HTTP exchange per call, no retry.
    pub async fn find_buddies(&self, request: &MatchRequest) -> Result<MatchResponse> {
        let (status, body) = self.post_json(WALKING_BUDDY_PATH, request).await?;

        let result = interpret_match_response(status, &body);
        match &result {
            Ok(response) => debug!(
                user_id = %request.user_id(),
                count = response.count,
                "Walking buddy lookup succeeded"
            ),
            Err(e) => warn!(user_id = %request.user_id(), status, error = %e, "Walking buddy lookup failed"),
        }
        result
    }

    /// Plan a route between two free-text addresses.
    pub async fn plan_route(&self, request: &RouteRequest) -> Result<RoutePlan> {
        let (status, body) = self.post_json(ROUTE_PATH, request).await?;

        let result = interpret_route_response(status, &body);
        match &result {
            Ok(plan) => debug!(
                distance_m = plan.distance_m,
                fallback = plan.fallback,
                "Route planned"
            ),
            Err(e) => warn!(status, error = %e, "Route planning failed"),
        }
        result
    }
}

fn normalize_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
