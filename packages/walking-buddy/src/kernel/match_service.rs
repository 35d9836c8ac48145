//! Walking Buddy backend adapter (implements BaseMatchService)

use async_trait::async_trait;
use buddy_client::{BuddyClient, BuddyClientError, MatchRequest};

use crate::config::Config;
use crate::kernel::{BaseMatchService, MatchFailure, MatchResult};

/// Wrapper around BuddyClient that implements BaseMatchService trait
#[derive(Clone)]
pub struct HttpMatchService(pub BuddyClient);

impl HttpMatchService {
    pub fn new(client: BuddyClient) -> Self {
        Self(client)
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = BuddyClient::from_config(&config.to_client_config())?;
        Ok(Self(client))
    }
}

impl From<BuddyClientError> for MatchFailure {
    fn from(err: BuddyClientError) -> Self {
        match err {
            BuddyClientError::Config(message) | BuddyClientError::Connection(message) => {
                MatchFailure::Connection(message)
            }
            BuddyClientError::Server { message, .. } => MatchFailure::Server(message),
            BuddyClientError::MalformedResponse(message) => {
                MatchFailure::MalformedResponse(message)
            }
        }
    }
}

#[async_trait]
impl BaseMatchService for HttpMatchService {
    async fn find_buddies(&self, request: &MatchRequest) -> MatchResult {
        self.0
            .find_buddies(request)
            .await
            .map(|response| response.matches)
            .map_err(MatchFailure::from)
    }
}
