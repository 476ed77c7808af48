//! Client for the EPA beaches.ie bathing-water API.

pub mod cache;
pub mod client;
pub mod mock;
pub mod models;

use async_trait::async_trait;
use serde_json::Value;

pub use client::BeachesApiClient;
pub use models::{AlertDetails, BeachSummary, Facilities, RecentMeasurement};

#[derive(Debug, thiserror::Error)]
pub enum BeachesApiError {
    #[error("Timeout fetching {0}")]
    Timeout(String),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("API error: {0}")]
    Api(String),
    #[error("Request failed: {0}")]
    Request(String),
    #[error("Invalid JSON response: {0}")]
    InvalidResponse(String),
    #[error("Client configuration error: {0}")]
    Config(String),
}

/// Source of EPA data for locations. Lookups never fail; upstream problems
/// are logged and surface as empty results.
#[async_trait]
pub trait BeachDataSource: Send + Sync {
    async fn get_location(&self, beach_id: &str) -> Option<Value>;

    async fn get_measurements(&self, beach_id: &str, limit: usize) -> Vec<Value>;

    async fn get_alerts(&self, beach_id: &str) -> Vec<Value>;

    /// Like [`get_alerts`](Self::get_alerts) but reports upstream failures,
    /// so callers can tell "no alerts" from "no answer".
    async fn fetch_alerts(&self, beach_id: &str) -> Result<Vec<Value>, BeachesApiError> {
        Ok(self.get_alerts(beach_id).await)
    }

    /// True when serving canned data.
    fn is_mock(&self) -> bool {
        false
    }

    async fn get_latest_measurement(&self, beach_id: &str) -> Option<Value> {
        self.get_measurements(beach_id, 1).await.into_iter().next()
    }

    async fn format_for_poster(&self, beach_id: &str) -> BeachSummary {
        let location = self.get_location(beach_id).await;
        let measurements = self.get_measurements(beach_id, 5).await;
        let alerts = self.get_alerts(beach_id).await;
        BeachSummary::from_parts(
            beach_id,
            location.as_ref(),
            &measurements,
            &alerts,
            self.is_mock(),
        )
    }
}
