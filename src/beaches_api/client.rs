use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::cache::ResponseCache;
use super::{BeachDataSource, BeachesApiError, mock};
use crate::server::config::BeachesApiConfig;
use crate::version::USER_AGENT;

/// HTTP client for beaches.ie with a response cache and stale fallback.
pub struct BeachesApiClient {
    client: Client,
    config: BeachesApiConfig,
    cache: ResponseCache,
}

impl BeachesApiClient {
    pub fn new(config: BeachesApiConfig) -> Result<Self, BeachesApiError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .default_headers(headers)
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BeachesApiError::Config(e.to_string()))?;

        Ok(Self {
            client,
            cache: ResponseCache::new(Duration::from_secs(config.cache_timeout_secs)),
            config,
        })
    }

    fn cache_key(endpoint: &str, params: &[(&str, String)]) -> String {
        format!("beaches_api:{endpoint}:{params:?}")
    }

    fn fall_back_to_stale(&self, key: &str, endpoint: &str, err: BeachesApiError) -> Result<Value, BeachesApiError> {
        match self.cache.get_stale(key) {
            Some(stale) => {
                info!(endpoint, "Using stale cache after upstream failure.");
                Ok(stale)
            }
            None => Err(err),
        }
    }

    /// GET `{base_url}/{endpoint}` with the given query.
    pub async fn request(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Value, BeachesApiError> {
        if self.config.use_mock_data {
            return Ok(mock::response(endpoint, params));
        }

        let key = Self::cache_key(endpoint, params);
        if let Some(cached) = self.cache.get_fresh(&key) {
            debug!(endpoint, "Cache hit.");
            return Ok(cached);
        }

        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );

        let response = match self.client.get(&url).query(params).send().await {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                warn!(endpoint, "Timeout fetching from beaches.ie.");
                return self.fall_back_to_stale(&key, endpoint, BeachesApiError::Timeout(endpoint.to_string()));
            }
            Err(e) => {
                error!(endpoint, error = %e, "Request to beaches.ie failed.");
                return self.fall_back_to_stale(&key, endpoint, BeachesApiError::Request(e.to_string()));
            }
        };

        match response.status() {
            StatusCode::NOT_FOUND => return Err(BeachesApiError::NotFound(endpoint.to_string())),
            status if !status.is_success() => {
                return Err(BeachesApiError::Api(format!("{status} for {endpoint}")));
            }
            _ => {}
        }

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                BeachesApiError::Timeout(endpoint.to_string())
            } else {
                BeachesApiError::Request(e.to_string())
            }
        });
        let body = match body {
            Ok(body) => body,
            Err(err) => return self.fall_back_to_stale(&key, endpoint, err),
        };

        let data: Value = serde_json::from_str(&body)
            .map_err(|e| BeachesApiError::InvalidResponse(e.to_string()))?;

        if is_truthy(&data) {
            self.cache.put(key, data.clone());
        }
        Ok(data)
    }
}

/// Empty objects, arrays and strings are not worth caching.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Number(_) => true,
    }
}

/// Accepts either a bare list or `{"data": [...]}`.
fn unwrap_list(data: Value) -> Vec<Value> {
    match data {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("data") {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

#[async_trait]
impl BeachDataSource for BeachesApiClient {
    async fn get_location(&self, beach_id: &str) -> Option<Value> {
        match self.request(&format!("locations/{beach_id}"), &[]).await {
            Ok(data) => Some(data),
            Err(BeachesApiError::NotFound(_)) => None,
            Err(e) => {
                error!(beach_id, error = %e, "Error fetching location.");
                None
            }
        }
    }

    async fn get_measurements(&self, beach_id: &str, limit: usize) -> Vec<Value> {
        let params = [("beach_id", beach_id.to_string()), ("per_page", limit.to_string())];
        match self.request("measurements", &params).await {
            Ok(data) => unwrap_list(data).into_iter().take(limit).collect(),
            Err(e) => {
                error!(beach_id, error = %e, "Error fetching measurements.");
                Vec::new()
            }
        }
    }

    async fn get_alerts(&self, beach_id: &str) -> Vec<Value> {
        match self.fetch_alerts(beach_id).await {
            Ok(alerts) => alerts,
            Err(e) => {
                error!(beach_id, error = %e, "Error fetching alerts.");
                Vec::new()
            }
        }
    }

    async fn fetch_alerts(&self, beach_id: &str) -> Result<Vec<Value>, BeachesApiError> {
        let params = [("beach_id", beach_id.to_string()), ("is_active", "true".to_string())];
        self.request("alerts", &params).await.map(unwrap_list)
    }

    fn is_mock(&self) -> bool {
        self.config.use_mock_data
    }
}
