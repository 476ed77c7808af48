//! Publishes generated posters to the open-data portal (CKAN action API).

use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tracing::{error, info};

use crate::server::config::CkanConfig;
use crate::version::USER_AGENT;

#[derive(Debug, thiserror::Error)]
pub enum CkanError {
    #[error("CKAN publishing is not configured")]
    NotConfigured,
    #[error("CKAN request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("CKAN rejected the upload: {0}")]
    Api(String),
    #[error("Unexpected CKAN response: {0}")]
    InvalidResponse(String),
}

pub struct CkanClient {
    config: CkanConfig,
    http: reqwest::Client,
}

impl CkanClient {
    pub fn new(config: CkanConfig) -> Result<Self, CkanError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { config, http })
    }

    /// Both an API URL and key are needed to publish.
    pub fn is_configured(&self) -> bool {
        !self.config.api_url.trim().is_empty() && !self.config.api_key.trim().is_empty()
    }

    pub fn package_id(&self) -> &str {
        &self.config.package_id
    }

    /// Uploads a PDF as a new resource of the configured package and
    /// returns the resource id.
    pub async fn upload_resource(
        &self,
        name: &str,
        description: &str,
        filename: &str,
        pdf: Vec<u8>,
    ) -> Result<String, CkanError> {
        if !self.is_configured() {
            return Err(CkanError::NotConfigured);
        }
        let url = format!("{}/action/resource_create", self.config.api_url.trim_end_matches('/'));

        let file = Part::bytes(pdf)
            .file_name(filename.to_string())
            .mime_str("application/pdf")?;
        let form = Form::new()
            .text("package_id", self.config.package_id.clone())
            .text("name", name.to_string())
            .text("description", description.to_string())
            .text("format", "PDF")
            .part("upload", file);

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::AUTHORIZATION, &self.config.api_key)
            .multipart(form)
            .send()
            .await?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| CkanError::InvalidResponse(format!("HTTP {status}: {e}")))?;

        if body.get("success").and_then(Value::as_bool) == Some(true) {
            let id = body
                .pointer("/result/id")
                .and_then(Value::as_str)
                .ok_or_else(|| CkanError::InvalidResponse("missing result.id".to_string()))?;
            info!(resource_id = %id, package = %self.config.package_id, "Published resource to CKAN");
            Ok(id.to_string())
        } else {
            let message = body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {status}"));
            error!(error = %message, "CKAN resource_create failed");
            Err(CkanError::Api(message))
        }
    }
}
