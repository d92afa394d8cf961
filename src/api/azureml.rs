//! Azure ML workspace registry client over the ARM REST surface

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::api::registry::{
    ModelRegistry, ModelSpec, RegisteredModel, RegistryError,
};
use crate::config::{RegistryConfig, WorkspaceConfig};

/// ARM client for a workspace model registry
pub struct AzureMlClient {
    client: Client,
    config: RegistryConfig,
    workspace: WorkspaceConfig,
}

impl AzureMlClient {
    /// Create a new client with a resolved ARM bearer token
    pub fn new(config: RegistryConfig, workspace: WorkspaceConfig, token: &str) -> Result<Self> {
        let mut headers = header::HeaderMap::new();

        let auth_value = header::HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| anyhow::anyhow!("Invalid token format: {}", e))?;
        headers.insert(header::AUTHORIZATION, auth_value);

        let user_agent = header::HeaderValue::from_str(&config.user_agent)
            .map_err(|e| anyhow::anyhow!("Invalid user agent: {}", e))?;
        headers.insert(header::USER_AGENT, user_agent);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            client,
            config,
            workspace,
        })
    }

    /// ARM URL of the model container
    fn model_url(&self, name: &str) -> String {
        format!(
            "{}{}/models/{}",
            self.config.base_url,
            self.workspace.resource_path(),
            name
        )
    }

    /// ARM URL of the version collection for a model
    fn versions_url(&self, name: &str) -> String {
        format!("{}/versions", self.model_url(name))
    }

    /// ARM URL of a single model version
    fn version_url(&self, name: &str, version: &str) -> String {
        format!("{}/versions/{}", self.model_url(name), version)
    }

    fn api_version_query(&self) -> [(&'static str, &str); 1] {
        [("api-version", self.config.api_version.as_str())]
    }
}

#[async_trait]
impl ModelRegistry for AzureMlClient {
    async fn create_or_update(&self, spec: &ModelSpec) -> Result<RegisteredModel> {
        let versions = self.list_versions(&spec.name).await?;
        let version = next_version(&versions);

        let body = ModelVersionRequest {
            properties: ModelVersionProperties {
                model_type: spec.asset_type.as_str().to_string(),
                model_uri: spec.path.to_string_lossy().into_owned(),
                description: spec.description.clone(),
                tags: spec.tags.clone(),
            },
        };

        let url = self.version_url(&spec.name, &version);
        debug!(%url, "Submitting model version");

        let response = self
            .client
            .put(&url)
            .query(&self.api_version_query())
            .json(&body)
            .send()
            .await
            .map_err(|e| RegistryError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RegistryError::AuthenticationFailed(format!(
                "registry rejected the ARM token ({})",
                status
            ))
            .into());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::HttpError {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let resource: ModelVersionResource = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse registry response: {}", e))?;

        info!(name = %spec.name, %version, "Model version registered");

        Ok(RegisteredModel {
            name: spec.name.clone(),
            version,
            id: resource.id,
        })
    }

    async fn model_exists(&self, name: &str) -> Result<bool> {
        let response = self
            .client
            .get(&self.model_url(name))
            .query(&self.api_version_query())
            .send()
            .await
            .map_err(|e| RegistryError::NetworkError(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RegistryError::AuthenticationFailed(format!(
                "registry rejected the ARM token ({})",
                status
            ))
            .into());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::HttpError {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        Ok(true)
    }

    async fn list_versions(&self, name: &str) -> Result<Vec<String>> {
        let response = self
            .client
            .get(&self.versions_url(name))
            .query(&self.api_version_query())
            .send()
            .await
            .map_err(|e| RegistryError::NetworkError(e.to_string()))?;

        let status = response.status();
        // A model that has never been registered has no version collection yet
        if status == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RegistryError::AuthenticationFailed(format!(
                "registry rejected the ARM token ({})",
                status
            ))
            .into());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RegistryError::HttpError {
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let list: ModelVersionList = response
            .json()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to parse version list: {}", e))?;

        Ok(list.value.into_iter().map(|v| v.name).collect())
    }
}

/// Next free version: max numeric existing version + 1, "1" for a new model.
/// Non-numeric versions are ignored.
fn next_version(existing: &[String]) -> String {
    let max = existing
        .iter()
        .filter_map(|v| v.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (max + 1).to_string()
}

/// Model version PUT body
#[derive(Debug, Serialize)]
struct ModelVersionRequest {
    properties: ModelVersionProperties,
}

#[derive(Debug, Serialize)]
struct ModelVersionProperties {
    #[serde(rename = "modelType")]
    model_type: String,

    #[serde(rename = "modelUri")]
    model_uri: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    #[serde(skip_serializing_if = "HashMap::is_empty")]
    tags: HashMap<String, String>,
}

/// Model version resource from the ARM response
#[derive(Debug, Deserialize)]
struct ModelVersionResource {
    pub id: String,
    pub name: String,
}

/// Paged version collection
#[derive(Debug, Deserialize)]
struct ModelVersionList {
    #[serde(default)]
    pub value: Vec<ModelVersionResource>,
}
