//! Configuration for the registration tool.
//!
//! Workspace identity comes from the environment variables the Azure ML job
//! runtime injects into every component container:
//! - `AZUREML_ARM_SUBSCRIPTION` - subscription id
//! - `AZUREML_ARM_RESOURCEGROUP` - resource group name
//! - `AZUREML_ARM_WORKSPACE_NAME` - workspace name
//!
//! The ARM endpoint can be overridden with `MLREGISTRAR_ARM_ENDPOINT` for
//! sovereign clouds.

use anyhow::{anyhow, Result};
use std::env;

/// Workspace scope for registry operations
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    pub subscription_id: String,
    pub resource_group: String,
    pub workspace_name: String,
}

impl WorkspaceConfig {
    /// Load workspace identity from the Azure ML job environment
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            subscription_id: require_env("AZUREML_ARM_SUBSCRIPTION")?,
            resource_group: require_env("AZUREML_ARM_RESOURCEGROUP")?,
            workspace_name: require_env("AZUREML_ARM_WORKSPACE_NAME")?,
        })
    }

    /// ARM resource path prefix for this workspace
    pub fn resource_path(&self) -> String {
        format!(
            "/subscriptions/{}/resourceGroups/{}/providers/Microsoft.MachineLearningServices/workspaces/{}",
            self.subscription_id, self.resource_group, self.workspace_name
        )
    }
}

fn require_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| anyhow!("{} is not set in the environment", name))
}

/// Registry endpoint configuration
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// Base URL for ARM requests
    pub base_url: String,

    /// ARM api-version for the Microsoft.MachineLearningServices provider
    pub api_version: String,

    /// Timeout for requests in seconds
    pub timeout_secs: u64,

    /// User agent string
    pub user_agent: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            base_url: "https://management.azure.com".to_string(),
            api_version: "2024-04-01".to_string(),
            timeout_secs: 300, // 5 minutes
            user_agent: "mlregistrar/0.1.0".to_string(),
        }
    }
}

impl RegistryConfig {
    /// Default configuration with the endpoint override applied
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = env::var("MLREGISTRAR_ARM_ENDPOINT") {
            config.base_url = endpoint.trim_end_matches('/').to_string();
        }
        config
    }
}
