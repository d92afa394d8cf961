//! ARM credential resolution
//!
//! Mirrors the default-credential chain the Azure ML job runtime expects:
//! a pre-minted token in the environment, the managed-identity endpoint the
//! compute exposes to job containers, or a service principal.

use anyhow::{anyhow, Result};
use serde::Deserialize;
use std::env;
use tracing::debug;

use crate::api::registry::RegistryError;

/// Scope requested for registry operations
const ARM_SCOPE: &str = "https://management.azure.com/.default";

/// Resource identifier used by the managed-identity endpoint
const ARM_RESOURCE: &str = "https://management.azure.com/";

/// ARM credential chain
pub struct ArmCredential {
    client: reqwest::Client,
}

impl ArmCredential {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    /// Resolve a bearer token for ARM calls.
    ///
    /// Sources are tried in order:
    /// 1. `AZURE_ACCESS_TOKEN` - token minted outside the process
    /// 2. managed-identity endpoint (`MSI_ENDPOINT` + `MSI_SECRET`)
    /// 3. service principal (`AZURE_TENANT_ID`, `AZURE_CLIENT_ID`, `AZURE_CLIENT_SECRET`)
    pub async fn resolve(&self) -> Result<String> {
        if let Ok(token) = env::var("AZURE_ACCESS_TOKEN") {
            let token = token.trim().to_string();
            if !token.is_empty() {
                debug!("Using ARM token from AZURE_ACCESS_TOKEN");
                return Ok(token);
            }
        }

        if let (Ok(endpoint), Ok(secret)) = (env::var("MSI_ENDPOINT"), env::var("MSI_SECRET")) {
            debug!("Requesting ARM token from managed-identity endpoint");
            return self.managed_identity_token(&endpoint, &secret).await;
        }

        if let (Ok(tenant), Ok(client_id), Ok(client_secret)) = (
            env::var("AZURE_TENANT_ID"),
            env::var("AZURE_CLIENT_ID"),
            env::var("AZURE_CLIENT_SECRET"),
        ) {
            debug!("Requesting ARM token for service principal");
            return self
                .service_principal_token(&tenant, &client_id, &client_secret)
                .await;
        }

        Err(RegistryError::AuthenticationFailed(
            "no credential source available; set AZURE_ACCESS_TOKEN, run on managed-identity \
             compute, or provide AZURE_TENANT_ID/AZURE_CLIENT_ID/AZURE_CLIENT_SECRET"
                .to_string(),
        )
        .into())
    }

    async fn managed_identity_token(&self, endpoint: &str, secret: &str) -> Result<String> {
        let response = self
            .client
            .get(endpoint)
            .header("secret", secret)
            .query(&[("api-version", "2017-09-01"), ("resource", ARM_RESOURCE)])
            .send()
            .await
            .map_err(|e| RegistryError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RegistryError::AuthenticationFailed(format!(
                "managed-identity endpoint returned {}",
                response.status()
            ))
            .into());
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse managed-identity response: {}", e))?;

        Ok(token.access_token)
    }

    async fn service_principal_token(
        &self,
        tenant: &str,
        client_id: &str,
        client_secret: &str,
    ) -> Result<String> {
        let url = format!(
            "https://login.microsoftonline.com/{}/oauth2/v2.0/token",
            tenant
        );

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id),
                ("client_secret", client_secret),
                ("scope", ARM_SCOPE),
            ])
            .send()
            .await
            .map_err(|e| RegistryError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(RegistryError::AuthenticationFailed(format!(
                "token endpoint returned {}",
                response.status()
            ))
            .into());
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse token response: {}", e))?;

        Ok(token.access_token)
    }
}

impl Default for ArmCredential {
    fn default() -> Self {
        Self::new()
    }
}

/// Token endpoint response, both MSI and client-credentials flavors
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}
