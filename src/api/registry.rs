//! Model registry abstraction and registration entities

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Packaging format of a registered model asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetType {
    CustomModel,
    MlflowModel,
    TritonModel,
}

impl AssetType {
    /// Parse the CLI/component string form. Unrecognized values fall back to
    /// `CustomModel`, matching the registry's default asset type.
    pub fn from_string(s: &str) -> Self {
        match s {
            "mlflow_model" => Self::MlflowModel,
            "triton_model" => Self::TritonModel,
            _ => Self::CustomModel,
        }
    }

    /// Wire string the registry expects for `modelType`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CustomModel => "custom_model",
            Self::MlflowModel => "mlflow_model",
            Self::TritonModel => "triton_model",
        }
    }
}

/// Request entity for a registration call
#[derive(Debug, Clone)]
pub struct ModelSpec {
    /// Name under which the model is registered
    pub name: String,

    /// Path or URI of the model artifact (mounted job output or azureml:// URI)
    pub path: PathBuf,

    /// Packaging format
    pub asset_type: AssetType,

    /// Free-form description shown in the registry UI
    pub description: Option<String>,

    /// Arbitrary key/value tags attached to the version
    pub tags: HashMap<String, String>,
}

/// Identity assigned by the registry after a successful registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredModel {
    pub name: String,
    pub version: String,
    /// Fully qualified ARM resource id of the model version
    pub id: String,
}

/// Record written to `registration_details.json` for downstream pipeline steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationRecord {
    pub name: String,
    pub version: String,
    pub id: String,
    #[serde(rename = "type")]
    pub asset_type: String,
}

impl RegistrationRecord {
    /// Build the record from the registry response plus the requested type
    /// string. The type echoes the request, not the server.
    pub fn new(registered: &RegisteredModel, requested_type: &str) -> Self {
        Self {
            name: registered.name.clone(),
            version: registered.version.clone(),
            id: registered.id.clone(),
            asset_type: requested_type.to_string(),
        }
    }
}

/// Abstract model registry trait
#[async_trait]
pub trait ModelRegistry {
    /// Register a model version, assigning the next free version number
    async fn create_or_update(&self, spec: &ModelSpec) -> Result<RegisteredModel>;

    /// Check if a model container exists in the registry
    async fn model_exists(&self, name: &str) -> Result<bool>;

    /// List existing version strings for a model, empty when the model is new
    async fn list_versions(&self, name: &str) -> Result<Vec<String>>;
}

/// Error types for model registry operations
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Registry API error ({status}): {body}")]
    HttpError { status: u16, body: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_asset_types() {
        assert_eq!(AssetType::from_string("custom_model"), AssetType::CustomModel);
        assert_eq!(AssetType::from_string("mlflow_model"), AssetType::MlflowModel);
        assert_eq!(AssetType::from_string("triton_model"), AssetType::TritonModel);
    }

    #[test]
    fn test_unknown_asset_type_falls_back_to_custom() {
        assert_eq!(AssetType::from_string("onnx"), AssetType::CustomModel);
        assert_eq!(AssetType::from_string(""), AssetType::CustomModel);
        assert_eq!(AssetType::from_string("CUSTOM_MODEL"), AssetType::CustomModel);
    }

    #[test]
    fn test_record_serializes_with_type_key() {
        let registered = RegisteredModel {
            name: "m".into(),
            version: "3".into(),
            id: "/subscriptions/s/models/m/versions/3".into(),
        };
        let record = RegistrationRecord::new(&registered, "mlflow_model");
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&record).unwrap()).unwrap();

        assert_eq!(json["name"], "m");
        assert_eq!(json["version"], "3");
        assert_eq!(json["id"], "/subscriptions/s/models/m/versions/3");
        assert_eq!(json["type"], "mlflow_model");
        assert_eq!(json.as_object().unwrap().len(), 4);
    }
}
