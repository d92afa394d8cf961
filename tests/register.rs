use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;
use tempfile::TempDir;

use mlregistrar_core::{
    api::registry::{AssetType, ModelRegistry, ModelSpec, RegisteredModel},
    cli::handlers::{register_and_record, REGISTRATION_DETAILS_FILE},
};

/// In-memory registry standing in for the ARM surface
struct StaticRegistry {
    versions: Vec<String>,
}

#[async_trait]
impl ModelRegistry for StaticRegistry {
    async fn create_or_update(&self, spec: &ModelSpec) -> Result<RegisteredModel> {
        let versions = self.list_versions(&spec.name).await?;
        let next = versions
            .iter()
            .filter_map(|v| v.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let version = next.to_string();
        Ok(RegisteredModel {
            name: spec.name.clone(),
            version: version.clone(),
            id: format!(
                "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.MachineLearningServices/workspaces/ws/models/{}/versions/{}",
                spec.name, version
            ),
        })
    }

    async fn model_exists(&self, _name: &str) -> Result<bool> {
        Ok(!self.versions.is_empty())
    }

    async fn list_versions(&self, _name: &str) -> Result<Vec<String>> {
        Ok(self.versions.clone())
    }
}

fn spec(name: &str, type_string: &str) -> ModelSpec {
    ModelSpec {
        name: name.to_string(),
        path: PathBuf::from("/mnt/outputs/model"),
        asset_type: AssetType::from_string(type_string),
        description: None,
        tags: HashMap::new(),
    }
}

#[tokio::test]
async fn registration_writes_details_file() {
    let registry = StaticRegistry {
        versions: vec!["1".into(), "2".into()],
    };
    let out_dir = TempDir::new().unwrap();

    let record = register_and_record(&registry, &spec("m", "mlflow_model"), "mlflow_model", out_dir.path())
        .await
        .unwrap();
    assert_eq!(record.version, "3");

    let contents =
        std::fs::read_to_string(out_dir.path().join(REGISTRATION_DETAILS_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();

    assert_eq!(json["name"], "m");
    assert_eq!(json["version"], "3");
    assert_eq!(
        json["id"],
        "/subscriptions/sub/resourceGroups/rg/providers/Microsoft.MachineLearningServices/workspaces/ws/models/m/versions/3"
    );
    assert_eq!(json["type"], "mlflow_model");
    assert_eq!(json.as_object().unwrap().len(), 4);
}

#[tokio::test]
async fn first_registration_gets_version_one() {
    let registry = StaticRegistry { versions: vec![] };
    let out_dir = TempDir::new().unwrap();

    let record = register_and_record(&registry, &spec("fresh", "custom_model"), "custom_model", out_dir.path())
        .await
        .unwrap();
    assert_eq!(record.version, "1");
}

#[tokio::test]
async fn output_directory_is_created_and_reusable() {
    let registry = StaticRegistry { versions: vec![] };
    let base = TempDir::new().unwrap();
    let out_dir = base.path().join("does").join("not").join("exist");

    register_and_record(&registry, &spec("m", "custom_model"), "custom_model", &out_dir)
        .await
        .unwrap();
    assert!(out_dir.join(REGISTRATION_DETAILS_FILE).exists());

    // Re-running against the now-existing directory overwrites the record
    register_and_record(&registry, &spec("m", "custom_model"), "custom_model", &out_dir)
        .await
        .unwrap();
    assert!(out_dir.join(REGISTRATION_DETAILS_FILE).exists());
}

#[tokio::test]
async fn unknown_type_is_recorded_as_requested_but_registered_as_custom() {
    let registry = StaticRegistry { versions: vec![] };
    let out_dir = TempDir::new().unwrap();

    // The wire call uses the custom_model fallback, the record echoes the request
    let request = spec("m", "sklearn");
    assert_eq!(request.asset_type, AssetType::CustomModel);

    register_and_record(&registry, &request, "sklearn", out_dir.path())
        .await
        .unwrap();

    let contents =
        std::fs::read_to_string(out_dir.path().join(REGISTRATION_DETAILS_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&contents).unwrap();
    assert_eq!(json["type"], "sklearn");
}
