use anyhow::{Context, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::{
    api::azureml::AzureMlClient,
    api::registry::{AssetType, ModelRegistry, ModelSpec, RegistrationRecord},
    auth::ArmCredential,
    cli::options::Cli,
    config::{RegistryConfig, WorkspaceConfig},
};

/// File name downstream pipeline steps read the registration identity from
pub const REGISTRATION_DETAILS_FILE: &str = "registration_details.json";

/// Register the model described by the CLI arguments and write the details file
pub async fn handle_register(args: &Cli) -> Result<()> {
    println!("📦 Registering model: {}", args.model_name);
    println!("📁 Model path: {}", args.model_path.display());
    println!("🏷️  Model type: {}", args.model_type);

    let workspace = WorkspaceConfig::from_env()?;
    println!("🔗 Connecting to workspace: {}", workspace.workspace_name);
    println!("   Resource group: {}", workspace.resource_group);
    println!("   Subscription: {}", workspace.subscription_id);

    let token = ArmCredential::new()
        .resolve()
        .await
        .context("Failed to resolve ARM credentials")?;
    let client = AzureMlClient::new(RegistryConfig::from_env(), workspace, &token)?;

    let spec = build_spec(args);
    if client.model_exists(&spec.name).await? {
        println!("ℹ️  Model already registered; adding a new version");
    }

    let record = register_and_record(
        &client,
        &spec,
        &args.model_type,
        &args.registration_details,
    )
    .await?;

    println!("✅ Model registered successfully!");
    println!("   Model name: {}", record.name);
    println!("   Model version: {}", record.version);
    println!("   Model ID: {}", record.id);
    println!(
        "💾 Registration details saved to: {}",
        args.registration_details
            .join(REGISTRATION_DETAILS_FILE)
            .display()
    );

    Ok(())
}

/// Build the registration request from the CLI arguments
pub fn build_spec(args: &Cli) -> ModelSpec {
    let mut tags = HashMap::new();
    tags.insert("registeredAt".to_string(), Utc::now().to_rfc3339());

    ModelSpec {
        name: args.model_name.clone(),
        path: args.model_path.clone(),
        asset_type: AssetType::from_string(&args.model_type),
        description: Some(
            args.description
                .clone()
                .unwrap_or_else(|| "Model registered via registration component".to_string()),
        ),
        tags,
    }
}

/// Register through any registry implementation and persist the details record
pub async fn register_and_record(
    registry: &dyn ModelRegistry,
    spec: &ModelSpec,
    requested_type: &str,
    output_dir: &Path,
) -> Result<RegistrationRecord> {
    let registered = registry
        .create_or_update(spec)
        .await
        .with_context(|| format!("Failed to register model '{}'", spec.name))?;

    info!(
        name = %registered.name,
        version = %registered.version,
        "Registration accepted by registry"
    );

    let record = RegistrationRecord::new(&registered, requested_type);
    write_registration_details(&record, output_dir).await?;
    Ok(record)
}

/// Write the registration record as pretty JSON, creating the directory first
pub async fn write_registration_details(
    record: &RegistrationRecord,
    output_dir: &Path,
) -> Result<PathBuf> {
    tokio::fs::create_dir_all(output_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create output directory {}",
                output_dir.display()
            )
        })?;

    let path = output_dir.join(REGISTRATION_DETAILS_FILE);
    let json = serde_json::to_string_pretty(record)
        .context("Failed to serialize registration record")?;
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;

    Ok(path)
}
