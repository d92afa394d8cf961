pub mod api;
pub mod auth;
pub mod cli;
pub mod config;

// Re-export commonly used types
pub use api::azureml::AzureMlClient;
pub use api::registry::{AssetType, ModelRegistry, ModelSpec, RegisteredModel, RegistrationRecord};
pub use config::{RegistryConfig, WorkspaceConfig};
