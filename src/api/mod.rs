//! Model registry client surface

pub mod azureml;
pub mod registry;

pub use azureml::AzureMlClient;
pub use registry::{
    AssetType, ModelRegistry, ModelSpec, RegisteredModel, RegistrationRecord, RegistryError,
};
