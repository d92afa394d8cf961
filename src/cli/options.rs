use clap::Parser;
use std::path::PathBuf;

/// Register a trained model into the workspace model registry.
///
/// Flag names keep the underscore form of the pipeline component contract.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Name for the registered model
    #[arg(long = "model_name")]
    pub model_name: String,

    /// Path to the model folder (mounted job output or azureml:// URI)
    #[arg(long = "model_path")]
    pub model_path: PathBuf,

    /// Type of model (custom_model, mlflow_model, triton_model)
    #[arg(long = "model_type", default_value = "custom_model")]
    pub model_type: String,

    /// Output folder for registration details
    #[arg(long = "registration_details")]
    pub registration_details: PathBuf,

    /// Description attached to the registered version
    #[arg(long)]
    pub description: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Tracing filter directives (e.g. "mlregistrar_core=debug")
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl Cli {
    /// Default log level implied by the verbosity flags
    pub fn effective_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
