//! Command-line interface module.
//!
//! This module provides the CLI functionality for:
//! - Argument parsing for the registration component contract
//! - The registration handler

pub mod handlers;
pub mod options;

pub use handlers::handle_register;
pub use options::Cli;
