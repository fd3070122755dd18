//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for photopack using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// photopack - Construction photo delivery package engine
#[derive(Parser, Debug)]
#[command(name = "photopack")]
#[command(version, about, long_about = None)]
#[command(author = "photopack Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "photopack.toml", env = "PHOTOPACK_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "PHOTOPACK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export a project as a delivery package
    Export(commands::export::ExportArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Check an expanded delivery package offline
    Verify(commands::verify::VerifyArgs),

    /// Show persisted export job status
    Status(commands::status::StatusArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
