//! Generate config command

use std::path::Path;

use colored::Colorize;

use crate::config::StaticConfig;
use crate::errors::{Result, TinylinkError};

pub const DEFAULT_SAMPLE_PATH: &str = "config.example.toml";

/// Generate example configuration file from the built-in defaults
pub fn config_generate(output_path: Option<String>, force: bool) -> Result<String> {
    let path = output_path.unwrap_or_else(|| DEFAULT_SAMPLE_PATH.to_string());

    if !force && Path::new(&path).exists() {
        return Err(TinylinkError::file_operation(format!(
            "File already exists: {} (use --force to overwrite)",
            path
        )));
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default().save_to_file(&path)?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    println!(
        "  {}",
        "Environment variables (TINYLINK__SECTION__KEY) override file values".dimmed()
    );
    Ok(path)
}
