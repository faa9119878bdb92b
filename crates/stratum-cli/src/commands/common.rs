//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use stratum_compile::PipelineConfig;
use stratum_ir::Circuit;
use stratum_stim::{emit, parse};

/// Load a circuit from a text file.
pub fn load_circuit(path: &str) -> Result<Circuit> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))?;

    parse(&source).with_context(|| format!("Failed to parse {path}"))
}

/// Write a circuit to `output`, or to stdout when no path is given.
///
/// Nothing is written unless the whole circuit was produced.
pub fn write_circuit(circuit: &Circuit, output: Option<&str>) -> Result<()> {
    let text = emit(circuit);
    match output {
        Some(path) => {
            fs::write(path, text).with_context(|| format!("Failed to write file: {path}"))?;
        }
        None => print!("{text}"),
    }
    Ok(())
}

/// Load a pipeline configuration, choosing the format by extension.
pub fn load_config(path: &str) -> Result<PipelineConfig> {
    let source =
        fs::read_to_string(path).with_context(|| format!("Failed to read config: {path}"))?;

    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");

    let config: PipelineConfig = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&source)
            .with_context(|| format!("Invalid JSON config: {path}"))?,
        "yaml" | "yml" => serde_yaml_ng::from_str(&source)
            .with_context(|| format!("Invalid YAML config: {path}"))?,
        other => anyhow::bail!("Unknown config format '{other}'. Use .yaml, .yml or .json"),
    };

    config
        .validate()
        .with_context(|| format!("Invalid config: {path}"))?;
    Ok(config)
}
