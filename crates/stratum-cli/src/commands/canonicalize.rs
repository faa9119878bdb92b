//! Canonicalize command implementation.

use anyhow::Result;
use console::style;
use tracing::info;

use stratum_compile::{canonicalize_with_config, LayerCensus, PipelineConfig};

use super::common::{load_circuit, load_config, write_circuit};

/// Execute the canonicalize command.
pub fn execute(
    input: &str,
    output: Option<&str>,
    partial: bool,
    config: Option<&str>,
) -> Result<()> {
    let mut pipeline = match config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };
    if partial {
        pipeline.whole_circuit = false;
    }

    let circuit = load_circuit(input)?;
    info!(
        "Loaded {}: {} qubits, {} ticks",
        input,
        circuit.num_qubits(),
        circuit.num_ticks()
    );

    let (canonical, properties) = canonicalize_with_config(&circuit, &pipeline)?;

    if let Some(census) = properties.get::<LayerCensus>() {
        info!("Canonical form has {} layers", census.total());
    }

    write_circuit(&canonical, output)?;

    if let Some(path) = output {
        eprintln!(
            "{} Canonicalized {} -> {} ({} -> {} ticks)",
            style("✓").green().bold(),
            style(input).green(),
            style(path).green(),
            circuit.num_ticks(),
            canonical.num_ticks()
        );
    }

    Ok(())
}
