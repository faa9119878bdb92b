//! Stats command implementation.

use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use tracing::debug;

use stratum_compile::LayerCircuit;
use stratum_ir::Circuit;

use super::common::load_circuit;

/// Summary numbers for one circuit.
#[derive(Debug, Serialize)]
pub struct CircuitStats {
    pub qubits: usize,
    pub ticks: u64,
    pub instructions: usize,
    pub measurements: u64,
    /// `None` when the circuit uses instructions with no layer form.
    pub layers: Option<usize>,
}

impl CircuitStats {
    pub fn of(circuit: &Circuit) -> Self {
        let layers = match LayerCircuit::from_circuit(circuit) {
            Ok(layered) => Some(layered.num_layers_recursive()),
            Err(e) => {
                debug!("Layer count unavailable: {e}");
                None
            }
        };
        Self {
            qubits: circuit.num_qubits(),
            ticks: circuit.num_ticks(),
            instructions: circuit.num_instructions(),
            measurements: circuit.num_measurements(),
            layers,
        }
    }
}

/// Execute the stats command.
pub fn execute(input: &str, format: &str) -> Result<()> {
    let circuit = load_circuit(input)?;
    let stats = CircuitStats::of(&circuit);

    match format {
        "json" => {
            let json =
                serde_json::to_string_pretty(&stats).context("JSON serialization failed")?;
            println!("{json}");
        }
        "table" => {
            println!("{} {}", style("Circuit").cyan().bold(), style(input).green());
            println!("  Qubits:       {}", stats.qubits);
            println!("  Ticks:        {}", stats.ticks);
            println!("  Instructions: {}", stats.instructions);
            println!("  Measurements: {}", stats.measurements);
            match stats.layers {
                Some(n) => println!("  Layers:       {n}"),
                None => println!("  Layers:       {}", style("unsupported").yellow()),
            }
        }
        other => anyhow::bail!("Unknown format '{other}'. Available: table, json"),
    }

    Ok(())
}
