//! Flip command implementation.

use anyhow::Result;
use console::style;

use stratum_compile::xz_flip;

use super::common::{load_circuit, write_circuit};

/// Execute the flip command.
pub fn execute(input: &str, output: Option<&str>) -> Result<()> {
    let circuit = load_circuit(input)?;
    let flipped = xz_flip(&circuit)?;
    write_circuit(&flipped, output)?;

    if let Some(path) = output {
        eprintln!(
            "{} Flipped {} -> {}",
            style("✓").green().bold(),
            style(input).green(),
            style(path).green()
        );
    }

    Ok(())
}
