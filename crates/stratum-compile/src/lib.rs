//! Stratum Canonicalization Framework
//!
//! This crate rewrites stabilizer circuits into a canonical form: every
//! reset, measurement and two-qubit interaction acts in the Z basis, all
//! basis changes are carried by single-qubit rotation layers, and operations
//! are packed into as few timing layers as the circuit allows.
//!
//! # Overview
//!
//! A flat [`Circuit`](stratum_ir::Circuit) is grouped into a [`LayerCircuit`]:
//! a sequence of [`Layer`]s, each holding same-kind operations that share a
//! timing slot, with `REPEAT` blocks kept as nested [`LoopLayer`]s. Passes
//! then rewrite the layers:
//! 1. **Coordinates**: hoist `QUBIT_COORDS` to the start
//! 2. **Local optimization**: merge, cancel and commute adjacent layers
//! 3. **Canonicalization**: conjugate non-Z layers by basis rotations
//! 4. **Loop rolling**: move rotations across loop boundaries
//! 5. **Rotation clean-up**: merge rotations earlier, drop those before resets
//! 6. **Tail removal**: drop what follows the last measurement
//!
//! # Architecture
//!
//! ```text
//! Circuit
//!       │
//!       ▼
//! LayerCircuit::from_circuit
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (whole circuit?, analysis results)
//! └─────────────┘
//!       │
//!       ├── HoistQubitCoords
//!       ├── LocalOptimization
//!       ├── ZBasisCanonicalization / RollLoopRotations
//!       ├── RemoveVacuousRotations / MergeRotationsEarlier
//!       ├── RemoveRotationsBeforeResets / RemoveIrrelevantTail
//!       └── CanonicalVocabularyVerification
//!       │
//!       ▼
//! LayerCircuit::to_circuit
//! ```
//!
//! # Example
//!
//! ```rust
//! use stratum_compile::canonicalize;
//! use stratum_stim::{emit, parse};
//!
//! let circuit = parse("MX 0\n").unwrap();
//! let canonical = canonicalize(&circuit, true).unwrap();
//!
//! // The trailing basis change cannot affect any measurement.
//! assert_eq!(emit(&canonical), "H 0\nTICK\nM 0\n");
//! ```
//!
//! # Custom Passes
//!
//! ```rust
//! use stratum_compile::{CompileResult, LayerCircuit, Pass, PassKind, PropertySet};
//!
//! struct CountLayers;
//!
//! impl Pass for CountLayers {
//!     fn name(&self) -> &str { "count_layers" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, circuit: LayerCircuit, props: &mut PropertySet) -> CompileResult<LayerCircuit> {
//!         props.insert(circuit.len());
//!         Ok(circuit)
//!     }
//! }
//! ```

pub mod error;
pub mod layer_circuit;
pub mod layers;
pub mod manager;
pub mod pass;
pub mod property;
pub mod rotation;
pub mod xz_flip;

// Built-in passes
pub mod passes;

use tracing::{debug, instrument, warn};

use stratum_ir::{Circuit, Operation};

pub use error::{CompileError, CompileResult};
pub use layer_circuit::LayerCircuit;
pub use layers::{Layer, LoopLayer, RotationLayer};
pub use manager::{PassManager, PassManagerBuilder, PipelineConfig};
pub use pass::{Pass, PassKind};
pub use passes::LayerCensus;
pub use property::PropertySet;
pub use rotation::Rotation;
pub use xz_flip::xz_flip;

/// Canonicalize a circuit with the default pipeline.
///
/// `whole_circuit` allows layers after the last measurement to be removed;
/// pass `false` for fragments that other circuits will be appended to.
pub fn canonicalize(circuit: &Circuit, whole_circuit: bool) -> CompileResult<Circuit> {
    let config = PipelineConfig {
        whole_circuit,
        ..PipelineConfig::default()
    };
    canonicalize_with_config(circuit, &config).map(|(out, _)| out)
}

/// Upper bound on pipeline runs while waiting for the output to settle.
const MAX_PIPELINE_RUNS: usize = 8;

/// Canonicalize a circuit, returning the output together with the properties
/// recorded by the analysis passes.
///
/// The pipeline is re-run on its own output until the output stops changing,
/// so canonicalizing twice equals canonicalizing once. Should two outputs keep
/// turning into each other, the one with the fewest instructions is kept.
#[instrument(skip(circuit))]
pub fn canonicalize_with_config(
    circuit: &Circuit,
    config: &PipelineConfig,
) -> CompileResult<(Circuit, PropertySet)> {
    let (pm, properties) = PassManagerBuilder::new()
        .with_config(config.clone())
        .build()?;
    let run = |input: &Circuit, mut props: PropertySet| -> CompileResult<(Circuit, PropertySet)> {
        let layers = pm.run(LayerCircuit::from_circuit(input)?, &mut props)?;
        Ok((layers.to_circuit()?, props))
    };
    let fresh = || PropertySet::new().with_whole_circuit(config.whole_circuit);

    let mut outputs = vec![run(circuit, properties)?];
    loop {
        let previous = &outputs[outputs.len() - 1].0;
        let next = run(previous, fresh())?;
        if let Some(start) = outputs.iter().position(|(c, _)| *c == next.0) {
            let cycle = outputs.split_off(start);
            if cycle.len() > 1 {
                debug!("Pipeline output alternates between {} forms", cycle.len());
            }
            return Ok(cycle.into_iter().fold(next, |best, candidate| {
                if settle_key(&candidate.0) < settle_key(&best.0) {
                    candidate
                } else {
                    best
                }
            }));
        }
        if outputs.len() == MAX_PIPELINE_RUNS {
            warn!("Pipeline output still changing after {MAX_PIPELINE_RUNS} runs");
            return Ok(next);
        }
        outputs.push(next);
    }
}

/// Total order on outputs: size first, then instruction text.
fn settle_key(circuit: &Circuit) -> (usize, Vec<String>) {
    fn listing(circuit: &Circuit, lines: &mut Vec<String>) {
        for operation in circuit {
            match operation {
                Operation::Instruction(inst) => lines.push(inst.to_string()),
                Operation::Repeat(block) => {
                    lines.push(format!("REPEAT {} {{", block.repetitions));
                    listing(&block.body, lines);
                    lines.push(String::from("}"));
                }
            }
        }
    }
    let mut lines = Vec::new();
    listing(circuit, &mut lines);
    (circuit.num_instructions(), lines)
}
