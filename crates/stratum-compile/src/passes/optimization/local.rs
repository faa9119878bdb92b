//! Pairwise layer rewriting and tail trimming.

use tracing::debug;

use crate::error::CompileResult;
use crate::layer_circuit::LayerCircuit;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Local optimization sweep.
///
/// Each round walks the layers left to right, rewriting every layer against
/// the one before it: rotations compose, disjoint same-kind layers merge,
/// swaps cancel or fuse with interactions, and rotations commute past
/// feedback, annotations and unrelated measurements. Loop bodies are swept
/// recursively. Rounds stop early once a sweep changes nothing.
pub struct LocalOptimization {
    rounds: u32,
}

impl LocalOptimization {
    /// Create a single-round sweep.
    pub fn new() -> Self {
        Self { rounds: 1 }
    }

    /// Create a pass running up to `rounds` sweeps (at least one).
    pub fn with_rounds(rounds: u32) -> Self {
        Self {
            rounds: rounds.max(1),
        }
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }
}

impl Default for LocalOptimization {
    fn default() -> Self {
        Self::new()
    }
}

impl Pass for LocalOptimization {
    fn name(&self) -> &'static str {
        "local_optimization"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: LayerCircuit,
        _properties: &mut PropertySet,
    ) -> CompileResult<LayerCircuit> {
        let mut current = circuit;
        for round in 1..=self.rounds {
            let before = current.len();
            let next = current.clone().with_locally_optimized_layers();
            let settled = next == current;
            debug!("Local optimization round {}: {} -> {} layers", round, before, next.len());
            current = next;
            if settled {
                break;
            }
        }
        Ok(current)
    }
}

/// Drop trailing layers after the last measurement. Only valid for whole
/// circuits, since a fragment's tail may feed measurements appended later.
pub struct RemoveIrrelevantTail;

impl Pass for RemoveIrrelevantTail {
    fn name(&self) -> &'static str {
        "remove_irrelevant_tail"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: LayerCircuit,
        _properties: &mut PropertySet,
    ) -> CompileResult<LayerCircuit> {
        Ok(circuit.with_irrelevant_tail_layers_removed())
    }

    fn should_run(&self, _circuit: &LayerCircuit, properties: &PropertySet) -> bool {
        properties.whole_circuit
    }
}
