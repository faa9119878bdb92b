//! Pass manager for orchestrating canonicalization.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{CompileError, CompileResult};
use crate::layer_circuit::LayerCircuit;
use crate::pass::Pass;
use crate::passes::optimization::MAX_LOCAL_ROUNDS;
use crate::passes::{
    CanonicalVocabularyVerification, HoistQubitCoords, LocalOptimization, MergeRotationsEarlier,
    RemoveIrrelevantTail, RemoveRotationsBeforeResets, RemoveVacuousRotations, RollLoopRotations,
    ZBasisCanonicalization,
};
use crate::property::PropertySet;

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit, properties))]
    pub fn run(
        &self,
        circuit: LayerCircuit,
        properties: &mut PropertySet,
    ) -> CompileResult<LayerCircuit> {
        info!(
            "Running pass manager with {} passes on circuit with {} layers",
            self.passes.len(),
            circuit.len()
        );

        let mut circuit = circuit;
        for pass in &self.passes {
            if pass.should_run(&circuit, properties) {
                debug!("Running pass: {}", pass.name());
                circuit = pass.run(circuit, properties)?;
                debug!("Pass {} completed, layers: {}", pass.name(), circuit.len());
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, layers: {} ({} including loop bodies)",
            circuit.len(),
            circuit.num_layers_recursive()
        );

        Ok(circuit)
    }

    /// Names of the passes, in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Switches for the optional stages of the canonicalization pipeline.
///
/// Basis canonicalization and the first local optimization sweep always run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Treat the input as a complete circuit, allowing the layers after the
    /// last measurement to be dropped.
    pub whole_circuit: bool,
    /// Move top-level `QUBIT_COORDS` to the start.
    pub hoist_qubit_coords: bool,
    /// Roll the final rotation of loop bodies out of the loop.
    pub roll_loop_rotations: bool,
    /// Merge rotation layers into earlier rotation layers.
    pub merge_rotations_earlier: bool,
    /// Drop rotations on qubits that are reset next.
    pub remove_rotations_before_resets: bool,
    /// Check the output vocabulary and record a layer census.
    pub verify_vocabulary: bool,
    /// Maximum sweeps of the local optimization after canonicalization.
    pub final_optimization_rounds: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            whole_circuit: true,
            hoist_qubit_coords: true,
            roll_loop_rotations: true,
            merge_rotations_earlier: true,
            remove_rotations_before_resets: true,
            verify_vocabulary: true,
            final_optimization_rounds: 1,
        }
    }
}

impl PipelineConfig {
    /// Check value ranges.
    pub fn validate(&self) -> CompileResult<()> {
        if !(1..=MAX_LOCAL_ROUNDS).contains(&self.final_optimization_rounds) {
            return Err(CompileError::InvalidConfiguration(format!(
                "final_optimization_rounds must be between 1 and {MAX_LOCAL_ROUNDS}, got {}",
                self.final_optimization_rounds
            )));
        }
        Ok(())
    }
}

/// Builder assembling the canonicalization pipeline.
pub struct PassManagerBuilder {
    config: PipelineConfig,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set whether the input is a complete circuit.
    #[must_use]
    pub fn with_whole_circuit(mut self, whole_circuit: bool) -> Self {
        self.config.whole_circuit = whole_circuit;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> CompileResult<(PassManager, PropertySet)> {
        let config = self.config;
        config.validate()?;

        let mut pm = PassManager::new();

        if config.hoist_qubit_coords {
            pm.add_pass(HoistQubitCoords);
        }
        pm.add_pass(LocalOptimization::new());
        pm.add_pass(ZBasisCanonicalization);
        if config.roll_loop_rotations {
            pm.add_pass(RollLoopRotations);
        }
        pm.add_pass(LocalOptimization::with_rounds(
            config.final_optimization_rounds,
        ));
        pm.add_pass(RemoveVacuousRotations);
        if config.merge_rotations_earlier {
            pm.add_pass(MergeRotationsEarlier);
        }
        if config.remove_rotations_before_resets {
            pm.add_pass(RemoveRotationsBeforeResets);
        }
        // Skipped at run time for fragments.
        pm.add_pass(RemoveIrrelevantTail);

        if config.verify_vocabulary {
            pm.add_pass(CanonicalVocabularyVerification);
        }

        let properties = PropertySet::new().with_whole_circuit(config.whole_circuit);
        Ok((pm, properties))
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
