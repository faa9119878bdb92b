//! Rotation clean-up passes.

use crate::error::CompileResult;
use crate::layer_circuit::LayerCircuit;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Remove rotation layers that are the identity on every qubit.
pub struct RemoveVacuousRotations;

impl Pass for RemoveVacuousRotations {
    fn name(&self) -> &'static str {
        "remove_vacuous_rotations"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: LayerCircuit,
        _properties: &mut PropertySet,
    ) -> CompileResult<LayerCircuit> {
        Ok(circuit.without_vacuous_rotations())
    }
}

/// Slide rotation layers backwards over layers on other qubits and merge
/// them into earlier rotation layers.
pub struct MergeRotationsEarlier;

impl Pass for MergeRotationsEarlier {
    fn name(&self) -> &'static str {
        "merge_rotations_earlier"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: LayerCircuit,
        _properties: &mut PropertySet,
    ) -> CompileResult<LayerCircuit> {
        Ok(circuit.with_rotations_merged_earlier())
    }
}

/// Drop rotations on qubits that are reset before anything else reads them.
pub struct RemoveRotationsBeforeResets;

impl Pass for RemoveRotationsBeforeResets {
    fn name(&self) -> &'static str {
        "remove_rotations_before_resets"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: LayerCircuit,
        _properties: &mut PropertySet,
    ) -> CompileResult<LayerCircuit> {
        Ok(circuit.with_rotations_before_resets_removed())
    }
}
