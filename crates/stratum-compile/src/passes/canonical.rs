//! Basis canonicalization passes.

use tracing::debug;

use crate::error::CompileResult;
use crate::layer_circuit::LayerCircuit;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Rewrite every non-Z reset, measurement and two-qubit layer as its Z-basis
/// form between a rotation and the inverse rotation.
pub struct ZBasisCanonicalization;

impl Pass for ZBasisCanonicalization {
    fn name(&self) -> &'static str {
        "z_basis_canonicalization"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: LayerCircuit,
        _properties: &mut PropertySet,
    ) -> CompileResult<LayerCircuit> {
        Ok(circuit.to_z_basis())
    }
}

/// Move the final rotation of each loop body to the start of the body so it
/// can merge with the rotations around the loop.
pub struct RollLoopRotations;

impl Pass for RollLoopRotations {
    fn name(&self) -> &'static str {
        "roll_loop_rotations"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: LayerCircuit,
        _properties: &mut PropertySet,
    ) -> CompileResult<LayerCircuit> {
        let before = circuit.len();
        let rolled = circuit.with_rolled_loop_rotations();
        debug!("Rolled loop rotations: {} -> {} layers", before, rolled.len());
        Ok(rolled)
    }
}
