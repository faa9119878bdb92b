//! Qubit coordinate hoisting.

use crate::error::CompileResult;
use crate::layer_circuit::LayerCircuit;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Collect top-level `QUBIT_COORDS` into one layer at the start of the
/// circuit, folding in the `SHIFT_COORDS` offset in effect where each was
/// declared.
pub struct HoistQubitCoords;

impl Pass for HoistQubitCoords {
    fn name(&self) -> &'static str {
        "hoist_qubit_coords"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(
        &self,
        circuit: LayerCircuit,
        _properties: &mut PropertySet,
    ) -> CompileResult<LayerCircuit> {
        Ok(circuit.with_qubit_coords_at_start())
    }
}
