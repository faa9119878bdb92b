//! Pass trait and types for compilation passes.

use crate::error::CompileResult;
use crate::layer_circuit::LayerCircuit;
use crate::property::PropertySet;

/// The kind of compilation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Analysis pass that reads the circuit and writes properties.
    Analysis,
    /// Transformation pass that rewrites the circuit.
    Transformation,
}

/// A compilation pass over a layered circuit.
///
/// A pass takes the circuit by value and returns the circuit the next pass
/// sees. Analysis passes hand their input back unchanged.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass.
    fn run(
        &self,
        circuit: LayerCircuit,
        properties: &mut PropertySet,
    ) -> CompileResult<LayerCircuit>;

    /// Check if this pass should run based on current state.
    ///
    /// This can be overridden to skip passes that are not needed.
    fn should_run(&self, _circuit: &LayerCircuit, _properties: &PropertySet) -> bool {
        true
    }
}
