use stratum_ir::{Circuit, Instruction};

use super::Layer;
use crate::error::CompileResult;
use crate::layer_circuit::LayerCircuit;

/// A `REPEAT` block whose body is itself a layer circuit.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopLayer {
    pub body: LayerCircuit,
    pub repetitions: u64,
}

impl LoopLayer {
    pub fn new(body: LayerCircuit, repetitions: u64) -> Self {
        Self { body, repetitions }
    }

    /// Optimize the body and simplify degenerate loops.
    ///
    /// A loop that never runs or has an empty body disappears. A single
    /// repetition is inlined. A body consisting of one rotation layer becomes
    /// that rotation raised to the repetition count.
    pub fn optimized(self) -> Vec<Layer> {
        let body = self.body.with_locally_optimized_layers();
        if self.repetitions == 0 || body.is_empty() {
            return vec![];
        }
        if self.repetitions == 1 {
            return body.layers;
        }
        if let [Layer::Rotation(r)] = body.layers.as_slice() {
            return Layer::rotation_or_nothing(r.pow(self.repetitions));
        }
        vec![Layer::Loop(LoopLayer::new(body, self.repetitions))]
    }

    #[must_use]
    pub fn to_z_basis(self) -> LoopLayer {
        LoopLayer::new(self.body.to_z_basis(), self.repetitions)
    }

    /// Emit the body as a `REPEAT` block, closing it with a `TICK` when the
    /// body's last timing layer is still open.
    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        let mut body = self.body.to_circuit()?;
        if self.body.ends_with_pending_tick() {
            body.append(Instruction::tick())?;
        }
        out.append_repeat(self.repetitions, body);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::RotationLayer;
    use crate::rotation::Rotation;
    use stratum_ir::QubitId;
    use stratum_stim::emit;

    fn rotation_body(r: Rotation) -> LayerCircuit {
        LayerCircuit::from_layers([Layer::Rotation(RotationLayer::from_iter([(QubitId(0), r)]))])
    }

    #[test]
    fn test_degenerate_loops() {
        assert!(LoopLayer::new(rotation_body(Rotation::H), 0).optimized().is_empty());
        assert!(LoopLayer::new(LayerCircuit::default(), 7).optimized().is_empty());
        assert_eq!(
            LoopLayer::new(rotation_body(Rotation::H), 1).optimized(),
            rotation_body(Rotation::H).layers
        );
    }

    #[test]
    fn test_rotation_body_is_raised_to_power() {
        assert_eq!(
            LoopLayer::new(rotation_body(Rotation::H), 5).optimized(),
            rotation_body(Rotation::H).layers
        );
        assert!(LoopLayer::new(rotation_body(Rotation::H), 4).optimized().is_empty());
        assert!(LoopLayer::new(rotation_body(Rotation::C_XYZ), 3).optimized().is_empty());
    }

    #[test]
    fn test_emission_closes_body_with_tick() {
        let lp = LoopLayer::new(rotation_body(Rotation::H), 3);
        let mut out = Circuit::new();
        lp.append_into(&mut out).unwrap();
        assert_eq!(emit(&out), "REPEAT 3 {\n    H 0\n    TICK\n}\n");
    }

    #[test]
    fn test_body_ending_in_loop_is_not_closed_again() {
        let inner = LoopLayer::new(rotation_body(Rotation::H), 3);
        let outer = LoopLayer::new(LayerCircuit::from_layers([Layer::Loop(inner)]), 2);
        assert!(!outer.body.ends_with_pending_tick());

        let mut out = Circuit::new();
        outer.append_into(&mut out).unwrap();
        assert_eq!(
            emit(&out),
            "REPEAT 2 {\n    REPEAT 3 {\n        H 0\n        TICK\n    }\n}\n"
        );
    }
}
