//! Timing-layer representation.
//!
//! A [`Layer`] is a group of same-kind operations that can be scheduled in one
//! timing slot. Each kind knows which qubits it touches, how it is written
//! back to a flat [`Circuit`], how it decomposes into a Z-basis form, and how
//! it combines with the layer that follows it.

mod annotation;
mod feedback;
mod interact;
mod loop_layer;
mod measure;
mod mpp;
mod reset;
mod rotation;
mod sqrt_pp;
mod swap;

pub(crate) use annotation::add_shift;
pub use annotation::{DetObsAnnotationLayer, QubitCoordAnnotationLayer, ShiftCoordAnnotationLayer};
pub use feedback::{FeedbackEntry, FeedbackLayer};
pub use interact::{InteractLayer, InteractPair, InteractSwapLayer};
pub use loop_layer::LoopLayer;
pub use measure::{MeasureLayer, MeasureTarget};
pub use mpp::MppLayer;
pub use reset::ResetLayer;
pub use rotation::RotationLayer;
pub use sqrt_pp::{SqrtPauliPair, SqrtPauliProductLayer};
pub use swap::{ISwapLayer, SwapLayer};

use rustc_hash::FxHashSet;
use stratum_ir::{Circuit, QubitId};

use crate::error::CompileResult;

/// One timing layer.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    /// Single-qubit resets.
    Reset(ResetLayer),
    /// Single-qubit measurements, in record order.
    Measure(MeasureLayer),
    /// Two-qubit controlled-Pauli interactions.
    Interact(InteractLayer),
    /// Interactions each followed by a swap of the same pair.
    InteractSwap(InteractSwapLayer),
    /// Swaps.
    Swap(SwapLayer),
    /// iSWAPs.
    ISwap(ISwapLayer),
    /// Square roots of two-qubit Pauli products.
    SqrtPauliProduct(SqrtPauliProductLayer),
    /// Classically controlled Paulis.
    Feedback(FeedbackLayer),
    /// Single-qubit Clifford rotations.
    Rotation(RotationLayer),
    /// Multi-qubit Pauli product measurements.
    Mpp(MppLayer),
    /// `DETECTOR` and `OBSERVABLE_INCLUDE` annotations.
    DetObsAnnotation(DetObsAnnotationLayer),
    /// `QUBIT_COORDS` annotations.
    QubitCoordAnnotation(QubitCoordAnnotationLayer),
    /// `SHIFT_COORDS` annotations.
    ShiftCoordAnnotation(ShiftCoordAnnotationLayer),
    /// A timing slot with nothing in it.
    Empty,
    /// A repeated sub-circuit.
    Loop(LoopLayer),
}

impl Layer {
    /// Short name of the layer kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Layer::Reset(_) => "reset",
            Layer::Measure(_) => "measure",
            Layer::Interact(_) => "interact",
            Layer::InteractSwap(_) => "interact_swap",
            Layer::Swap(_) => "swap",
            Layer::ISwap(_) => "iswap",
            Layer::SqrtPauliProduct(_) => "sqrt_pauli_product",
            Layer::Feedback(_) => "feedback",
            Layer::Rotation(_) => "rotation",
            Layer::Mpp(_) => "mpp",
            Layer::DetObsAnnotation(_) => "det_obs_annotation",
            Layer::QubitCoordAnnotation(_) => "qubit_coord_annotation",
            Layer::ShiftCoordAnnotation(_) => "shift_coord_annotation",
            Layer::Empty => "empty",
            Layer::Loop(_) => "loop",
        }
    }

    /// Qubits whose state this layer reads or changes.
    pub fn touched(&self) -> FxHashSet<QubitId> {
        match self {
            Layer::Reset(l) => l.touched(),
            Layer::Measure(l) => l.touched(),
            Layer::Interact(l) => l.touched(),
            Layer::InteractSwap(l) => l.touched(),
            Layer::Swap(l) => l.touched(),
            Layer::ISwap(l) => l.touched(),
            Layer::SqrtPauliProduct(l) => l.touched(),
            Layer::Feedback(l) => l.touched(),
            Layer::Rotation(l) => l.touched(),
            Layer::Mpp(l) => l.touched(),
            Layer::DetObsAnnotation(l) => l.touched(),
            Layer::QubitCoordAnnotation(l) => l.touched(),
            Layer::ShiftCoordAnnotation(_) | Layer::Empty => FxHashSet::default(),
            Layer::Loop(l) => l.body.touched(),
        }
    }

    /// Whether a `TICK` must separate this layer from a preceding layer that
    /// implies one.
    pub fn requires_tick_before(&self) -> bool {
        !self.is_annotation()
    }

    /// Whether a `TICK` must follow this layer before the next layer that
    /// requires one.
    pub fn implies_eventual_tick_after(&self) -> bool {
        !self.is_annotation() && !matches!(self, Layer::Loop(_))
    }

    /// Whether this layer only carries metadata.
    pub fn is_annotation(&self) -> bool {
        matches!(
            self,
            Layer::DetObsAnnotation(_)
                | Layer::QubitCoordAnnotation(_)
                | Layer::ShiftCoordAnnotation(_)
        )
    }

    /// Whether the layer has no effect at all.
    pub fn is_vacuous(&self) -> bool {
        match self {
            Layer::Reset(l) => l.targets.is_empty(),
            Layer::Measure(l) => l.targets.is_empty(),
            Layer::Interact(l) => l.pairs.is_empty(),
            Layer::InteractSwap(l) => l.pairs.is_empty(),
            Layer::Swap(l) => l.pairs.is_empty(),
            Layer::ISwap(l) => l.pairs.is_empty(),
            Layer::SqrtPauliProduct(l) => l.pairs.is_empty(),
            Layer::Feedback(l) => l.entries.is_empty(),
            Layer::Rotation(l) => l.is_vacuous(),
            Layer::Mpp(l) => l.targets.is_empty(),
            Layer::DetObsAnnotation(l) => l.instructions.is_empty(),
            Layer::QubitCoordAnnotation(l) => l.coords.is_empty(),
            Layer::ShiftCoordAnnotation(l) => l.is_vacuous(),
            Layer::Empty => true,
            Layer::Loop(l) => l.repetitions == 0 || l.body.is_empty(),
        }
    }

    /// Whether the layer is expressed in the canonical Z-basis vocabulary.
    pub fn is_canonical(&self) -> bool {
        match self {
            Layer::Reset(l) => l.is_z_basis(),
            Layer::Measure(l) => l.is_z_basis(),
            Layer::Interact(l) => l.is_z_basis(),
            Layer::InteractSwap(l) => l.is_z_basis(),
            Layer::SqrtPauliProduct(l) => l.is_z_basis(),
            Layer::Loop(l) => l.body.layers.iter().all(Layer::is_canonical),
            _ => true,
        }
    }

    /// Write the layer's instructions into a flat circuit, without ticks.
    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        match self {
            Layer::Reset(l) => l.append_into(out),
            Layer::Measure(l) => l.append_into(out),
            Layer::Interact(l) => l.append_into(out),
            Layer::InteractSwap(l) => l.append_into(out),
            Layer::Swap(l) => l.append_into(out),
            Layer::ISwap(l) => l.append_into(out),
            Layer::SqrtPauliProduct(l) => l.append_into(out),
            Layer::Feedback(l) => l.append_into(out),
            Layer::Rotation(l) => l.append_into(out),
            Layer::Mpp(l) => l.append_into(out),
            Layer::DetObsAnnotation(l) => l.append_into(out),
            Layer::QubitCoordAnnotation(l) => l.append_into(out),
            Layer::ShiftCoordAnnotation(l) => l.append_into(out),
            Layer::Empty => Ok(()),
            Layer::Loop(l) => l.append_into(out),
        }
    }

    /// Decompose into Z-basis operations conjugated by rotations.
    ///
    /// Returns `[pre_rotation, z_basis_layer, post_rotation]` for non-Z
    /// collapsing and two-qubit layers, the layer itself otherwise.
    pub fn to_z_basis(self) -> Vec<Layer> {
        match self {
            Layer::Reset(l) => l.to_z_basis(),
            Layer::Measure(l) => l.to_z_basis(),
            Layer::Interact(l) => l.to_z_basis(),
            Layer::InteractSwap(l) => l.to_z_basis(),
            Layer::SqrtPauliProduct(l) => l.to_z_basis(),
            Layer::Loop(l) => vec![Layer::Loop(l.to_z_basis())],
            other => vec![other],
        }
    }

    /// Try to fold `next` into this layer of the same kind.
    ///
    /// Returns `next` back when the layers cannot share a timing slot.
    pub fn absorb(&mut self, next: Layer) -> Option<Layer> {
        match (self, next) {
            (Layer::Reset(a), Layer::Reset(b)) => a.absorb(b).map(Layer::Reset),
            (Layer::Measure(a), Layer::Measure(b)) => a.absorb(b).map(Layer::Measure),
            (Layer::Interact(a), Layer::Interact(b)) => a.absorb(b).map(Layer::Interact),
            (Layer::InteractSwap(a), Layer::InteractSwap(b)) => {
                a.absorb(b).map(Layer::InteractSwap)
            }
            (Layer::Swap(a), Layer::Swap(b)) => a.absorb(b).map(Layer::Swap),
            (Layer::ISwap(a), Layer::ISwap(b)) => a.absorb(b).map(Layer::ISwap),
            (Layer::SqrtPauliProduct(a), Layer::SqrtPauliProduct(b)) => {
                a.absorb(b).map(Layer::SqrtPauliProduct)
            }
            (Layer::Feedback(a), Layer::Feedback(b)) => a.absorb(b).map(Layer::Feedback),
            (Layer::Rotation(a), Layer::Rotation(b)) => {
                *a = a.then(&b);
                None
            }
            (Layer::Mpp(a), Layer::Mpp(b)) => a.absorb(b).map(Layer::Mpp),
            (Layer::DetObsAnnotation(a), Layer::DetObsAnnotation(b)) => {
                a.instructions.extend(b.instructions);
                None
            }
            (Layer::QubitCoordAnnotation(a), Layer::QubitCoordAnnotation(b)) => {
                a.coords.extend(b.coords);
                None
            }
            (Layer::ShiftCoordAnnotation(a), Layer::ShiftCoordAnnotation(b)) => {
                a.add(&b.shift);
                None
            }
            (_, next) => Some(next),
        }
    }

    /// Rewrite this layer on its own (`next == None`) or together with the
    /// layer that follows it.
    ///
    /// Returns zero, one or two layers replacing the input.
    pub fn locally_optimized(self, next: Option<Layer>) -> Vec<Layer> {
        let Some(next) = next else {
            return self.self_optimized();
        };
        match (self, next) {
            (Layer::Rotation(r), Layer::Rotation(n)) => Layer::rotation_or_nothing(r.then(&n)),
            (Layer::Rotation(r), Layer::Reset(reset)) => {
                let mut out = Layer::rotation_or_nothing(r.without_qubits(reset.targets.keys()));
                out.push(Layer::Reset(reset));
                out
            }
            (Layer::Rotation(r), Layer::Feedback(f)) => {
                let moved = f.moved_before(&r);
                vec![Layer::Feedback(moved), Layer::Rotation(r)]
            }
            (Layer::Rotation(r), Layer::DetObsAnnotation(a))
                if r.touched().is_disjoint(&a.touched()) =>
            {
                vec![Layer::DetObsAnnotation(a), Layer::Rotation(r)]
            }
            (Layer::Rotation(r), Layer::ShiftCoordAnnotation(s)) => {
                vec![Layer::ShiftCoordAnnotation(s), Layer::Rotation(r)]
            }
            (Layer::Measure(m), Layer::Rotation(r)) if m.touched().is_disjoint(&r.touched()) => {
                vec![Layer::Rotation(r), Layer::Measure(m)]
            }
            (Layer::Interact(i), Layer::Swap(s)) => match i.fused_with_swap(&s) {
                Ok(fused) => vec![Layer::InteractSwap(fused)],
                Err(i) => vec![Layer::Interact(i), Layer::Swap(s)],
            },
            (Layer::Swap(s), Layer::Interact(i)) => match i.fused_after_swap(&s) {
                Ok(fused) => vec![Layer::InteractSwap(fused)],
                Err(i) => vec![Layer::Swap(s), Layer::Interact(i)],
            },
            (Layer::Swap(a), Layer::Swap(b)) => match a.combined_with(b) {
                Ok(combined) if combined.pairs.is_empty() => vec![],
                Ok(combined) => vec![Layer::Swap(combined)],
                Err((a, b)) => vec![Layer::Swap(a), Layer::Swap(b)],
            },
            (Layer::Loop(l), next) => vec![Layer::Loop(l), next],
            (mut prev, next) => match prev.absorb(next) {
                None => vec![prev],
                Some(next) => vec![prev, next],
            },
        }
    }

    fn self_optimized(self) -> Vec<Layer> {
        match self {
            Layer::Rotation(r) => Layer::rotation_or_nothing(r),
            Layer::Loop(l) => l.optimized(),
            other if other.is_vacuous() => vec![],
            other => vec![other],
        }
    }

    /// A rotation layer with identity entries removed, or nothing if vacuous.
    pub(crate) fn rotation_or_nothing(rotation: RotationLayer) -> Vec<Layer> {
        let rotation = rotation.without_identities();
        if rotation.is_vacuous() {
            vec![]
        } else {
            vec![Layer::Rotation(rotation)]
        }
    }

    /// Assemble `[pre, z_form, post]`, skipping vacuous rotations.
    pub(crate) fn conjugated(pre: RotationLayer, z_form: Layer, post: RotationLayer) -> Vec<Layer> {
        let mut out = Layer::rotation_or_nothing(pre);
        out.push(z_form);
        out.extend(Layer::rotation_or_nothing(post));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Rotation;
    use stratum_ir::{Basis, Target};

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    fn rot(entries: &[(u32, Rotation)]) -> Layer {
        Layer::Rotation(RotationLayer::from_iter(
            entries.iter().map(|&(i, r)| (q(i), r)),
        ))
    }

    #[test]
    fn test_tick_requirements() {
        assert!(Layer::Empty.requires_tick_before());
        assert!(Layer::Empty.implies_eventual_tick_after());
        let det = Layer::DetObsAnnotation(DetObsAnnotationLayer::default());
        assert!(!det.requires_tick_before());
        assert!(!det.implies_eventual_tick_after());
        let lp = Layer::Loop(LoopLayer::new(Default::default(), 2));
        assert!(lp.requires_tick_before());
        assert!(!lp.implies_eventual_tick_after());
    }

    #[test]
    fn test_rotations_compose() {
        let out = rot(&[(0, Rotation::H)]).locally_optimized(Some(rot(&[(0, Rotation::H_XY)])));
        assert_eq!(out, vec![rot(&[(0, Rotation::H.then(Rotation::H_XY))])]);

        let out = rot(&[(0, Rotation::H)]).locally_optimized(Some(rot(&[(0, Rotation::H)])));
        assert!(out.is_empty());
    }

    #[test]
    fn test_rotation_before_reset_is_dropped() {
        let reset = Layer::Reset(ResetLayer::from_iter([(q(0), Basis::Z)]));
        let out = rot(&[(0, Rotation::H), (1, Rotation::H)]).locally_optimized(Some(reset.clone()));
        assert_eq!(out, vec![rot(&[(1, Rotation::H)]), reset.clone()]);

        let out = rot(&[(0, Rotation::H)]).locally_optimized(Some(reset.clone()));
        assert_eq!(out, vec![reset]);
    }

    #[test]
    fn test_measurement_lets_disjoint_rotation_pass() {
        let m = Layer::Measure(MeasureLayer::from_iter([MeasureTarget::z(q(0))]));
        let out = m.clone().locally_optimized(Some(rot(&[(1, Rotation::H)])));
        assert_eq!(out, vec![rot(&[(1, Rotation::H)]), m.clone()]);

        let out = m.clone().locally_optimized(Some(rot(&[(0, Rotation::H)])));
        assert_eq!(out, vec![m, rot(&[(0, Rotation::H)])]);
    }

    #[test]
    fn test_rotation_commutes_past_feedback() {
        let fb = Layer::Feedback(FeedbackLayer::from_iter([FeedbackEntry {
            control: Target::record(1),
            qubit: q(0),
            basis: Basis::X,
        }]));
        let out = rot(&[(0, Rotation::H)]).locally_optimized(Some(fb));
        let expected_fb = Layer::Feedback(FeedbackLayer::from_iter([FeedbackEntry {
            control: Target::record(1),
            qubit: q(0),
            basis: Basis::Z,
        }]));
        assert_eq!(out, vec![expected_fb, rot(&[(0, Rotation::H)])]);
    }

    #[test]
    fn test_rotation_commutes_past_coord_shift() {
        let shift = Layer::ShiftCoordAnnotation(ShiftCoordAnnotationLayer {
            shift: vec![0.0, 1.0],
        });
        let out = rot(&[(0, Rotation::H)]).locally_optimized(Some(shift.clone()));
        assert_eq!(out, vec![shift, rot(&[(0, Rotation::H)])]);
    }

    #[test]
    fn test_observable_on_rotated_qubit_blocks_commute() {
        let obs = |qubit: u32| {
            Layer::DetObsAnnotation(DetObsAnnotationLayer {
                instructions: vec![
                    stratum_ir::Instruction::new(
                        stratum_ir::StandardGate::ObservableInclude,
                        [Target::pauli(Basis::X, qubit)],
                    )
                    .with_args([0.0]),
                ],
            })
        };

        let out = rot(&[(0, Rotation::H)]).locally_optimized(Some(obs(0)));
        assert_eq!(out, vec![rot(&[(0, Rotation::H)]), obs(0)]);

        let out = rot(&[(0, Rotation::H)]).locally_optimized(Some(obs(1)));
        assert_eq!(out, vec![obs(1), rot(&[(0, Rotation::H)])]);
    }

    #[test]
    fn test_swaps_cancel_and_merge() {
        let s01 = Layer::Swap(SwapLayer::from_iter([(q(0), q(1))]));
        let s10 = Layer::Swap(SwapLayer::from_iter([(q(1), q(0))]));
        let s23 = Layer::Swap(SwapLayer::from_iter([(q(2), q(3))]));
        let s12 = Layer::Swap(SwapLayer::from_iter([(q(1), q(2))]));

        assert!(s01.clone().locally_optimized(Some(s10)).is_empty());
        assert_eq!(
            s01.clone().locally_optimized(Some(s23)),
            vec![Layer::Swap(SwapLayer::from_iter([(q(0), q(1)), (q(2), q(3))]))]
        );
        assert_eq!(
            s01.clone().locally_optimized(Some(s12.clone())),
            vec![s01, s12]
        );
    }

    #[test]
    fn test_interact_then_swap_fuses() {
        let cx = Layer::Interact(InteractLayer::from_iter([InteractPair::new(
            q(0),
            Basis::Z,
            q(1),
            Basis::X,
        )]));
        let swap = Layer::Swap(SwapLayer::from_iter([(q(1), q(0))]));
        let out = cx.clone().locally_optimized(Some(swap.clone()));
        assert_eq!(
            out,
            vec![Layer::InteractSwap(InteractSwapLayer::from_iter([
                InteractPair::new(q(0), Basis::Z, q(1), Basis::X)
            ]))]
        );

        let out = swap.locally_optimized(Some(cx));
        assert_eq!(
            out,
            vec![Layer::InteractSwap(InteractSwapLayer::from_iter([
                InteractPair::new(q(1), Basis::Z, q(0), Basis::X)
            ]))]
        );
    }

    #[test]
    fn test_different_kinds_are_kept() {
        let reset = Layer::Reset(ResetLayer::from_iter([(q(0), Basis::Z)]));
        let m = Layer::Measure(MeasureLayer::from_iter([MeasureTarget::z(q(1))]));
        assert_eq!(
            reset.clone().locally_optimized(Some(m.clone())),
            vec![reset, m]
        );
    }

    #[test]
    fn test_self_optimization() {
        assert!(Layer::Empty.locally_optimized(None).is_empty());
        assert!(rot(&[(0, Rotation::IDENTITY)]).locally_optimized(None).is_empty());
        assert!(
            Layer::Reset(ResetLayer::default())
                .locally_optimized(None)
                .is_empty()
        );
    }

    #[test]
    fn test_absorb_requires_disjoint_targets() {
        let mut a = Layer::Reset(ResetLayer::from_iter([(q(0), Basis::Z)]));
        let b = Layer::Reset(ResetLayer::from_iter([(q(1), Basis::X)]));
        assert!(a.absorb(b).is_none());
        assert_eq!(a.touched().len(), 2);

        let c = Layer::Reset(ResetLayer::from_iter([(q(1), Basis::Z)]));
        assert!(a.absorb(c).is_some());
    }
}
