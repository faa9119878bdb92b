use rustc_hash::FxHashSet;
use stratum_ir::{Basis, Circuit, Instruction, QubitId, StandardGate};

use super::{Layer, RotationLayer, SwapLayer};
use crate::error::CompileResult;
use crate::rotation::Rotation;

/// A two-qubit controlled-Pauli interaction `{b1}C{b2} q1 q2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InteractPair {
    pub q1: QubitId,
    pub b1: Basis,
    pub q2: QubitId,
    pub b2: Basis,
}

/// Preferred control basis order when naming an interaction: Z, X, Y.
fn control_rank(basis: Basis) -> u8 {
    match basis {
        Basis::Z => 0,
        Basis::X => 1,
        Basis::Y => 2,
    }
}

impl InteractPair {
    pub fn new(q1: QubitId, b1: Basis, q2: QubitId, b2: Basis) -> Self {
        Self { q1, b1, q2, b2 }
    }

    /// The pair as an unordered qubit pair, smaller qubit first.
    pub fn unordered(&self) -> (QubitId, QubitId) {
        (self.q1.min(self.q2), self.q1.max(self.q2))
    }

    pub fn is_z_basis(&self) -> bool {
        self.b1 == Basis::Z && self.b2 == Basis::Z
    }

    /// Operand order used for emission: the better control basis first,
    /// smaller qubit first for symmetric pairs.
    fn canonical(self) -> Self {
        let (r1, r2) = (control_rank(self.b1), control_rank(self.b2));
        if r1 > r2 || (r1 == r2 && self.q1 > self.q2) {
            Self::new(self.q2, self.b2, self.q1, self.b1)
        } else {
            self
        }
    }

    fn sort_key(&self) -> (u8, u8, QubitId, QubitId) {
        (control_rank(self.b1), control_rank(self.b2), self.q1, self.q2)
    }

    fn gate(&self) -> StandardGate {
        StandardGate::from_interaction_bases(self.b1, self.b2)
    }

    fn pre_rotation(&self) -> [(QubitId, Rotation); 2] {
        [
            (self.q1, Rotation::to_z(self.b1)),
            (self.q2, Rotation::to_z(self.b2)),
        ]
    }

    fn z_form(&self) -> Self {
        Self::new(self.q1, Basis::Z, self.q2, Basis::Z)
    }
}

fn touched(pairs: &[InteractPair]) -> FxHashSet<QubitId> {
    pairs.iter().flat_map(|p| [p.q1, p.q2]).collect()
}

fn canonical_sorted(pairs: &[InteractPair]) -> Vec<InteractPair> {
    let mut out: Vec<InteractPair> = pairs.iter().map(|p| p.canonical()).collect();
    out.sort_by_key(InteractPair::sort_key);
    out
}

fn same_pairs(pairs: &[InteractPair], swap: &SwapLayer) -> bool {
    let mut mine: Vec<_> = pairs.iter().map(InteractPair::unordered).collect();
    mine.sort();
    mine == swap.sorted_pairs()
}

/// Controlled-Pauli interactions on disjoint qubit pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractLayer {
    pub pairs: Vec<InteractPair>,
}

impl InteractLayer {
    pub fn touched(&self) -> FxHashSet<QubitId> {
        touched(&self.pairs)
    }

    pub fn is_z_basis(&self) -> bool {
        self.pairs.iter().all(InteractPair::is_z_basis)
    }

    pub fn absorb(&mut self, next: InteractLayer) -> Option<InteractLayer> {
        if !self.touched().is_disjoint(&next.touched()) {
            return Some(next);
        }
        self.pairs.extend(next.pairs);
        None
    }

    /// Fuse with a following swap layer over exactly the same pairs.
    pub fn fused_with_swap(self, swap: &SwapLayer) -> Result<InteractSwapLayer, InteractLayer> {
        if !same_pairs(&self.pairs, swap) {
            return Err(self);
        }
        Ok(InteractSwapLayer { pairs: self.pairs })
    }

    /// Fuse with a preceding swap layer over exactly the same pairs.
    ///
    /// `SWAP a b` then `{b1}C{b2} a b` equals `{b1}C{b2} b a` then `SWAP a b`.
    pub fn fused_after_swap(self, swap: &SwapLayer) -> Result<InteractSwapLayer, InteractLayer> {
        if !same_pairs(&self.pairs, swap) {
            return Err(self);
        }
        Ok(InteractSwapLayer {
            pairs: self
                .pairs
                .iter()
                .map(|p| InteractPair::new(p.q2, p.b1, p.q1, p.b2))
                .collect(),
        })
    }

    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        for p in canonical_sorted(&self.pairs) {
            out.append_merged(Instruction::on_qubits(p.gate(), [p.q1, p.q2]))?;
        }
        Ok(())
    }

    pub fn to_z_basis(self) -> Vec<Layer> {
        if self.is_z_basis() {
            return vec![Layer::Interact(self)];
        }
        let pre: RotationLayer = self.pairs.iter().flat_map(InteractPair::pre_rotation).collect();
        let post = pre.inverse();
        let z_form = InteractLayer {
            pairs: self.pairs.iter().map(InteractPair::z_form).collect(),
        };
        Layer::conjugated(pre, Layer::Interact(z_form), post)
    }
}

impl FromIterator<InteractPair> for InteractLayer {
    fn from_iter<T: IntoIterator<Item = InteractPair>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

/// Interactions each followed by a swap of the same two qubits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractSwapLayer {
    pub pairs: Vec<InteractPair>,
}

impl InteractSwapLayer {
    pub fn touched(&self) -> FxHashSet<QubitId> {
        touched(&self.pairs)
    }

    pub fn is_z_basis(&self) -> bool {
        self.pairs.iter().all(InteractPair::is_z_basis)
    }

    pub fn absorb(&mut self, next: InteractSwapLayer) -> Option<InteractSwapLayer> {
        if !self.touched().is_disjoint(&next.touched()) {
            return Some(next);
        }
        self.pairs.extend(next.pairs);
        None
    }

    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        let pairs = canonical_sorted(&self.pairs);
        let mut generic = Vec::new();
        for p in &pairs {
            match (p.b1, p.b2) {
                (Basis::Z, Basis::Z) => {
                    out.append_merged(Instruction::on_qubits(StandardGate::CZSwap, [p.q1, p.q2]))?;
                }
                (Basis::Z, Basis::X) => {
                    out.append_merged(Instruction::on_qubits(StandardGate::CXSwap, [p.q1, p.q2]))?;
                }
                _ => generic.push(*p),
            }
        }
        for p in &generic {
            out.append_merged(Instruction::on_qubits(p.gate(), [p.q1, p.q2]))?;
        }
        for p in &generic {
            let (a, b) = p.unordered();
            out.append_merged(Instruction::on_qubits(StandardGate::Swap, [a, b]))?;
        }
        Ok(())
    }

    /// The swap moves each qubit's state to its partner, so each qubit's
    /// post-rotation undoes its partner's pre-rotation.
    pub fn to_z_basis(self) -> Vec<Layer> {
        if self.is_z_basis() {
            return vec![Layer::InteractSwap(self)];
        }
        let pre: RotationLayer = self.pairs.iter().flat_map(InteractPair::pre_rotation).collect();
        let post: RotationLayer = self
            .pairs
            .iter()
            .flat_map(|p| {
                [
                    (p.q1, Rotation::to_z(p.b2).inverse()),
                    (p.q2, Rotation::to_z(p.b1).inverse()),
                ]
            })
            .collect();
        let z_form = InteractSwapLayer {
            pairs: self.pairs.iter().map(InteractPair::z_form).collect(),
        };
        Layer::conjugated(pre, Layer::InteractSwap(z_form), post)
    }
}

impl FromIterator<InteractPair> for InteractSwapLayer {
    fn from_iter<T: IntoIterator<Item = InteractPair>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_stim::emit;

    fn q(i: u32) -> QubitId {
        QubitId(i)
    }

    fn emitted(layer: &Layer) -> String {
        let mut out = Circuit::new();
        layer.append_into(&mut out).unwrap();
        emit(&out)
    }

    #[test]
    fn test_interaction_names_are_canonical() {
        let layer = Layer::Interact(InteractLayer::from_iter([
            InteractPair::new(q(5), Basis::X, q(2), Basis::Z),
            InteractPair::new(q(3), Basis::Z, q(1), Basis::Z),
            InteractPair::new(q(0), Basis::Y, q(4), Basis::X),
        ]));
        assert_eq!(emitted(&layer), "CZ 1 3\nCX 2 5\nXCY 4 0\n");
    }

    #[test]
    fn test_interact_swap_names() {
        let layer = Layer::InteractSwap(InteractSwapLayer::from_iter([
            InteractPair::new(q(1), Basis::X, q(0), Basis::Z),
            InteractPair::new(q(3), Basis::Z, q(2), Basis::Z),
        ]));
        assert_eq!(emitted(&layer), "CZSWAP 2 3\nCXSWAP 0 1\n");

        let layer = Layer::InteractSwap(InteractSwapLayer::from_iter([InteractPair::new(
            q(1),
            Basis::Y,
            q(0),
            Basis::Y,
        )]));
        assert_eq!(emitted(&layer), "YCY 0 1\nSWAP 0 1\n");
    }

    #[test]
    fn test_interact_swap_post_rotations_cross() {
        let layer = InteractSwapLayer::from_iter([InteractPair::new(
            q(0),
            Basis::X,
            q(1),
            Basis::Y,
        )]);
        let out = layer.to_z_basis();
        assert_eq!(out.len(), 3);
        let (Layer::Rotation(pre), Layer::Rotation(post)) = (&out[0], &out[2]) else {
            panic!("expected rotations around the interaction");
        };
        assert_eq!(pre.get(q(0)), Rotation::H);
        assert_eq!(pre.get(q(1)), Rotation::H_YZ);
        assert_eq!(post.get(q(0)), Rotation::H_YZ);
        assert_eq!(post.get(q(1)), Rotation::H);
    }

    #[test]
    fn test_fuse_requires_same_pairs() {
        let cx = InteractLayer::from_iter([InteractPair::new(q(0), Basis::Z, q(1), Basis::X)]);
        let other_swap = SwapLayer::from_iter([(q(0), q(2))]);
        assert!(cx.clone().fused_with_swap(&other_swap).is_err());
        assert!(cx.fused_after_swap(&other_swap).is_err());
    }
}
