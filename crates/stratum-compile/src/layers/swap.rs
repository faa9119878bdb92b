use rustc_hash::FxHashSet;
use stratum_ir::{Circuit, Instruction, QubitId, StandardGate};

use crate::error::CompileResult;

fn normalized(a: QubitId, b: QubitId) -> (QubitId, QubitId) {
    (a.min(b), a.max(b))
}

fn touched(pairs: &[(QubitId, QubitId)]) -> FxHashSet<QubitId> {
    pairs.iter().flat_map(|&(a, b)| [a, b]).collect()
}

fn append_sorted(
    pairs: &[(QubitId, QubitId)],
    gate: StandardGate,
    out: &mut Circuit,
) -> CompileResult<()> {
    let mut sorted = pairs.to_vec();
    sorted.sort();
    for (a, b) in sorted {
        out.append_merged(Instruction::on_qubits(gate, [a, b]))?;
    }
    Ok(())
}

/// Swaps on disjoint qubit pairs. Pairs are stored smaller qubit first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwapLayer {
    pub pairs: Vec<(QubitId, QubitId)>,
}

impl SwapLayer {
    pub fn touched(&self) -> FxHashSet<QubitId> {
        touched(&self.pairs)
    }

    /// The pairs in ascending order.
    pub fn sorted_pairs(&self) -> Vec<(QubitId, QubitId)> {
        let mut pairs = self.pairs.clone();
        pairs.sort();
        pairs
    }

    pub fn absorb(&mut self, next: SwapLayer) -> Option<SwapLayer> {
        if !self.touched().is_disjoint(&next.touched()) {
            return Some(next);
        }
        self.pairs.extend(next.pairs);
        None
    }

    /// Combine with a following swap layer.
    ///
    /// Identical pairs cancel and untouched pairs are merged. If a pair of
    /// `next` shares exactly one qubit with a pair of `self`, both layers are
    /// handed back unchanged.
    pub fn combined_with(self, next: SwapLayer) -> Result<SwapLayer, (SwapLayer, SwapLayer)> {
        let mine = self.touched();
        let mut cancelled = FxHashSet::default();
        for pair in &next.pairs {
            if self.pairs.contains(pair) {
                cancelled.insert(*pair);
            } else if mine.contains(&pair.0) || mine.contains(&pair.1) {
                return Err((self, next));
            }
        }
        let pairs = self
            .pairs
            .into_iter()
            .chain(next.pairs)
            .filter(|p| !cancelled.contains(p))
            .collect();
        Ok(SwapLayer { pairs })
    }

    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        append_sorted(&self.pairs, StandardGate::Swap, out)
    }
}

impl FromIterator<(QubitId, QubitId)> for SwapLayer {
    fn from_iter<T: IntoIterator<Item = (QubitId, QubitId)>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().map(|(a, b)| normalized(a, b)).collect(),
        }
    }
}

/// iSWAPs on disjoint qubit pairs. Pairs are stored smaller qubit first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ISwapLayer {
    pub pairs: Vec<(QubitId, QubitId)>,
}

impl ISwapLayer {
    pub fn touched(&self) -> FxHashSet<QubitId> {
        touched(&self.pairs)
    }

    pub fn absorb(&mut self, next: ISwapLayer) -> Option<ISwapLayer> {
        if !self.touched().is_disjoint(&next.touched()) {
            return Some(next);
        }
        self.pairs.extend(next.pairs);
        None
    }

    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        append_sorted(&self.pairs, StandardGate::ISwap, out)
    }
}

impl FromIterator<(QubitId, QubitId)> for ISwapLayer {
    fn from_iter<T: IntoIterator<Item = (QubitId, QubitId)>>(iter: T) -> Self {
        Self {
            pairs: iter.into_iter().map(|(a, b)| normalized(a, b)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratum_stim::emit;

    #[test]
    fn test_partial_cancellation() {
        let a = SwapLayer::from_iter([(QubitId(0), QubitId(1)), (QubitId(2), QubitId(3))]);
        let b = SwapLayer::from_iter([(QubitId(3), QubitId(2)), (QubitId(4), QubitId(5))]);
        let combined = a.combined_with(b).unwrap();
        assert_eq!(
            combined.sorted_pairs(),
            vec![(QubitId(0), QubitId(1)), (QubitId(4), QubitId(5))]
        );
    }

    #[test]
    fn test_emission_is_sorted() {
        let layer = ISwapLayer::from_iter([(QubitId(5), QubitId(4)), (QubitId(1), QubitId(0))]);
        let mut out = Circuit::new();
        layer.append_into(&mut out).unwrap();
        assert_eq!(emit(&out), "ISWAP 0 1 4 5\n");
    }
}
