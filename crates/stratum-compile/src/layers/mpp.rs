use rustc_hash::FxHashSet;
use stratum_ir::{Circuit, Instruction, QubitId, StandardGate, Target};

use crate::error::CompileResult;

/// Pauli product measurements, kept verbatim in record order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MppLayer {
    pub targets: Vec<Target>,
}

impl MppLayer {
    pub fn touched(&self) -> FxHashSet<QubitId> {
        self.targets.iter().filter_map(Target::qubit_id).collect()
    }

    pub fn absorb(&mut self, next: MppLayer) -> Option<MppLayer> {
        if !self.touched().is_disjoint(&next.touched()) {
            return Some(next);
        }
        self.targets.extend(next.targets);
        None
    }

    pub fn append_into(&self, out: &mut Circuit) -> CompileResult<()> {
        out.append_merged(Instruction::new(StandardGate::MPP, self.targets.iter().copied()))?;
        Ok(())
    }
}
