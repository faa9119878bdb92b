//! Verification of the canonical output vocabulary.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{CompileError, CompileResult};
use crate::layer_circuit::LayerCircuit;
use crate::layers::Layer;
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Layer counts by kind, loop bodies counted once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerCensus {
    pub counts: BTreeMap<&'static str, usize>,
}

impl LayerCensus {
    pub fn of(circuit: &LayerCircuit) -> Self {
        let mut census = LayerCensus::default();
        census.add(circuit);
        census
    }

    fn add(&mut self, circuit: &LayerCircuit) {
        for layer in &circuit.layers {
            *self.counts.entry(layer.kind_name()).or_default() += 1;
            if let Layer::Loop(l) = layer {
                self.add(&l.body);
            }
        }
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn get(&self, kind: &str) -> usize {
        self.counts.get(kind).copied().unwrap_or(0)
    }
}

/// Analysis pass checking that every layer, loop bodies included, is in the
/// Z-basis vocabulary. Records a [`LayerCensus`].
pub struct CanonicalVocabularyVerification;

impl Pass for CanonicalVocabularyVerification {
    fn name(&self) -> &'static str {
        "canonical_vocabulary_verification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(
        &self,
        circuit: LayerCircuit,
        properties: &mut PropertySet,
    ) -> CompileResult<LayerCircuit> {
        if let Some(bad) = first_non_canonical(&circuit) {
            return Err(CompileError::InternalInconsistency(format!(
                "{} layer left outside the Z basis: {bad:?}",
                bad.kind_name()
            )));
        }
        let census = LayerCensus::of(&circuit);
        debug!(
            "Canonical vocabulary verified: {} layers",
            census.total()
        );
        properties.insert(census);
        Ok(circuit)
    }
}

fn first_non_canonical(circuit: &LayerCircuit) -> Option<&Layer> {
    circuit.layers.iter().find_map(|layer| match layer {
        Layer::Loop(l) => first_non_canonical(&l.body),
        other if !other.is_canonical() => Some(other),
        _ => None,
    })
}
