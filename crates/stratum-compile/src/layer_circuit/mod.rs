//! A circuit as a sequence of timing layers.

mod parse;

use rustc_hash::FxHashSet;
use stratum_ir::{Circuit, Instruction, QubitId};

use crate::error::CompileResult;
use crate::layers::{add_shift, Layer, LoopLayer, QubitCoordAnnotationLayer, RotationLayer};

/// An ordered sequence of layers. Loops own their bodies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerCircuit {
    pub layers: Vec<Layer>,
}

impl LayerCircuit {
    pub fn from_layers(layers: impl IntoIterator<Item = Layer>) -> Self {
        Self {
            layers: layers.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Qubits touched anywhere in the circuit, loop bodies included.
    pub fn touched(&self) -> FxHashSet<QubitId> {
        self.layers.iter().flat_map(Layer::touched).collect()
    }

    /// Number of layers, counting loop bodies once.
    pub fn num_layers_recursive(&self) -> usize {
        self.layers
            .iter()
            .map(|layer| match layer {
                Layer::Loop(l) => 1 + l.body.num_layers_recursive(),
                _ => 1,
            })
            .sum()
    }

    /// Write the layers back as a flat circuit.
    ///
    /// A `TICK` is placed between a layer that implies one and the next layer
    /// that requires one. No trailing `TICK` is written.
    pub fn to_circuit(&self) -> CompileResult<Circuit> {
        let mut out = Circuit::new();
        let mut tick_coming = false;
        for layer in &self.layers {
            if tick_coming && layer.requires_tick_before() {
                out.append(Instruction::tick())?;
                tick_coming = false;
            }
            layer.append_into(&mut out)?;
            tick_coming |= layer.implies_eventual_tick_after();
        }
        Ok(out)
    }

    /// Whether [`to_circuit`](Self::to_circuit) leaves a `TICK` owed after
    /// its last instruction. A trailing loop has already closed its own.
    pub fn ends_with_pending_tick(&self) -> bool {
        let mut tick_coming = false;
        for layer in &self.layers {
            if layer.requires_tick_before() {
                tick_coming = false;
            }
            tick_coming |= layer.implies_eventual_tick_after();
        }
        tick_coming
    }

    /// One left-to-right sweep of pairwise rewrites, recursing into loops.
    #[must_use]
    pub fn with_locally_optimized_layers(self) -> LayerCircuit {
        let mut out: Vec<Layer> = Vec::with_capacity(self.layers.len());
        for layer in self.layers {
            for layer in layer.locally_optimized(None) {
                match out.pop() {
                    Some(prev) => out.extend(prev.locally_optimized(Some(layer))),
                    None => out.push(layer),
                }
            }
        }
        LayerCircuit { layers: out }
    }

    /// Decompose every layer into its Z-basis form.
    #[must_use]
    pub fn to_z_basis(self) -> LayerCircuit {
        LayerCircuit {
            layers: self.layers.into_iter().flat_map(Layer::to_z_basis).collect(),
        }
    }

    /// Move rotations at the end of loop bodies to the front of the body,
    /// compensating outside the loop.
    ///
    /// `(B R)^n` equals `R⁻¹ (R B)^n R`, which lets `R⁻¹` merge with whatever
    /// precedes the loop.
    #[must_use]
    pub fn with_rolled_loop_rotations(self) -> LayerCircuit {
        let mut out = Vec::with_capacity(self.layers.len());
        for layer in self.layers {
            match layer {
                Layer::Loop(l) => out.extend(rolled(l)),
                other => out.push(other),
            }
        }
        LayerCircuit { layers: out }
    }

    /// Drop rotation layers that rotate nothing.
    #[must_use]
    pub fn without_vacuous_rotations(self) -> LayerCircuit {
        LayerCircuit {
            layers: self
                .layers
                .into_iter()
                .filter_map(|layer| match layer {
                    Layer::Rotation(r) if r.is_vacuous() => None,
                    Layer::Loop(l) => Some(Layer::Loop(LoopLayer::new(
                        l.body.without_vacuous_rotations(),
                        l.repetitions,
                    ))),
                    other => Some(other),
                })
                .collect(),
        }
    }

    /// Slide each rotation layer back past layers touching none of its
    /// qubits, merging it into the first earlier rotation layer it meets.
    /// Loops are not crossed.
    #[must_use]
    pub fn with_rotations_merged_earlier(self) -> LayerCircuit {
        let mut out: Vec<Layer> = Vec::with_capacity(self.layers.len());
        for layer in self.layers {
            let rotation = match layer {
                Layer::Rotation(r) => r,
                Layer::Loop(l) => {
                    out.push(Layer::Loop(LoopLayer::new(
                        l.body.with_rotations_merged_earlier(),
                        l.repetitions,
                    )));
                    continue;
                }
                other => {
                    out.push(other);
                    continue;
                }
            };
            let qubits = rotation.touched();
            let target = out.iter().rposition(|l| {
                matches!(l, Layer::Rotation(_) | Layer::Loop(_))
                    || !l.touched().is_disjoint(&qubits)
            });
            if let Some(i) = target {
                if let Layer::Rotation(earlier) = &mut out[i] {
                    *earlier = earlier.then(&rotation);
                    if earlier.is_vacuous() {
                        out.remove(i);
                    }
                    continue;
                }
            }
            out.push(Layer::Rotation(rotation));
        }
        LayerCircuit { layers: out }
    }

    /// Drop rotation entries whose qubit is reset before anything else
    /// touches it.
    #[must_use]
    pub fn with_rotations_before_resets_removed(self) -> LayerCircuit {
        let mut reset_next: FxHashSet<QubitId> = FxHashSet::default();
        let mut out = Vec::with_capacity(self.layers.len());
        for layer in self.layers.into_iter().rev() {
            match layer {
                Layer::Rotation(r) => {
                    let kept = r.without_qubits(reset_next.iter());
                    if !kept.is_vacuous() {
                        out.push(Layer::Rotation(kept));
                    }
                }
                Layer::Reset(r) => {
                    reset_next.extend(r.targets.keys().copied());
                    out.push(Layer::Reset(r));
                }
                Layer::Loop(l) => {
                    let body = l.body.with_rotations_before_resets_removed();
                    for q in body.touched() {
                        reset_next.remove(&q);
                    }
                    out.push(Layer::Loop(LoopLayer::new(body, l.repetitions)));
                }
                other => {
                    for q in other.touched() {
                        reset_next.remove(&q);
                    }
                    out.push(other);
                }
            }
        }
        out.reverse();
        LayerCircuit { layers: out }
    }

    /// Drop trailing layers that cannot affect any measurement result.
    ///
    /// Annotations touching no qubits are stepped over and kept.
    #[must_use]
    pub fn with_irrelevant_tail_layers_removed(self) -> LayerCircuit {
        let mut layers = self.layers;
        let mut kept_tail = Vec::new();
        while let Some(layer) = layers.pop() {
            match layer {
                Layer::Reset(_)
                | Layer::Interact(_)
                | Layer::InteractSwap(_)
                | Layer::Swap(_)
                | Layer::ISwap(_)
                | Layer::SqrtPauliProduct(_)
                | Layer::Feedback(_)
                | Layer::Rotation(_)
                | Layer::Empty => {}
                annotation if annotation.is_annotation() && annotation.touched().is_empty() => {
                    kept_tail.push(annotation);
                }
                other => {
                    layers.push(other);
                    break;
                }
            }
        }
        layers.extend(kept_tail.into_iter().rev());
        LayerCircuit { layers }
    }

    /// Move top-level `QUBIT_COORDS` to the front, folding in the coordinate
    /// shifts that precede them.
    #[must_use]
    pub fn with_qubit_coords_at_start(self) -> LayerCircuit {
        let mut hoisted = QubitCoordAnnotationLayer::default();
        let mut offset: Vec<f64> = Vec::new();
        let mut rest = Vec::with_capacity(self.layers.len());
        for layer in self.layers {
            match layer {
                Layer::QubitCoordAnnotation(mut c) => {
                    c.shift(&offset);
                    hoisted.coords.extend(c.coords);
                }
                Layer::ShiftCoordAnnotation(s) => {
                    add_shift(&mut offset, &s.shift);
                    rest.push(Layer::ShiftCoordAnnotation(s));
                }
                Layer::Loop(l) => {
                    add_shift(&mut offset, &l.total_coord_shift());
                    rest.push(Layer::Loop(l));
                }
                other => rest.push(other),
            }
        }
        if hoisted.coords.is_empty() {
            return LayerCircuit { layers: rest };
        }
        let mut layers = Vec::with_capacity(rest.len() + 1);
        layers.push(Layer::QubitCoordAnnotation(hoisted));
        layers.extend(rest);
        LayerCircuit { layers }
    }

    /// Sum of all `SHIFT_COORDS` executed by the circuit, loops unrolled.
    pub fn total_coord_shift(&self) -> Vec<f64> {
        let mut total = Vec::new();
        for layer in &self.layers {
            match layer {
                Layer::ShiftCoordAnnotation(s) => add_shift(&mut total, &s.shift),
                Layer::Loop(l) => add_shift(&mut total, &l.total_coord_shift()),
                _ => {}
            }
        }
        total
    }
}

impl LoopLayer {
    /// Coordinate shift of all iterations together.
    pub fn total_coord_shift(&self) -> Vec<f64> {
        let reps = self.repetitions as f64;
        self.body
            .total_coord_shift()
            .into_iter()
            .map(|s| s * reps)
            .collect()
    }
}

/// Roll a loop body's final rotation to its front, recursing first.
///
/// The body is swept once beforehand so that a run of trailing rotation
/// layers moves out as one. A roll is skipped when the next sweep would
/// commute the rotation back to the end of the body.
fn rolled(lp: LoopLayer) -> Vec<Layer> {
    let body = lp
        .body
        .with_rolled_loop_rotations()
        .with_locally_optimized_layers();
    let reps = lp.repetitions;
    let unrolled = |body: LayerCircuit| vec![Layer::Loop(LoopLayer::new(body, reps))];

    let Some(idx) = last_timed_layer(&body) else {
        return unrolled(body);
    };
    let Layer::Rotation(rotation) = &body.layers[idx] else {
        return unrolled(body);
    };
    let qubits = rotation.touched();
    let blocked = body.layers[idx + 1..]
        .iter()
        .any(|l| !l.touched().is_disjoint(&qubits));
    if idx == 0 || blocked {
        return unrolled(body);
    }

    let rotation: RotationLayer = rotation.clone();
    let mut moved = body.layers.clone();
    moved.remove(idx);
    moved.insert(0, Layer::Rotation(rotation.clone()));
    let moved = LayerCircuit::from_layers(moved).with_locally_optimized_layers();
    let returns = last_timed_layer(&moved)
        .is_some_and(|i| matches!(moved.layers[i], Layer::Rotation(_)));
    if returns {
        return unrolled(body);
    }

    vec![
        Layer::Rotation(rotation.inverse()),
        Layer::Loop(LoopLayer::new(moved, reps)),
        Layer::Rotation(rotation),
    ]
}

/// Index of the last layer that is not a detector or coordinate shift.
fn last_timed_layer(body: &LayerCircuit) -> Option<usize> {
    body.layers.iter().rposition(|l| {
        !matches!(
            l,
            Layer::DetObsAnnotation(_) | Layer::ShiftCoordAnnotation(_)
        )
    })
}

#[cfg(test)]
mod tests;
