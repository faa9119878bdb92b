//! High-level circuit builder API.

use serde::{Deserialize, Serialize};

use crate::error::IrResult;
use crate::gate::StandardGate;
use crate::instruction::{Instruction, Target};
use crate::qubit::{Basis, QubitId};

/// A `REPEAT n { ... }` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepeatBlock {
    /// Number of times the body executes.
    pub repetitions: u64,
    /// The repeated instructions.
    pub body: Circuit,
}

/// One entry of a flat circuit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// A single instruction.
    Instruction(Instruction),
    /// A repeated block.
    Repeat(RepeatBlock),
}

/// A flat, ordered instruction stream with nested repeat blocks.
///
/// Instructions appended through the builder API are validated against their
/// gate's target shape. [`Circuit::append_merged`] additionally fuses an
/// instruction into the previous one when both use the same gate and
/// arguments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    operations: Vec<Operation>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a validated instruction.
    pub fn append(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        instruction.validate()?;
        self.operations.push(Operation::Instruction(instruction));
        Ok(self)
    }

    /// Append a validated instruction, fusing it into the previous
    /// instruction when both share gate and arguments.
    pub fn append_merged(&mut self, instruction: Instruction) -> IrResult<&mut Self> {
        instruction.validate()?;
        if let Some(Operation::Instruction(last)) = self.operations.last_mut() {
            let fusable = instruction.standard().is_some_and(|g| g.is_fusable());
            if fusable && last.gate == instruction.gate && last.args == instruction.args {
                last.targets.extend(instruction.targets);
                return Ok(self);
            }
        }
        self.operations.push(Operation::Instruction(instruction));
        Ok(self)
    }

    /// Append a repeat block. Empty bodies are kept.
    pub fn append_repeat(&mut self, repetitions: u64, body: Circuit) -> &mut Self {
        self.operations
            .push(Operation::Repeat(RepeatBlock { repetitions, body }));
        self
    }

    /// Append an operation as-is.
    pub fn push(&mut self, operation: Operation) -> IrResult<&mut Self> {
        match operation {
            Operation::Instruction(inst) => self.append(inst),
            Operation::Repeat(block) => Ok(self.append_repeat(block.repetitions, block.body)),
        }
    }

    // =========================================================================
    // Gate shorthands
    // =========================================================================

    /// Apply a standard gate to plain qubits.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.append(Instruction::on_qubits(gate, qubits))
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::H, [qubit])
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::S, [qubit])
    }

    /// Apply CX (CNOT) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CX, [control, target])
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::CZ, [q1, q2])
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::Swap, [q1, q2])
    }

    /// Measure a qubit in the given basis.
    pub fn measure(&mut self, basis: Basis, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::measurement(basis), [qubit])
    }

    /// Reset a qubit in the given basis.
    pub fn reset(&mut self, basis: Basis, qubit: QubitId) -> IrResult<&mut Self> {
        self.gate(StandardGate::reset(basis), [qubit])
    }

    /// Append a `TICK`.
    pub fn tick(&mut self) -> IrResult<&mut Self> {
        self.append(Instruction::tick())
    }

    /// Append a `DETECTOR` over measurement record lookbacks.
    pub fn detector(
        &mut self,
        coords: impl IntoIterator<Item = f64>,
        lookbacks: impl IntoIterator<Item = u32>,
    ) -> IrResult<&mut Self> {
        self.append(
            Instruction::new(
                StandardGate::Detector,
                lookbacks.into_iter().map(Target::record),
            )
            .with_args(coords),
        )
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The operations in order.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Consume the circuit, returning its operations.
    pub fn into_operations(self) -> Vec<Operation> {
        self.operations
    }

    /// Iterate over top-level operations.
    pub fn iter(&self) -> std::slice::Iter<'_, Operation> {
        self.operations.iter()
    }

    /// Number of top-level operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if the circuit has no operations.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// One more than the largest qubit index used anywhere, or 0.
    pub fn num_qubits(&self) -> usize {
        self.max_qubit().map_or(0, |q| q.0 as usize + 1)
    }

    fn max_qubit(&self) -> Option<QubitId> {
        self.operations
            .iter()
            .filter_map(|op| match op {
                Operation::Instruction(inst) => inst.qubits().max(),
                Operation::Repeat(block) => block.body.max_qubit(),
            })
            .max()
    }

    /// Number of executed `TICK`s, with repeat blocks unrolled.
    pub fn num_ticks(&self) -> u64 {
        self.count_executed(&|inst| u64::from(inst.is(StandardGate::Tick)))
    }

    /// Number of executed measurement records, with repeat blocks unrolled.
    pub fn num_measurements(&self) -> u64 {
        self.count_executed(&|inst| inst.num_measurements() as u64)
    }

    /// Number of instructions, counting each repeat body once.
    pub fn num_instructions(&self) -> usize {
        self.operations
            .iter()
            .map(|op| match op {
                Operation::Instruction(_) => 1,
                Operation::Repeat(block) => block.body.num_instructions(),
            })
            .sum()
    }

    fn count_executed(&self, count: &dyn Fn(&Instruction) -> u64) -> u64 {
        self.operations
            .iter()
            .map(|op| match op {
                Operation::Instruction(inst) => count(inst),
                Operation::Repeat(block) => block
                    .repetitions
                    .saturating_mul(block.body.count_executed(count)),
            })
            .fold(0u64, u64::saturating_add)
    }
}

impl FromIterator<Operation> for Circuit {
    fn from_iter<T: IntoIterator<Item = Operation>>(iter: T) -> Self {
        Self {
            operations: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Operation;
    type IntoIter = std::slice::Iter<'a, Operation>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IrError;

    #[test]
    fn test_new_circuit() {
        let circuit = Circuit::new();
        assert!(circuit.is_empty());
        assert_eq!(circuit.num_qubits(), 0);
        assert_eq!(circuit.num_ticks(), 0);
    }

    #[test]
    fn test_fluent_api() {
        let mut circuit = Circuit::new();
        circuit
            .h(QubitId(0))
            .unwrap()
            .tick()
            .unwrap()
            .cx(QubitId(0), QubitId(3))
            .unwrap()
            .tick()
            .unwrap()
            .measure(Basis::Z, QubitId(0))
            .unwrap();

        assert_eq!(circuit.len(), 5);
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(circuit.num_ticks(), 2);
        assert_eq!(circuit.num_measurements(), 1);
    }

    #[test]
    fn test_append_merged_fuses_same_gate() {
        let mut circuit = Circuit::new();
        circuit
            .append_merged(Instruction::on_qubits(StandardGate::H, [QubitId(0)]))
            .unwrap()
            .append_merged(Instruction::on_qubits(StandardGate::H, [QubitId(1)]))
            .unwrap()
            .append_merged(Instruction::on_qubits(StandardGate::S, [QubitId(2)]))
            .unwrap();
        assert_eq!(circuit.len(), 2);

        let mut circuit = Circuit::new();
        circuit.append_merged(Instruction::tick()).unwrap();
        circuit.append_merged(Instruction::tick()).unwrap();
        assert_eq!(circuit.len(), 2);
    }

    #[test]
    fn test_repeat_counts() {
        let mut body = Circuit::new();
        body.measure(Basis::X, QubitId(1))
            .unwrap()
            .tick()
            .unwrap();

        let mut circuit = Circuit::new();
        circuit.tick().unwrap();
        circuit.append_repeat(10, body);

        assert_eq!(circuit.num_ticks(), 11);
        assert_eq!(circuit.num_measurements(), 10);
        assert_eq!(circuit.num_instructions(), 3);
        assert_eq!(circuit.num_qubits(), 2);
    }

    #[test]
    fn test_invalid_append_is_rejected() {
        let mut circuit = Circuit::new();
        let err = circuit.cx(QubitId(1), QubitId(1)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateQubit { .. }));
        assert!(circuit.is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut circuit = Circuit::new();
        circuit.h(QubitId(0)).unwrap().detector([1.0], [1]).unwrap();
        let json = serde_json::to_string(&circuit).unwrap();
        let back: Circuit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, circuit);
    }
}
