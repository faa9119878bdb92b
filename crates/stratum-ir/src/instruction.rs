//! Instructions combining gates with targets and arguments.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::gate::{GateKind, StandardGate, TargetShape};
use crate::qubit::{Basis, QubitId};

/// A single instruction target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    /// A qubit, optionally with its result inverted (`!q`).
    Qubit {
        /// The qubit.
        id: QubitId,
        /// Whether the target carries the `!` prefix.
        inverted: bool,
    },
    /// A measurement record lookback `rec[-k]`, storing `k >= 1`.
    Record(u32),
    /// A sweep bit `sweep[k]`.
    Sweep(u32),
    /// A Pauli target such as `X3` or `!Z4`.
    Pauli {
        /// The Pauli basis.
        basis: Basis,
        /// The qubit.
        id: QubitId,
        /// Whether the target carries the `!` prefix.
        inverted: bool,
    },
    /// The `*` combiner joining Pauli targets into a product.
    Combiner,
}

impl Target {
    /// A plain qubit target.
    pub fn qubit(id: impl Into<QubitId>) -> Self {
        Target::Qubit {
            id: id.into(),
            inverted: false,
        }
    }

    /// A measurement record lookback `rec[-lookback]`.
    pub fn record(lookback: u32) -> Self {
        Target::Record(lookback)
    }

    /// A Pauli target.
    pub fn pauli(basis: Basis, id: impl Into<QubitId>) -> Self {
        Target::Pauli {
            basis,
            id: id.into(),
            inverted: false,
        }
    }

    /// The qubit addressed by a qubit or Pauli target.
    pub fn qubit_id(&self) -> Option<QubitId> {
        match self {
            Target::Qubit { id, .. } | Target::Pauli { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Whether this is a plain qubit target.
    pub fn is_qubit(&self) -> bool {
        matches!(self, Target::Qubit { .. })
    }

    /// Whether this is a classical bit (record or sweep).
    pub fn is_classical(&self) -> bool {
        matches!(self, Target::Record(_) | Target::Sweep(_))
    }

    /// Whether the target carries the `!` prefix.
    pub fn is_inverted(&self) -> bool {
        matches!(
            self,
            Target::Qubit { inverted: true, .. } | Target::Pauli { inverted: true, .. }
        )
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Qubit { id, inverted } => {
                if *inverted {
                    f.write_str("!")?;
                }
                write!(f, "{id}")
            }
            Target::Record(k) => write!(f, "rec[-{k}]"),
            Target::Sweep(k) => write!(f, "sweep[{k}]"),
            Target::Pauli {
                basis,
                id,
                inverted,
            } => {
                if *inverted {
                    f.write_str("!")?;
                }
                write!(f, "{basis}{id}")
            }
            Target::Combiner => f.write_str("*"),
        }
    }
}

/// A complete instruction with targets and numeric arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// The gate or annotation.
    pub gate: GateKind,
    /// Ordered targets.
    pub targets: Vec<Target>,
    /// Parenthesized numeric arguments.
    pub args: Vec<f64>,
}

impl Instruction {
    /// Create an instruction without arguments.
    pub fn new(gate: impl Into<GateKind>, targets: impl IntoIterator<Item = Target>) -> Self {
        Self {
            gate: gate.into(),
            targets: targets.into_iter().collect(),
            args: vec![],
        }
    }

    /// Create an instruction acting on plain qubits.
    pub fn on_qubits(gate: StandardGate, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Self::new(gate, qubits.into_iter().map(Target::qubit))
    }

    /// Attach numeric arguments.
    #[must_use]
    pub fn with_args(mut self, args: impl IntoIterator<Item = f64>) -> Self {
        self.args = args.into_iter().collect();
        self
    }

    /// Create a `TICK`.
    pub fn tick() -> Self {
        Self::new(StandardGate::Tick, [])
    }

    /// The standard gate, if any.
    pub fn standard(&self) -> Option<StandardGate> {
        self.gate.as_standard()
    }

    /// Name of the gate.
    pub fn name(&self) -> &str {
        self.gate.name()
    }

    /// Check whether this is the given standard gate.
    pub fn is(&self, gate: StandardGate) -> bool {
        self.standard() == Some(gate)
    }

    /// Targets grouped in consecutive pairs.
    pub fn target_pairs(&self) -> impl Iterator<Item = (Target, Target)> + '_ {
        self.targets.chunks_exact(2).map(|pair| (pair[0], pair[1]))
    }

    /// Qubits addressed by qubit and Pauli targets, in order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.targets.iter().filter_map(Target::qubit_id)
    }

    /// Number of measurement records this instruction produces.
    pub fn num_measurements(&self) -> usize {
        match self.standard() {
            Some(StandardGate::MPP) => {
                let paulis = self
                    .targets
                    .iter()
                    .filter(|t| matches!(t, Target::Pauli { .. }))
                    .count();
                let combiners = self
                    .targets
                    .iter()
                    .filter(|t| matches!(t, Target::Combiner))
                    .count();
                paulis.saturating_sub(combiners)
            }
            Some(g) if g.measurement_basis().is_some() => self.targets.len(),
            _ => 0,
        }
    }

    /// Validate the target list against the gate's shape.
    pub fn validate(&self) -> IrResult<()> {
        let Some(gate) = self.standard() else {
            return Ok(());
        };
        match gate.target_shape() {
            TargetShape::Empty => {
                if !self.targets.is_empty() {
                    return Err(IrError::TargetCountMismatch {
                        gate_name: gate.name().to_string(),
                        expected: "no".into(),
                        got: self.targets.len(),
                    });
                }
            }
            TargetShape::Single => {
                for target in &self.targets {
                    if !target.is_qubit() {
                        return Err(self.invalid_target(target));
                    }
                }
            }
            TargetShape::Pair => self.validate_pairs(gate)?,
            TargetShape::Free => self.validate_free(gate)?,
        }
        Ok(())
    }

    fn validate_pairs(&self, gate: StandardGate) -> IrResult<()> {
        if self.targets.len() % 2 != 0 {
            return Err(IrError::TargetCountMismatch {
                gate_name: gate.name().to_string(),
                expected: "an even number of".into(),
                got: self.targets.len(),
            });
        }
        let classical_allowed = gate.interaction_bases().is_some();
        for (a, b) in self.target_pairs() {
            for t in [a, b] {
                let ok = t.is_qubit() || (classical_allowed && t.is_classical());
                if !ok {
                    return Err(self.invalid_target(&t));
                }
            }
            if a.is_classical() && b.is_classical() {
                return Err(self.invalid_target(&b));
            }
            if let (Some(qa), Some(qb)) = (a.qubit_id(), b.qubit_id()) {
                if qa == qb {
                    return Err(IrError::DuplicateQubit {
                        qubit: qa,
                        gate_name: Some(gate.name().to_string()),
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_free(&self, gate: StandardGate) -> IrResult<()> {
        let accepts = |t: &Target| match gate {
            StandardGate::QubitCoords => t.is_qubit(),
            StandardGate::Detector => matches!(t, Target::Record(_)),
            StandardGate::ObservableInclude => {
                matches!(t, Target::Record(_) | Target::Pauli { .. })
            }
            StandardGate::ShiftCoords => false,
            _ => matches!(t, Target::Pauli { .. } | Target::Combiner),
        };
        if let Some(bad) = self.targets.iter().find(|t| !accepts(t)) {
            return Err(self.invalid_target(bad));
        }
        Ok(())
    }

    fn invalid_target(&self, target: &Target) -> IrError {
        IrError::InvalidTarget {
            target: target.to_string(),
            gate_name: Some(self.name().to_string()),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())?;
        if !self.args.is_empty() {
            f.write_str("(")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(")")?;
        }
        let mut previous: Option<&Target> = None;
        for target in &self.targets {
            let joined = matches!(target, Target::Combiner)
                || matches!(previous, Some(Target::Combiner));
            if previous.is_none() || !joined {
                f.write_str(" ")?;
            }
            write!(f, "{target}")?;
            previous = Some(target);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_display() {
        assert_eq!(Target::qubit(5u32).to_string(), "5");
        assert_eq!(
            Target::Qubit {
                id: QubitId(2),
                inverted: true
            }
            .to_string(),
            "!2"
        );
        assert_eq!(Target::record(3).to_string(), "rec[-3]");
        assert_eq!(Target::Sweep(0).to_string(), "sweep[0]");
        assert_eq!(Target::pauli(Basis::X, 4u32).to_string(), "X4");
        assert_eq!(Target::Combiner.to_string(), "*");
    }

    #[test]
    fn test_instruction_display() {
        let inst = Instruction::on_qubits(StandardGate::CX, [QubitId(0), QubitId(1)]);
        assert_eq!(inst.to_string(), "CX 0 1");

        let inst = Instruction::new(
            StandardGate::MPP,
            [
                Target::pauli(Basis::X, 0u32),
                Target::Combiner,
                Target::pauli(Basis::Z, 1u32),
                Target::pauli(Basis::Y, 2u32),
            ],
        );
        assert_eq!(inst.to_string(), "MPP X0*Z1 Y2");

        let inst = Instruction::new(StandardGate::QubitCoords, [Target::qubit(3u32)])
            .with_args([1.0, 2.5]);
        assert_eq!(inst.to_string(), "QUBIT_COORDS(1, 2.5) 3");

        assert_eq!(Instruction::tick().to_string(), "TICK");
    }

    #[test]
    fn test_num_measurements() {
        let inst = Instruction::on_qubits(StandardGate::MR, [QubitId(0), QubitId(1)]);
        assert_eq!(inst.num_measurements(), 2);

        let mpp = Instruction::new(
            StandardGate::MPP,
            [
                Target::pauli(Basis::X, 0u32),
                Target::Combiner,
                Target::pauli(Basis::Z, 1u32),
                Target::pauli(Basis::Y, 2u32),
            ],
        );
        assert_eq!(mpp.num_measurements(), 2);

        let h = Instruction::on_qubits(StandardGate::H, [QubitId(0)]);
        assert_eq!(h.num_measurements(), 0);
    }

    #[test]
    fn test_validate_pairs() {
        let odd = Instruction::on_qubits(StandardGate::CZ, [QubitId(0)]);
        assert!(matches!(
            odd.validate(),
            Err(IrError::TargetCountMismatch { got: 1, .. })
        ));

        let dup = Instruction::on_qubits(StandardGate::CZ, [QubitId(0), QubitId(0)]);
        assert!(matches!(dup.validate(), Err(IrError::DuplicateQubit { .. })));

        let feedback = Instruction::new(StandardGate::CX, [Target::record(1), Target::qubit(0u32)]);
        assert!(feedback.validate().is_ok());

        let bad = Instruction::new(StandardGate::Swap, [Target::record(1), Target::qubit(0u32)]);
        assert!(matches!(bad.validate(), Err(IrError::InvalidTarget { .. })));
    }

    #[test]
    fn test_validate_annotations() {
        let det = Instruction::new(StandardGate::Detector, [Target::record(1)]);
        assert!(det.validate().is_ok());

        let bad = Instruction::new(StandardGate::Detector, [Target::qubit(0u32)]);
        assert!(bad.validate().is_err());

        let tick = Instruction::new(StandardGate::Tick, [Target::qubit(0u32)]);
        assert!(tick.validate().is_err());
    }
}
