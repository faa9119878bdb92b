//! Stratum Circuit Intermediate Representation
//!
//! This crate provides the flat instruction-stream representation of
//! stabilizer circuits used throughout Stratum. It is the input and output
//! format of the canonicalization pipeline in `stratum-compile` and the
//! in-memory form of the text format handled by `stratum-stim`.
//!
//! # Core Components
//!
//! - **Qubits and bases**: [`QubitId`] addresses a qubit, [`Basis`] names one
//!   of the three Pauli axes
//! - **Gates**: [`StandardGate`] for the known instruction set and
//!   [`GateKind::Custom`] for names the IR does not recognize
//! - **Targets**: [`Target`] covers qubits, inverted qubits, measurement
//!   record lookbacks, sweep bits, Pauli targets and the `*` combiner
//! - **Instructions**: [`Instruction`] combining a gate, targets and numeric
//!   arguments
//! - **Circuit**: [`Circuit`] builder over [`Operation`]s, including nested
//!   [`RepeatBlock`]s
//!
//! # Example: Measuring a Bell pair
//!
//! ```rust
//! use stratum_ir::{Basis, Circuit, QubitId};
//!
//! let mut circuit = Circuit::new();
//! circuit.h(QubitId(0)).unwrap();
//! circuit.tick().unwrap();
//! circuit.cx(QubitId(0), QubitId(1)).unwrap();
//! circuit.tick().unwrap();
//! circuit.measure(Basis::Z, QubitId(0)).unwrap();
//! circuit.measure(Basis::Z, QubitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.num_ticks(), 2);
//! assert_eq!(circuit.num_measurements(), 2);
//! ```
//!
//! # Instruction Families
//!
//! | Family | Gates |
//! |--------|-------|
//! | Single-qubit Clifford | `I X Y Z H H_XY H_YZ S S_DAG SQRT_X(_DAG) SQRT_Y(_DAG) C_XYZ C_ZYX` |
//! | Collapsing | `R RX RY M MX MY MR MRX MRY MPP` |
//! | Controlled Pauli | `CX CY CZ XCX XCY XCZ YCX YCY YCZ` |
//! | Other two-qubit | `SWAP ISWAP(_DAG) SQRT_XX SQRT_YY SQRT_ZZ (_DAG) CXSWAP SWAPCX CZSWAP` |
//! | Noise | `X_ERROR Y_ERROR Z_ERROR DEPOLARIZE1/2 PAULI_CHANNEL_1/2 E ELSE_CORRELATED_ERROR` |
//! | Annotations | `TICK QUBIT_COORDS DETECTOR OBSERVABLE_INCLUDE SHIFT_COORDS` |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::{Circuit, Operation, RepeatBlock};
pub use error::{IrError, IrResult};
pub use gate::{GateKind, StandardGate, TargetShape};
pub use instruction::{Instruction, Target};
pub use qubit::{Basis, QubitId};
