//! Gate and annotation names.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::qubit::Basis;

/// Standard instructions with known semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    // Structure and annotations
    /// Timing-layer boundary.
    Tick,
    /// Qubit coordinate annotation.
    QubitCoords,
    /// Detector annotation.
    Detector,
    /// Logical observable annotation.
    ObservableInclude,
    /// Coordinate offset annotation.
    ShiftCoords,

    // Single-qubit Clifford gates
    /// Identity gate.
    I,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// Hadamard gate (X <-> Z).
    H,
    /// Hadamard-like gate exchanging X and Y.
    HXY,
    /// Hadamard-like gate exchanging Y and Z.
    HYZ,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    SDag,
    /// sqrt(X) gate.
    SqrtX,
    /// sqrt(X)-dagger gate.
    SqrtXDag,
    /// sqrt(Y) gate.
    SqrtY,
    /// sqrt(Y)-dagger gate.
    SqrtYDag,
    /// Axis cycling gate X -> Y -> Z -> X.
    CXyz,
    /// Axis cycling gate Z -> Y -> X -> Z.
    CZyx,

    // Collapsing gates
    /// Z-basis reset.
    R,
    /// X-basis reset.
    RX,
    /// Y-basis reset.
    RY,
    /// Z-basis measurement.
    M,
    /// X-basis measurement.
    MX,
    /// Y-basis measurement.
    MY,
    /// Z-basis measure-then-reset.
    MR,
    /// X-basis measure-then-reset.
    MRX,
    /// Y-basis measure-then-reset.
    MRY,
    /// Multi-qubit Pauli product measurement.
    MPP,

    // Two-qubit gates
    /// Z-controlled X (CNOT).
    CX,
    /// Z-controlled Y.
    CY,
    /// Z-controlled Z.
    CZ,
    /// X-controlled X.
    XCX,
    /// X-controlled Y.
    XCY,
    /// X-controlled Z.
    XCZ,
    /// Y-controlled X.
    YCX,
    /// Y-controlled Y.
    YCY,
    /// Y-controlled Z.
    YCZ,
    /// SWAP gate.
    Swap,
    /// iSWAP gate.
    ISwap,
    /// iSWAP-dagger gate.
    ISwapDag,
    /// sqrt(XX) gate.
    SqrtXX,
    /// sqrt(XX)-dagger gate.
    SqrtXXDag,
    /// sqrt(YY) gate.
    SqrtYY,
    /// sqrt(YY)-dagger gate.
    SqrtYYDag,
    /// sqrt(ZZ) gate.
    SqrtZZ,
    /// sqrt(ZZ)-dagger gate.
    SqrtZZDag,
    /// CX followed by SWAP.
    CXSwap,
    /// SWAP followed by CX.
    SwapCX,
    /// CZ followed by SWAP.
    CZSwap,

    // Noise channels
    /// Single-qubit X flip channel.
    XError,
    /// Single-qubit Y flip channel.
    YError,
    /// Single-qubit Z flip channel.
    ZError,
    /// Single-qubit depolarizing channel.
    Depolarize1,
    /// Two-qubit depolarizing channel.
    Depolarize2,
    /// General single-qubit Pauli channel.
    PauliChannel1,
    /// General two-qubit Pauli channel.
    PauliChannel2,
    /// Correlated Pauli error.
    CorrelatedError,
    /// Correlated Pauli error applied only if the previous one did not fire.
    ElseCorrelatedError,
}

/// How an instruction's targets are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetShape {
    /// Any number of independent single-qubit targets.
    Single,
    /// Targets are consumed in pairs.
    Pair,
    /// Free-form target list (annotations, Pauli products).
    Free,
    /// No targets allowed.
    Empty,
}

impl StandardGate {
    /// Every standard gate, in declaration order.
    pub const ALL: [StandardGate; 60] = [
        StandardGate::Tick,
        StandardGate::QubitCoords,
        StandardGate::Detector,
        StandardGate::ObservableInclude,
        StandardGate::ShiftCoords,
        StandardGate::I,
        StandardGate::X,
        StandardGate::Y,
        StandardGate::Z,
        StandardGate::H,
        StandardGate::HXY,
        StandardGate::HYZ,
        StandardGate::S,
        StandardGate::SDag,
        StandardGate::SqrtX,
        StandardGate::SqrtXDag,
        StandardGate::SqrtY,
        StandardGate::SqrtYDag,
        StandardGate::CXyz,
        StandardGate::CZyx,
        StandardGate::R,
        StandardGate::RX,
        StandardGate::RY,
        StandardGate::M,
        StandardGate::MX,
        StandardGate::MY,
        StandardGate::MR,
        StandardGate::MRX,
        StandardGate::MRY,
        StandardGate::MPP,
        StandardGate::CX,
        StandardGate::CY,
        StandardGate::CZ,
        StandardGate::XCX,
        StandardGate::XCY,
        StandardGate::XCZ,
        StandardGate::YCX,
        StandardGate::YCY,
        StandardGate::YCZ,
        StandardGate::Swap,
        StandardGate::ISwap,
        StandardGate::ISwapDag,
        StandardGate::SqrtXX,
        StandardGate::SqrtXXDag,
        StandardGate::SqrtYY,
        StandardGate::SqrtYYDag,
        StandardGate::SqrtZZ,
        StandardGate::SqrtZZDag,
        StandardGate::CXSwap,
        StandardGate::SwapCX,
        StandardGate::CZSwap,
        StandardGate::XError,
        StandardGate::YError,
        StandardGate::ZError,
        StandardGate::Depolarize1,
        StandardGate::Depolarize2,
        StandardGate::PauliChannel1,
        StandardGate::PauliChannel2,
        StandardGate::CorrelatedError,
        StandardGate::ElseCorrelatedError,
    ];

    /// Get the canonical name of this gate.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::Tick => "TICK",
            StandardGate::QubitCoords => "QUBIT_COORDS",
            StandardGate::Detector => "DETECTOR",
            StandardGate::ObservableInclude => "OBSERVABLE_INCLUDE",
            StandardGate::ShiftCoords => "SHIFT_COORDS",
            StandardGate::I => "I",
            StandardGate::X => "X",
            StandardGate::Y => "Y",
            StandardGate::Z => "Z",
            StandardGate::H => "H",
            StandardGate::HXY => "H_XY",
            StandardGate::HYZ => "H_YZ",
            StandardGate::S => "S",
            StandardGate::SDag => "S_DAG",
            StandardGate::SqrtX => "SQRT_X",
            StandardGate::SqrtXDag => "SQRT_X_DAG",
            StandardGate::SqrtY => "SQRT_Y",
            StandardGate::SqrtYDag => "SQRT_Y_DAG",
            StandardGate::CXyz => "C_XYZ",
            StandardGate::CZyx => "C_ZYX",
            StandardGate::R => "R",
            StandardGate::RX => "RX",
            StandardGate::RY => "RY",
            StandardGate::M => "M",
            StandardGate::MX => "MX",
            StandardGate::MY => "MY",
            StandardGate::MR => "MR",
            StandardGate::MRX => "MRX",
            StandardGate::MRY => "MRY",
            StandardGate::MPP => "MPP",
            StandardGate::CX => "CX",
            StandardGate::CY => "CY",
            StandardGate::CZ => "CZ",
            StandardGate::XCX => "XCX",
            StandardGate::XCY => "XCY",
            StandardGate::XCZ => "XCZ",
            StandardGate::YCX => "YCX",
            StandardGate::YCY => "YCY",
            StandardGate::YCZ => "YCZ",
            StandardGate::Swap => "SWAP",
            StandardGate::ISwap => "ISWAP",
            StandardGate::ISwapDag => "ISWAP_DAG",
            StandardGate::SqrtXX => "SQRT_XX",
            StandardGate::SqrtXXDag => "SQRT_XX_DAG",
            StandardGate::SqrtYY => "SQRT_YY",
            StandardGate::SqrtYYDag => "SQRT_YY_DAG",
            StandardGate::SqrtZZ => "SQRT_ZZ",
            StandardGate::SqrtZZDag => "SQRT_ZZ_DAG",
            StandardGate::CXSwap => "CXSWAP",
            StandardGate::SwapCX => "SWAPCX",
            StandardGate::CZSwap => "CZSWAP",
            StandardGate::XError => "X_ERROR",
            StandardGate::YError => "Y_ERROR",
            StandardGate::ZError => "Z_ERROR",
            StandardGate::Depolarize1 => "DEPOLARIZE1",
            StandardGate::Depolarize2 => "DEPOLARIZE2",
            StandardGate::PauliChannel1 => "PAULI_CHANNEL_1",
            StandardGate::PauliChannel2 => "PAULI_CHANNEL_2",
            StandardGate::CorrelatedError => "E",
            StandardGate::ElseCorrelatedError => "ELSE_CORRELATED_ERROR",
        }
    }

    /// Look up a gate by name, accepting aliases. Names are case-insensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.to_ascii_uppercase();
        let gate = match upper.as_str() {
            "CNOT" | "ZCX" => StandardGate::CX,
            "ZCY" => StandardGate::CY,
            "ZCZ" => StandardGate::CZ,
            "H_XZ" => StandardGate::H,
            "SQRT_Z" => StandardGate::S,
            "SQRT_Z_DAG" => StandardGate::SDag,
            "RZ" => StandardGate::R,
            "MZ" => StandardGate::M,
            "MRZ" => StandardGate::MR,
            "SWAPCZ" => StandardGate::CZSwap,
            "CORRELATED_ERROR" => StandardGate::CorrelatedError,
            other => return Self::ALL.iter().copied().find(|g| g.name() == other),
        };
        Some(gate)
    }

    /// How this gate consumes its targets.
    pub fn target_shape(&self) -> TargetShape {
        match self {
            StandardGate::Tick => TargetShape::Empty,

            StandardGate::QubitCoords
            | StandardGate::Detector
            | StandardGate::ObservableInclude
            | StandardGate::ShiftCoords
            | StandardGate::MPP
            | StandardGate::CorrelatedError
            | StandardGate::ElseCorrelatedError => TargetShape::Free,

            StandardGate::CX
            | StandardGate::CY
            | StandardGate::CZ
            | StandardGate::XCX
            | StandardGate::XCY
            | StandardGate::XCZ
            | StandardGate::YCX
            | StandardGate::YCY
            | StandardGate::YCZ
            | StandardGate::Swap
            | StandardGate::ISwap
            | StandardGate::ISwapDag
            | StandardGate::SqrtXX
            | StandardGate::SqrtXXDag
            | StandardGate::SqrtYY
            | StandardGate::SqrtYYDag
            | StandardGate::SqrtZZ
            | StandardGate::SqrtZZDag
            | StandardGate::CXSwap
            | StandardGate::SwapCX
            | StandardGate::CZSwap
            | StandardGate::Depolarize2
            | StandardGate::PauliChannel2 => TargetShape::Pair,

            _ => TargetShape::Single,
        }
    }

    /// Annotations carry metadata and never act on qubit states.
    pub fn is_annotation(&self) -> bool {
        matches!(
            self,
            StandardGate::QubitCoords
                | StandardGate::Detector
                | StandardGate::ObservableInclude
                | StandardGate::ShiftCoords
        )
    }

    /// Whether two adjacent instructions of this gate with equal arguments
    /// may be combined into one instruction without changing meaning.
    pub fn is_fusable(&self) -> bool {
        !self.is_annotation()
            && !matches!(
                self,
                StandardGate::Tick | StandardGate::CorrelatedError | StandardGate::ElseCorrelatedError
            )
    }

    /// Whether the gate is a noise channel.
    pub fn is_noise(&self) -> bool {
        matches!(
            self,
            StandardGate::XError
                | StandardGate::YError
                | StandardGate::ZError
                | StandardGate::Depolarize1
                | StandardGate::Depolarize2
                | StandardGate::PauliChannel1
                | StandardGate::PauliChannel2
                | StandardGate::CorrelatedError
                | StandardGate::ElseCorrelatedError
        )
    }

    /// Whether the gate produces measurement records.
    pub fn produces_records(&self) -> bool {
        self.measurement_basis().is_some() || matches!(self, StandardGate::MPP)
    }

    /// Basis of a single-qubit measurement (including measure-reset).
    pub fn measurement_basis(&self) -> Option<Basis> {
        match self {
            StandardGate::M | StandardGate::MR => Some(Basis::Z),
            StandardGate::MX | StandardGate::MRX => Some(Basis::X),
            StandardGate::MY | StandardGate::MRY => Some(Basis::Y),
            _ => None,
        }
    }

    /// Basis of a reset (including measure-reset).
    pub fn reset_basis(&self) -> Option<Basis> {
        match self {
            StandardGate::R | StandardGate::MR => Some(Basis::Z),
            StandardGate::RX | StandardGate::MRX => Some(Basis::X),
            StandardGate::RY | StandardGate::MRY => Some(Basis::Y),
            _ => None,
        }
    }

    /// Measurement gate for a basis.
    pub fn measurement(basis: Basis) -> Self {
        match basis {
            Basis::X => StandardGate::MX,
            Basis::Y => StandardGate::MY,
            Basis::Z => StandardGate::M,
        }
    }

    /// Reset gate for a basis.
    pub fn reset(basis: Basis) -> Self {
        match basis {
            Basis::X => StandardGate::RX,
            Basis::Y => StandardGate::RY,
            Basis::Z => StandardGate::R,
        }
    }

    /// Bases of a controlled Pauli gate `{B1}C{B2}`, first then second operand.
    pub fn interaction_bases(&self) -> Option<(Basis, Basis)> {
        let bases = match self {
            StandardGate::CX => (Basis::Z, Basis::X),
            StandardGate::CY => (Basis::Z, Basis::Y),
            StandardGate::CZ => (Basis::Z, Basis::Z),
            StandardGate::XCX => (Basis::X, Basis::X),
            StandardGate::XCY => (Basis::X, Basis::Y),
            StandardGate::XCZ => (Basis::X, Basis::Z),
            StandardGate::YCX => (Basis::Y, Basis::X),
            StandardGate::YCY => (Basis::Y, Basis::Y),
            StandardGate::YCZ => (Basis::Y, Basis::Z),
            _ => return None,
        };
        Some(bases)
    }

    /// Controlled Pauli gate `{first}C{second}`.
    pub fn from_interaction_bases(first: Basis, second: Basis) -> Self {
        match (first, second) {
            (Basis::Z, Basis::X) => StandardGate::CX,
            (Basis::Z, Basis::Y) => StandardGate::CY,
            (Basis::Z, Basis::Z) => StandardGate::CZ,
            (Basis::X, Basis::X) => StandardGate::XCX,
            (Basis::X, Basis::Y) => StandardGate::XCY,
            (Basis::X, Basis::Z) => StandardGate::XCZ,
            (Basis::Y, Basis::X) => StandardGate::YCX,
            (Basis::Y, Basis::Y) => StandardGate::YCY,
            (Basis::Y, Basis::Z) => StandardGate::YCZ,
        }
    }

    /// Basis and dagger flag of a sqrt Pauli-product gate.
    pub fn sqrt_pauli_product(&self) -> Option<(Basis, bool)> {
        match self {
            StandardGate::SqrtXX => Some((Basis::X, false)),
            StandardGate::SqrtXXDag => Some((Basis::X, true)),
            StandardGate::SqrtYY => Some((Basis::Y, false)),
            StandardGate::SqrtYYDag => Some((Basis::Y, true)),
            StandardGate::SqrtZZ => Some((Basis::Z, false)),
            StandardGate::SqrtZZDag => Some((Basis::Z, true)),
            _ => None,
        }
    }

    /// Sqrt Pauli-product gate for a basis.
    pub fn from_sqrt_pauli_product(basis: Basis, dagger: bool) -> Self {
        match (basis, dagger) {
            (Basis::X, false) => StandardGate::SqrtXX,
            (Basis::X, true) => StandardGate::SqrtXXDag,
            (Basis::Y, false) => StandardGate::SqrtYY,
            (Basis::Y, true) => StandardGate::SqrtYYDag,
            (Basis::Z, false) => StandardGate::SqrtZZ,
            (Basis::Z, true) => StandardGate::SqrtZZDag,
        }
    }
}

impl fmt::Display for StandardGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An instruction name, either standard or unknown to the IR.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// A standard gate with known semantics.
    Standard(StandardGate),
    /// A gate name the IR does not recognize, kept verbatim.
    Custom(String),
}

impl GateKind {
    /// Resolve a name to a standard gate when possible.
    pub fn from_name(name: &str) -> Self {
        match StandardGate::from_name(name) {
            Some(gate) => GateKind::Standard(gate),
            None => GateKind::Custom(name.to_string()),
        }
    }

    /// Get the name of this gate.
    #[inline]
    pub fn name(&self) -> &str {
        match self {
            GateKind::Standard(g) => g.name(),
            GateKind::Custom(name) => name,
        }
    }

    /// The standard gate, if any.
    pub fn as_standard(&self) -> Option<StandardGate> {
        match self {
            GateKind::Standard(g) => Some(*g),
            GateKind::Custom(_) => None,
        }
    }
}

impl From<StandardGate> for GateKind {
    fn from(gate: StandardGate) -> Self {
        GateKind::Standard(gate)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
