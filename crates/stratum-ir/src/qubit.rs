//! Qubit identifiers and Pauli bases.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a qubit within a circuit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// One of the three single-qubit Pauli bases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// Pauli X basis.
    X,
    /// Pauli Y basis.
    Y,
    /// Pauli Z basis.
    Z,
}

impl Basis {
    /// All bases in `X, Y, Z` order.
    pub const ALL: [Basis; 3] = [Basis::X, Basis::Y, Basis::Z];

    /// Position of the basis in `X, Y, Z` order.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Basis::X => 0,
            Basis::Y => 1,
            Basis::Z => 2,
        }
    }

    /// The basis at the given position in `X, Y, Z` order.
    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parse a basis from its letter (case-insensitive).
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'X' => Some(Basis::X),
            'Y' => Some(Basis::Y),
            'Z' => Some(Basis::Z),
            _ => None,
        }
    }

    /// The basis letter.
    pub fn as_char(self) -> char {
        match self {
            Basis::X => 'X',
            Basis::Y => 'Y',
            Basis::Z => 'Z',
        }
    }

    /// Exchange the roles of X and Z.
    #[must_use]
    pub fn xz_flipped(self) -> Self {
        match self {
            Basis::X => Basis::Z,
            Basis::Y => Basis::Y,
            Basis::Z => Basis::X,
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}
