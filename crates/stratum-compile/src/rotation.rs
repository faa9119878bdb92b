//! The six single-qubit Clifford rotations, tracked up to Pauli sign.
//!
//! Each rotation is identified with the permutation it applies to the three
//! Pauli axes. Composition follows time order: `a.then(b)` applies `a` first.

use serde::{Deserialize, Serialize};
use std::fmt;

use stratum_ir::{Basis, StandardGate};

/// A single-qubit Clifford rotation modulo Pauli gates.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Rotation(u8);

/// `COMPOSE[a][b]` is `a` followed by `b`.
const COMPOSE: [[u8; 6]; 6] = [
    [0, 1, 2, 3, 4, 5],
    [1, 0, 5, 4, 3, 2],
    [2, 4, 0, 5, 1, 3],
    [3, 5, 4, 0, 2, 1],
    [4, 2, 3, 1, 5, 0],
    [5, 3, 1, 2, 0, 4],
];

const INVERSE: [u8; 6] = [0, 1, 2, 3, 5, 4];

/// Images of `X, Y, Z` under each rotation.
const IMAGES: [[Basis; 3]; 6] = [
    [Basis::X, Basis::Y, Basis::Z],
    [Basis::Z, Basis::Y, Basis::X],
    [Basis::Y, Basis::X, Basis::Z],
    [Basis::X, Basis::Z, Basis::Y],
    [Basis::Y, Basis::Z, Basis::X],
    [Basis::Z, Basis::X, Basis::Y],
];

impl Rotation {
    /// The identity rotation.
    pub const IDENTITY: Rotation = Rotation(0);
    /// Hadamard, exchanging X and Z.
    pub const H: Rotation = Rotation(1);
    /// Exchanges X and Y.
    pub const H_XY: Rotation = Rotation(2);
    /// Exchanges Y and Z.
    pub const H_YZ: Rotation = Rotation(3);
    /// Cycles X to Y to Z to X.
    pub const C_XYZ: Rotation = Rotation(4);
    /// Cycles Z to Y to X to Z.
    pub const C_ZYX: Rotation = Rotation(5);

    /// All six rotations in label order.
    pub const ALL: [Rotation; 6] = [
        Rotation::IDENTITY,
        Rotation::H,
        Rotation::H_XY,
        Rotation::H_YZ,
        Rotation::C_XYZ,
        Rotation::C_ZYX,
    ];

    /// The rotation with the given label.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Label of this rotation (0 is the identity).
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0)
    }

    /// Whether this is the identity.
    #[inline]
    pub fn is_identity(self) -> bool {
        self.0 == 0
    }

    /// The rotation equivalent to `self` followed by `next`.
    #[inline]
    #[must_use]
    pub fn then(self, next: Rotation) -> Rotation {
        Rotation(COMPOSE[self.index()][next.index()])
    }

    /// The rotation undoing this one.
    #[inline]
    #[must_use]
    pub fn inverse(self) -> Rotation {
        Rotation(INVERSE[self.index()])
    }

    /// Image of a basis under this rotation.
    #[inline]
    pub fn apply(self, basis: Basis) -> Basis {
        IMAGES[self.index()][basis.index()]
    }

    /// The rotation taking `basis` onto Z.
    pub fn to_z(basis: Basis) -> Rotation {
        match basis {
            Basis::X => Rotation::H,
            Basis::Y => Rotation::H_YZ,
            Basis::Z => Rotation::IDENTITY,
        }
    }

    /// This rotation applied `n` times in a row.
    #[must_use]
    pub fn pow(self, n: u64) -> Rotation {
        // Every element's order divides 6.
        let mut result = Rotation::IDENTITY;
        for _ in 0..n % 6 {
            result = result.then(self);
        }
        result
    }

    /// The rotation performed by a single-qubit Clifford gate, if it is one.
    pub fn from_gate(gate: StandardGate) -> Option<Rotation> {
        let rotation = match gate {
            StandardGate::I | StandardGate::X | StandardGate::Y | StandardGate::Z => {
                Rotation::IDENTITY
            }
            StandardGate::H | StandardGate::SqrtY | StandardGate::SqrtYDag => Rotation::H,
            StandardGate::HXY | StandardGate::S | StandardGate::SDag => Rotation::H_XY,
            StandardGate::HYZ | StandardGate::SqrtX | StandardGate::SqrtXDag => Rotation::H_YZ,
            StandardGate::CXyz => Rotation::C_XYZ,
            StandardGate::CZyx => Rotation::C_ZYX,
            _ => return None,
        };
        Some(rotation)
    }

    /// Canonical gate performing this rotation, or `None` for the identity.
    pub fn gate(self) -> Option<StandardGate> {
        match self.0 {
            1 => Some(StandardGate::H),
            2 => Some(StandardGate::HXY),
            3 => Some(StandardGate::HYZ),
            4 => Some(StandardGate::CXyz),
            5 => Some(StandardGate::CZyx),
            _ => None,
        }
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.gate() {
            Some(gate) => f.write_str(gate.name()),
            None => f.write_str("I"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn arb_rotation() -> impl Strategy<Value = Rotation> {
        (0_usize..6).prop_map(|i| Rotation::ALL[i])
    }

    #[test]
    fn test_inverse_cancels() {
        for r in Rotation::ALL {
            assert!(r.then(r.inverse()).is_identity());
            assert!(r.inverse().then(r).is_identity());
        }
    }

    #[test]
    fn test_self_inverse_elements() {
        let self_inverse: Vec<_> = Rotation::ALL
            .into_iter()
            .filter(|r| r.inverse() == *r)
            .collect();
        assert_eq!(
            self_inverse,
            vec![Rotation::IDENTITY, Rotation::H, Rotation::H_XY, Rotation::H_YZ]
        );
        assert_eq!(Rotation::C_XYZ.inverse(), Rotation::C_ZYX);
    }

    #[test]
    fn test_composition_matches_permutations() {
        for a in Rotation::ALL {
            for b in Rotation::ALL {
                let ab = a.then(b);
                for basis in Basis::ALL {
                    assert_eq!(ab.apply(basis), b.apply(a.apply(basis)));
                }
            }
        }
    }

    #[test]
    fn test_composition_is_not_commutative() {
        assert_ne!(Rotation::H.then(Rotation::H_XY), Rotation::H_XY.then(Rotation::H));
    }

    #[test]
    fn test_to_z() {
        for basis in Basis::ALL {
            let r = Rotation::to_z(basis);
            assert_eq!(r.apply(basis), Basis::Z);
            assert_eq!(r.inverse().apply(Basis::Z), basis);
        }
    }

    #[test]
    fn test_gate_round_trip() {
        for r in Rotation::ALL {
            match r.gate() {
                Some(gate) => assert_eq!(Rotation::from_gate(gate), Some(r)),
                None => assert!(r.is_identity()),
            }
        }
        assert_eq!(Rotation::from_gate(StandardGate::S), Some(Rotation::H_XY));
        assert_eq!(Rotation::from_gate(StandardGate::SqrtXDag), Some(Rotation::H_YZ));
        assert_eq!(Rotation::from_gate(StandardGate::Y), Some(Rotation::IDENTITY));
        assert_eq!(Rotation::from_gate(StandardGate::CX), None);
    }

    #[test]
    fn test_pow() {
        assert_eq!(Rotation::H.pow(5), Rotation::H);
        assert_eq!(Rotation::H.pow(4), Rotation::IDENTITY);
        assert_eq!(Rotation::C_XYZ.pow(2), Rotation::C_ZYX);
        assert_eq!(Rotation::C_XYZ.pow(3), Rotation::IDENTITY);
        assert_eq!(Rotation::H_YZ.pow(0), Rotation::IDENTITY);
    }

    proptest! {
        #[test]
        fn test_composition_is_associative(
            a in arb_rotation(),
            b in arb_rotation(),
            c in arb_rotation(),
        ) {
            prop_assert_eq!(a.then(b).then(c), a.then(b.then(c)));
        }

        #[test]
        fn test_inverse_of_composition(a in arb_rotation(), b in arb_rotation()) {
            prop_assert_eq!(a.then(b).inverse(), b.inverse().then(a.inverse()));
        }

        #[test]
        fn test_pow_matches_repeated_composition(a in arb_rotation(), n in 0_u64..20) {
            let mut expected = Rotation::IDENTITY;
            for _ in 0..n {
                expected = expected.then(a);
            }
            prop_assert_eq!(a.pow(n), expected);
        }
    }
}
