//! Built-in compilation passes.
//!
//! - [`canonical`]: basis canonicalization and loop-boundary rotation rolling
//! - [`coords`]: qubit coordinate hoisting
//! - [`optimization`]: layer-merging and rotation clean-up passes
//! - [`verification`]: checks on the final vocabulary

pub mod canonical;
pub mod coords;
pub mod optimization;
pub mod verification;

pub use canonical::{RollLoopRotations, ZBasisCanonicalization};
pub use coords::HoistQubitCoords;
pub use optimization::{
    LocalOptimization, MergeRotationsEarlier, RemoveIrrelevantTail, RemoveRotationsBeforeResets,
    RemoveVacuousRotations,
};
pub use verification::{CanonicalVocabularyVerification, LayerCensus};
