//! Optimization passes.

mod local;
mod rotations;


pub use local::{LocalOptimization, RemoveIrrelevantTail};
pub use rotations::{MergeRotationsEarlier, RemoveRotationsBeforeResets, RemoveVacuousRotations};

/// Upper bound on repeated local optimization sweeps.
pub const MAX_LOCAL_ROUNDS: u32 = 16;
