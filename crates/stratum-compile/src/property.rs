//! `PropertySet` for pass communication.
//!
//! Passes share data through a [`PropertySet`]: a few standard fields set up
//! by the [`PassManagerBuilder`](crate::PassManagerBuilder) plus arbitrary
//! typed properties written by analysis passes.
//!
//! # Examples
//!
//! ```
//! use stratum_compile::PropertySet;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct RotationsMerged(usize);
//!
//! let mut props = PropertySet::new().with_whole_circuit(false);
//! assert!(!props.whole_circuit);
//!
//! props.insert(RotationsMerged(3));
//! assert_eq!(props.get::<RotationsMerged>(), Some(&RotationsMerged(3)));
//! ```

use rustc_hash::FxHashMap;
use std::any::{Any, TypeId};

/// Shared state threaded through every pass of a pipeline run.
#[derive(Debug)]
pub struct PropertySet {
    /// Whether the circuit is complete, as opposed to a fragment that other
    /// circuits will be appended to. Only complete circuits may lose layers
    /// that no measurement depends on.
    pub whole_circuit: bool,

    /// Custom properties storage (type-erased).
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl Default for PropertySet {
    fn default() -> Self {
        Self {
            whole_circuit: true,
            custom: FxHashMap::default(),
        }
    }
}

impl PropertySet {
    /// Create a property set for a whole circuit.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_whole_circuit(mut self, whole_circuit: bool) -> Self {
        self.whole_circuit = whole_circuit;
        self
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_whole_circuit() {
        assert!(PropertySet::new().whole_circuit);
        assert!(!PropertySet::new().with_whole_circuit(false).whole_circuit);
    }

    #[test]
    #[allow(clippy::items_after_statements)]
    fn test_property_set_custom() {
        let mut props = PropertySet::new();

        #[derive(Debug, PartialEq)]
        struct CustomData(i32);

        props.insert(CustomData(42));
        assert_eq!(props.get::<CustomData>(), Some(&CustomData(42)));

        if let Some(data) = props.get_mut::<CustomData>() {
            data.0 += 1;
        }

        let removed = props.remove::<CustomData>();
        assert_eq!(removed, Some(CustomData(43)));
        assert_eq!(props.get::<CustomData>(), None);
    }
}
