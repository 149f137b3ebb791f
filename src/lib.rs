//! Miller-index symmetry engine for crystallographic reflection data
//!
//! This library reduces reflections into the reciprocal-space asymmetric unit
//! and back, classifies them (centric, absent, epsilon, resolution) and
//! converts between the one-column and two-column Friedel layouts.

pub mod config;
pub mod dataset;
pub mod errors;
pub mod interfaces;
pub mod lattice;
pub mod reflections;
pub mod symmetries;

pub use dataset::{Column, ColumnData, ColumnKind, ReflectionBatch, ReflectionDataset};
pub use errors::{ErrorInfo, MetadataField, ReflectionError};
pub use interfaces::{AnomalousSuffixes, MergeState};
pub use lattice::UnitCell;
pub use reflections::MillerIndex;
pub use symmetries::{SpaceGroup, SpaceGroupAdapter, SymOp};

/// Common result type used throughout the library
pub type Result<T> = std::result::Result<T, ReflectionError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
