// Symmetries module: Contains symmetry operations and the space group adapter
// This module provides the group-action primitives consumed by the reflection engine

// ======================== MODULE DECLARATIONS ========================
pub mod space_groups;
pub mod symmetry_operations;

// Test modules
mod _tests_space_groups;

// ======================== SYMMETRY OPERATIONS ========================
pub use symmetry_operations::SymOp; // struct - crystallographic symmetry operation (integer rotation + translation in 1/24)
// SymOp impl methods:
//   new(rotation: Matrix3<i32>, translation: Vector3<i32>) -> Self - wraps translation into [0, 24)
//   identity() -> Self                                             - creates identity symmetry operation
//   from_triplet(triplet: &str) -> Result<Self>                    - parses "-x+1/2,y,-z" style operations
//   triplet(&self) -> String                                       - renders the coordinate triplet
//   compose(&self, other: &Self) -> Self                           - self ∘ other
//   inverse(&self) -> Self                                         - exact integer inverse
//   friedel_negated(&self) -> Self                                 - rotation negated, translation kept
//   apply_to_hkl(&self, hkl: &MillerIndex) -> MillerIndex          - h' = h·R
//   phase_shift(&self, hkl: &MillerIndex) -> f64                   - -2π·h·t in radians
//   phase_shift_degrees(&self, hkl: &MillerIndex) -> f64           - exact -15·(h·t₂₄)

// ======================== SPACE GROUPS ========================
pub use space_groups::{
    LaueClass,                 // enum - Laue classes with their CCP4 reciprocal ASU predicate
    SpaceGroup,                // struct - table-driven space group (reference adapter)
    SpaceGroupAdapter,         // trait - operations, ASU predicate, centering, absences
    builtin_space_group_names, // fn() -> Vec<&'static str> - names available to SpaceGroup::from_name
};
