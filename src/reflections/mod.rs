// Reflections module: the Miller-index symmetry engine
// This module maps reflections into and out of the reciprocal-space ASU, classifies them and handles phases

// ======================== MODULE DECLARATIONS ========================
pub mod asu;
pub mod binning;
pub mod classification;
pub mod m_isym;
pub mod phases;
pub mod structure_factors;
pub mod symmetry_applicator;
pub mod unique;

mod _tests_classification;

/// Miller index (H, K, L).
pub type MillerIndex = [i32; 3];

// ======================== SYMMETRY APPLICATION ========================
pub use symmetry_applicator::{
    apply_to_hkl,        // fn(hkls: &[MillerIndex], op: &SymOp) -> Vec<MillerIndex> - H' = H·R
    phase_shift,         // fn(hkls: &[MillerIndex], op: &SymOp) -> Vec<f64> - -2π·H·t in radians
    phase_shift_degrees, // fn(hkls: &[MillerIndex], op: &SymOp) -> Vec<f64> - same in degrees
    validate_indices,    // fn(hkls: &[MillerIndex]) -> Result<()> - components within ±MAX_MILLER_INDEX
};

// ======================== ASU REDUCTION & EXPANSION ========================
pub use asu::{
    AsuMapping,      // struct - ASU indices, isym, phase coefficient and shift per row
    ObservedMapping, // struct - observed indices, phase coefficient and shift per row
    hkl_to_asu,      // fn(hkls, spacegroup) -> Result<AsuMapping> - first-match reduction into the ASU
    hkl_to_observed, // fn(hkls, isym, spacegroup) -> Result<ObservedMapping> - inverse of hkl_to_asu
    in_asu,          // fn(hkls, spacegroup) -> Vec<bool> - ASU membership
};

// AsuMapping / ObservedMapping impl methods:
//   transform_phases(&self, phases: &[f64]) -> Result<Vec<f64>>    - coeff·(φ + shift), canonicalized

// ======================== M/ISYM CODEC ========================
pub use m_isym::{
    decode_m_isym,        // fn(code: i32) -> Result<(i32, bool)> - (code % 256, code / 256 != 0)
    decode_m_isym_column, // fn(codes: &[i32]) -> Result<(Vec<i32>, Vec<bool>)>
    encode_m_isym,        // fn(isym: i32, partial: bool) -> Result<i32> - isym + 256·partial
    encode_m_isym_column, // fn(isym: &[i32], partial: &[bool]) -> Result<Vec<i32>>
};

// ======================== PHASES ========================
pub use phases::{
    canonicalize_phase,  // fn(phase: f64) -> f64 - wrap degrees into (-180, 180]
    canonicalize_phases, // fn(phases: &[f64]) -> Vec<f64>
};

// ======================== CLASSIFICATION ========================
pub use classification::{
    compute_dhkl,                         // fn(hkls, cell) -> Result<Vec<f64>> - d-spacing, triclinic-safe
    compute_structurefactor_multiplicity, // fn(hkls, spacegroup, include_centering) -> Vec<i32> - epsilon
    is_absent,                            // fn(hkls, spacegroup) -> Vec<bool> - systematic absences
    is_centric,                           // fn(hkls, spacegroup) -> Vec<bool> - centric reflections
};

// ======================== STRUCTURE FACTORS & BINNING ========================
pub use binning::bin_by_percentile;
pub use structure_factors::{from_structurefactor, to_structurefactor};
pub use unique::unique_with_inverse;
