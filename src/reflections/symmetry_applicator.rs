use crate::config::MAX_MILLER_INDEX;
use crate::errors::{ErrorInfo, ReflectionError};
use crate::reflections::MillerIndex;
use crate::symmetries::SymOp;
use crate::Result;

/// Reject indices with a component outside `±MAX_MILLER_INDEX`.
///
/// Rotations with entries in {-1, 0, 1} and Friedel negation stay in range
/// for every index that passes.
pub fn validate_indices(hkls: &[MillerIndex]) -> Result<()> {
    match hkls
        .iter()
        .position(|hkl| hkl.iter().any(|h| h.unsigned_abs() > MAX_MILLER_INDEX as u32))
    {
        Some(row) => Err(ReflectionError::validation(
            ErrorInfo::new("Miller index out of range")
                .with_context("row", row)
                .with_context("hkl", format!("{:?}", hkls[row]))
                .with_context("max", MAX_MILLER_INDEX),
        )),
        None => Ok(()),
    }
}

/// Apply `op` to every index, `H' = H·R`. Translations do not touch integer indices.
pub fn apply_to_hkl(hkls: &[MillerIndex], op: &SymOp) -> Vec<MillerIndex> {
    hkls.iter().map(|hkl| op.apply_to_hkl(hkl)).collect()
}

/// Phase shift in radians for each index, `-2π·(H·t)`.
pub fn phase_shift(hkls: &[MillerIndex], op: &SymOp) -> Vec<f64> {
    hkls.iter().map(|hkl| op.phase_shift(hkl)).collect()
}

/// Phase shift in degrees for each index.
pub fn phase_shift_degrees(hkls: &[MillerIndex], op: &SymOp) -> Vec<f64> {
    hkls.iter().map(|hkl| op.phase_shift_degrees(hkl)).collect()
}
