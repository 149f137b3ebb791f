//! Per-reflection classification: centricity, systematic absences,
//! structure-factor multiplicity (epsilon) and resolution (dHKL).
//!
//! All functions are pure, batched and preserve the input order. Indices are
//! expected to pass [`validate_indices`](crate::reflections::validate_indices);
//! the dataset-level wrappers check this.

use crate::lattice::UnitCell;
use crate::reflections::MillerIndex;
use crate::symmetries::SpaceGroupAdapter;
use crate::Result;

/// `true` where `-H` is symmetry-equivalent to `H`, i.e. some operation maps `H` onto `-H`.
pub fn is_centric(hkls: &[MillerIndex], spacegroup: &dyn SpaceGroupAdapter) -> Vec<bool> {
    hkls.iter()
        .map(|hkl| {
            let friedel_mate = [-hkl[0], -hkl[1], -hkl[2]];
            spacegroup
                .operations()
                .iter()
                .any(|op| op.apply_to_hkl(hkl) == friedel_mate)
        })
        .collect()
}

/// `true` where translational symmetry forces the structure factor to vanish.
pub fn is_absent(hkls: &[MillerIndex], spacegroup: &dyn SpaceGroupAdapter) -> Vec<bool> {
    hkls.iter()
        .map(|hkl| spacegroup.is_systematically_absent(hkl))
        .collect()
}

/// Epsilon factor: order of the stabilizer of each index.
///
/// Counts operations with `H·R == H`. With `include_centering` every
/// centering translation contributes a copy of each operation. Never below 1.
pub fn compute_structurefactor_multiplicity(
    hkls: &[MillerIndex],
    spacegroup: &dyn SpaceGroupAdapter,
    include_centering: bool,
) -> Vec<i32> {
    let centering_factor = if include_centering {
        spacegroup.centering_vectors().len().max(1)
    } else {
        1
    };
    hkls.iter()
        .map(|hkl| {
            let fixed = spacegroup
                .operations()
                .iter()
                .filter(|op| op.apply_to_hkl(hkl) == *hkl)
                .count();
            (fixed * centering_factor).max(1) as i32
        })
        .collect()
}

/// Lattice-plane spacing `d` (Å) for each index, valid for triclinic cells.
pub fn compute_dhkl(hkls: &[MillerIndex], cell: &UnitCell) -> Result<Vec<f64>> {
    let reciprocal_metric = cell.reciprocal_metric_tensor()?;
    Ok(hkls
        .iter()
        .map(|hkl| UnitCell::d_spacing_with(&reciprocal_metric, hkl))
        .collect())
}
