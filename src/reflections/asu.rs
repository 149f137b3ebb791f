//! Reciprocal-space ASU reduction and its inverse
//!
//! Candidates are scanned in the order op0, -op0, op1, -op1, ... and the first
//! image inside the ASU wins. The chosen candidate is recorded as
//! `isym = 2·i + 1` for the plain operation and `2·i + 2` for its
//! Friedel-negated twin. Phases follow `φ' = coeff·(φ + shift)` in both
//! directions, with `coeff = ±1` and `shift` in degrees.

use log::{debug, trace};

use crate::errors::{ErrorInfo, ReflectionError};
use crate::reflections::phases::transform_phase;
use crate::reflections::symmetry_applicator::validate_indices;
use crate::reflections::unique::{broadcast, unique_with_inverse};
use crate::reflections::MillerIndex;
use crate::symmetries::{SpaceGroupAdapter, SymOp};
use crate::Result;

/// Per-row result of [`hkl_to_asu`].
#[derive(Debug, Clone, PartialEq)]
pub struct AsuMapping {
    /// Representative inside the ASU
    pub hkls: Vec<MillerIndex>,
    /// 1-based operation id, odd for plain operations, even for Friedel-negated ones
    pub isym: Vec<i32>,
    /// +1 or -1
    pub phase_coeff: Vec<f64>,
    /// Degrees, applied as `coeff·(φ + shift)`
    pub phase_shift: Vec<f64>,
}

/// Per-row result of [`hkl_to_observed`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObservedMapping {
    pub hkls: Vec<MillerIndex>,
    pub phase_coeff: Vec<f64>,
    pub phase_shift: Vec<f64>,
}

macro_rules! impl_phase_transform {
    ($mapping:ty) => {
        impl $mapping {
            pub fn len(&self) -> usize {
                self.hkls.len()
            }

            pub fn is_empty(&self) -> bool {
                self.hkls.is_empty()
            }

            /// Transform a phase column (degrees) row by row and canonicalize it.
            pub fn transform_phases(&self, phases: &[f64]) -> Result<Vec<f64>> {
                if phases.len() != self.len() {
                    return Err(ReflectionError::validation(
                        ErrorInfo::new("phase column length does not match the index array")
                            .with_context("rows", self.len())
                            .with_context("phases", phases.len()),
                    ));
                }
                Ok(phases
                    .iter()
                    .zip(self.phase_coeff.iter().zip(&self.phase_shift))
                    .map(|(&phase, (&coeff, &shift))| transform_phase(phase, coeff, shift))
                    .collect())
            }
        }
    };
}

impl_phase_transform!(AsuMapping);
impl_phase_transform!(ObservedMapping);

/// ASU membership of each index.
pub fn in_asu(hkls: &[MillerIndex], spacegroup: &dyn SpaceGroupAdapter) -> Vec<bool> {
    hkls.iter().map(|hkl| spacegroup.is_in_asu(hkl)).collect()
}

/// Reduce indices to their representative in the reciprocal-space ASU.
///
/// The symmetry search runs once per distinct index and is broadcast back to
/// every row that shares it, so duplicates get bit-identical results.
pub fn hkl_to_asu(hkls: &[MillerIndex], spacegroup: &dyn SpaceGroupAdapter) -> Result<AsuMapping> {
    validate_indices(hkls)?;
    let (unique, inverse) = unique_with_inverse(hkls);
    debug!(
        "reducing {} reflections ({} distinct) to the ASU of {}",
        hkls.len(),
        unique.len(),
        spacegroup.name()
    );

    let reduced = unique
        .iter()
        .map(|hkl| reduce_one(hkl, spacegroup))
        .collect::<Result<Vec<_>>>()?;

    let mut mapping = AsuMapping {
        hkls: Vec::with_capacity(hkls.len()),
        isym: Vec::with_capacity(hkls.len()),
        phase_coeff: Vec::with_capacity(hkls.len()),
        phase_shift: Vec::with_capacity(hkls.len()),
    };
    for &slot in &inverse {
        let (hkl, isym, coeff, shift) = reduced[slot];
        mapping.hkls.push(hkl);
        mapping.isym.push(isym);
        mapping.phase_coeff.push(coeff);
        mapping.phase_shift.push(shift);
    }
    Ok(mapping)
}

/// Map ASU indices back to observed indices given their ISYM values.
///
/// Inverse of [`hkl_to_asu`]: the operation is selected by `isym` instead of
/// being searched for. Work is done once per distinct (index, isym) pair.
pub fn hkl_to_observed(
    hkls: &[MillerIndex],
    isym: &[i32],
    spacegroup: &dyn SpaceGroupAdapter,
) -> Result<ObservedMapping> {
    if hkls.len() != isym.len() {
        return Err(ReflectionError::validation(
            ErrorInfo::new("ISYM column length does not match the index array")
                .with_context("rows", hkls.len())
                .with_context("isym", isym.len()),
        ));
    }
    validate_indices(hkls)?;

    let pairs: Vec<(MillerIndex, i32)> = hkls.iter().copied().zip(isym.iter().copied()).collect();
    let (unique, inverse) = unique_with_inverse(&pairs);
    debug!(
        "expanding {} reflections ({} distinct index/ISYM pairs) in {}",
        hkls.len(),
        unique.len(),
        spacegroup.name()
    );

    let inverses: Vec<SymOp> = spacegroup.operations().iter().map(SymOp::inverse).collect();
    let expanded = unique
        .iter()
        .map(|(hkl, isym)| expand_one(hkl, *isym, &inverses, spacegroup))
        .collect::<Result<Vec<_>>>()?;
    let expanded = broadcast(&expanded, &inverse);

    Ok(ObservedMapping {
        hkls: expanded.iter().map(|e| e.0).collect(),
        phase_coeff: expanded.iter().map(|e| e.1).collect(),
        phase_shift: expanded.iter().map(|e| e.2).collect(),
    })
}

// Callers validate indices first, so negation cannot overflow
#[inline]
fn scale(hkl: MillerIndex, sign: i32) -> MillerIndex {
    [hkl[0] * sign, hkl[1] * sign, hkl[2] * sign]
}

fn reduce_one(
    hkl: &MillerIndex,
    spacegroup: &dyn SpaceGroupAdapter,
) -> Result<(MillerIndex, i32, f64, f64)> {
    for (i, op) in spacegroup.operations().iter().enumerate() {
        let image = op.apply_to_hkl(hkl);
        for (branch, sign) in [(1, 1), (2, -1)] {
            let candidate = scale(image, sign);
            if spacegroup.is_in_asu(&candidate) {
                let isym = 2 * i as i32 + branch;
                trace!("{hkl:?} -> {candidate:?} via isym {isym} ({})", op.triplet());
                return Ok((
                    candidate,
                    isym,
                    f64::from(sign),
                    op.phase_shift_degrees(hkl),
                ));
            }
        }
    }
    Err(ReflectionError::SymmetryContractViolation {
        spacegroup: spacegroup.name().to_string(),
        hkl: *hkl,
    })
}

// `inverses[k]` is the inverse of operation k
fn expand_one(
    hkl: &MillerIndex,
    isym: i32,
    inverses: &[SymOp],
    spacegroup: &dyn SpaceGroupAdapter,
) -> Result<(MillerIndex, f64, f64)> {
    let ops = spacegroup.operations();
    let (op, inverse): (&SymOp, &SymOp) = usize::try_from(isym - 1)
        .ok()
        .and_then(|k| Some((ops.get(k / 2)?, inverses.get(k / 2)?)))
        .ok_or_else(|| {
            ReflectionError::encoding(
                ErrorInfo::new("ISYM does not name an operation of the space group")
                    .with_context("isym", isym)
                    .with_context("max_isym", 2 * ops.len())
                    .with_context("spacegroup", spacegroup.name()),
            )
        })?;
    let sign = if isym % 2 == 1 { 1 } else { -1 };

    let observed = scale(inverse.apply_to_hkl(hkl), sign);
    // φ_obs = s·φ_asu + 360·H_obs·t = s·(φ_asu + s·360·H_obs·t)
    let shift = -f64::from(sign) * op.phase_shift_degrees(&observed);
    Ok((observed, f64::from(sign), shift))
}
