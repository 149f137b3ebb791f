//! Table-level symmetry transforms
//!
//! Thin wrappers that run the pure index engine from [`crate::reflections`]
//! over a [`ReflectionBatch`], carrying phase, M/ISYM and PARTIAL columns
//! along. Inputs are never modified; each function returns a new batch.

use log::debug;

use crate::config::{M_ISYM_LABEL, PARTIAL_LABEL};
use crate::dataset::column::{Column, ColumnKind};
use crate::dataset::reflection_batch::ReflectionBatch;
use crate::errors::{ErrorInfo, ReflectionError};
use crate::interfaces::MergeState;
use crate::reflections::{self, canonicalize_phase, decode_m_isym_column, encode_m_isym_column};
use crate::symmetries::{SpaceGroupAdapter, SymOp};
use crate::Result;

/// Apply one symmetry operation to every index; phases pick up `-360·H·t`.
pub fn apply_symop(batch: &ReflectionBatch, op: &SymOp) -> Result<ReflectionBatch> {
    reflections::validate_indices(batch.hkls())?;
    let shifts = reflections::phase_shift_degrees(batch.hkls(), op);
    let moved = batch.with_hkls(reflections::apply_to_hkl(batch.hkls(), op))?;
    shift_phases(&moved, &shifts, None)
}

/// Wrap every phase column into (-180, 180].
pub fn canonicalize_phases(batch: &ReflectionBatch) -> ReflectionBatch {
    batch.map_columns_of_kind(ColumnKind::Phase, |c| c.map_float(canonicalize_phase))
}

/// Reduce every index into the ASU of `spacegroup`.
///
/// Phase columns follow the index. The operation used is recorded in an
/// `M/ISYM` column (kind Y); an existing `PARTIAL` flag column is folded
/// into it and removed.
pub fn hkl_to_asu(batch: &ReflectionBatch, spacegroup: &dyn SpaceGroupAdapter) -> Result<ReflectionBatch> {
    let mapping = reflections::hkl_to_asu(batch.hkls(), spacegroup)?;
    let mut reduced = shift_phases(
        &batch.with_hkls(mapping.hkls.clone())?,
        &mapping.phase_shift,
        Some(mapping.phase_coeff.as_slice()),
    )?;

    let partial: Vec<bool> = match reduced.remove_column(PARTIAL_LABEL) {
        Some(column) => {
            let flags = column.as_flag().ok_or_else(|| {
                ReflectionError::validation(
                    ErrorInfo::new("PARTIAL column must be a flag column")
                        .with_context("kind", column.kind),
                )
            })?;
            // A missing partiality flag reads as fully recorded
            flags.iter().map(|f| f.unwrap_or(false)).collect()
        }
        None => Vec::new(),
    };
    let codes = encode_m_isym_column(&mapping.isym, &partial)?;
    reduced.set_column(Column::int(
        M_ISYM_LABEL,
        ColumnKind::MIsym,
        codes.into_iter().map(Some).collect(),
    )?)?;
    Ok(reduced)
}

/// Map ASU indices back to their observed indices using an M/ISYM column.
///
/// # Arguments
/// * `m_isym` - Label of the M/ISYM column. When `None`, the batch must hold exactly one column of kind Y.
/// * `merge_state` - Unmerged data get a `PARTIAL` flag column decoded from M/ISYM; merged data do not.
///
/// The M/ISYM column is removed from the result.
pub fn hkl_to_observed(
    batch: &ReflectionBatch,
    spacegroup: &dyn SpaceGroupAdapter,
    merge_state: MergeState,
    m_isym: Option<&str>,
) -> Result<ReflectionBatch> {
    let label = resolve_m_isym_label(batch, m_isym)?;
    let column = batch.require_column(&label)?;
    let codes = column
        .as_int()
        .ok_or_else(|| {
            ReflectionError::validation(
                ErrorInfo::new("M/ISYM column must hold integers").with_context("column", &label),
            )
        })?
        .iter()
        .enumerate()
        .map(|(row, code)| {
            code.ok_or_else(|| {
                ReflectionError::encoding(
                    ErrorInfo::new("missing M/ISYM value")
                        .with_context("column", &label)
                        .with_context("row", row),
                )
            })
        })
        .collect::<Result<Vec<i32>>>()?;
    let (isym, partial) = decode_m_isym_column(&codes)?;

    let mapping = reflections::hkl_to_observed(batch.hkls(), &isym, spacegroup)?;
    let mut observed = shift_phases(
        &batch.with_hkls(mapping.hkls.clone())?,
        &mapping.phase_shift,
        Some(mapping.phase_coeff.as_slice()),
    )?;
    observed.remove_column(&label);
    if !merge_state.is_merged() {
        observed.set_column(Column::flag(
            PARTIAL_LABEL,
            partial.into_iter().map(Some).collect(),
        ))?;
    }
    debug!(
        "expanded {} reflections from column {label} ({:?})",
        observed.len(),
        merge_state
    );
    Ok(observed)
}

fn resolve_m_isym_label(batch: &ReflectionBatch, m_isym: Option<&str>) -> Result<String> {
    match m_isym {
        Some(label) => {
            let column = batch.require_column(label)?;
            if column.kind != ColumnKind::MIsym {
                return Err(ReflectionError::validation(
                    ErrorInfo::new("column is not an M/ISYM column")
                        .with_context("column", label)
                        .with_context("kind", column.kind),
                ));
            }
            Ok(label.to_string())
        }
        None => {
            let mut keys = batch.m_isym_keys();
            if keys.len() != 1 {
                return Err(ReflectionError::encoding(
                    ErrorInfo::new("exactly one M/ISYM column is required")
                        .with_context("found", keys.len())
                        .with_context("columns", keys.join(",")),
                ));
            }
            Ok(keys.remove(0))
        }
    }
}

// φ' = coeff·(φ + shift), canonicalized, for every phase column
fn shift_phases(
    batch: &ReflectionBatch,
    shifts: &[f64],
    coeffs: Option<&[f64]>,
) -> Result<ReflectionBatch> {
    let mut shifted = batch.clone();
    for label in batch.phase_keys() {
        let column = batch.require_column(&label)?;
        let values = column.as_float().unwrap_or_default();
        let phases: Vec<f64> = values
            .iter()
            .enumerate()
            .map(|(row, &phase)| {
                let coeff = coeffs.map_or(1.0, |c| c[row]);
                reflections::phases::transform_phase(phase, coeff, shifts[row])
            })
            .collect();
        shifted.set_column(Column::float(label, ColumnKind::Phase, phases)?)?;
    }
    Ok(shifted)
}
