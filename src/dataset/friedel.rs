//! Conversion between one-column and two-column anomalous layouts
//!
//! In the one-column layout Friedel mates `H` and `-H` are separate rows. In
//! the two-column layout every row sits at the ASU index and carries the
//! Friedel-plus and Friedel-minus values in columns told apart by a label
//! suffix, `(+)` and `(-)` by default.

use log::{debug, warn};

use crate::config::{M_ISYM_LABEL, PARTIAL_LABEL};
use crate::dataset::column::ColumnKind;
use crate::dataset::reflection_batch::ReflectionBatch;
use crate::dataset::transforms;
use crate::errors::{ErrorInfo, ReflectionError};
use crate::interfaces::{AnomalousSuffixes, FriedelBranch, MergeState};
use crate::reflections::{canonicalize_phase, decode_m_isym, validate_indices};
use crate::symmetries::SpaceGroupAdapter;
use crate::Result;

/// Convert from the one-column to the two-column anomalous layout.
///
/// # Arguments
/// * `columns` - Columns to split into Friedel pairs. `None` selects every column; `PARTIAL` is never split.
/// * `suffixes` - Label suffixes of the Friedel-plus and Friedel-minus columns
///
/// Merged data collapse to one row per ASU index. Unmerged data keep one row
/// per observation with the other branch's columns missing, plus an M/ISYM
/// column for mapping back.
pub fn unstack_anomalous(
    batch: &ReflectionBatch,
    spacegroup: &dyn SpaceGroupAdapter,
    merge_state: MergeState,
    columns: Option<&[&str]>,
    suffixes: &AnomalousSuffixes,
) -> Result<ReflectionBatch> {
    let selected: Vec<String> = match columns {
        Some(labels) => {
            for label in labels {
                batch.require_column(label)?;
            }
            labels.iter().map(|l| l.to_string()).collect()
        }
        None => batch.labels().into_iter().map(String::from).collect(),
    };
    let selected: Vec<String> = selected.into_iter().filter(|l| l != PARTIAL_LABEL).collect();

    let mut asu = transforms::hkl_to_asu(batch, spacegroup)?;
    for label in &selected {
        if let Some(column) = asu.column(label).cloned() {
            let kind = column.kind.to_friedel(label);
            asu.set_column(column.with_kind(kind)?)?;
        }
    }

    let (plus_rows, minus_rows) = split_by_branch(&asu)?;
    debug!(
        "unstacking {} reflections: {} Friedel-plus, {} Friedel-minus ({:?})",
        asu.len(),
        plus_rows.len(),
        minus_rows.len(),
        merge_state
    );
    let plus = asu.take_rows(&plus_rows);
    let minus = asu.take_rows(&minus_rows);

    match merge_state {
        MergeState::Merged => {
            let minus = minus.select_columns(&selected)?;
            let mut joined =
                plus.outer_join_on_hkl(&minus, (suffixes.plus.as_str(), suffixes.minus.as_str()));
            if !batch.contains(M_ISYM_LABEL) {
                joined.remove_column(M_ISYM_LABEL);
            }
            Ok(joined)
        }
        MergeState::Unmerged => {
            let mut plus = plus;
            let mut minus = minus;
            plus.rename_columns(&suffixed(&selected, &suffixes.plus));
            minus.rename_columns(&suffixed(&selected, &suffixes.minus));
            plus.concat(&minus)
        }
    }
}

/// Convert from the two-column to the one-column anomalous layout.
///
/// # Arguments
/// * `labels` - Paired (plus, minus) column labels. `None` pairs every column whose label contains the plus suffix with every column containing the minus suffix, in table order.
///
/// Merged: Friedel-plus rows keep their index, Friedel-minus rows move to
/// `-H` with phases negated. Unmerged: each row belongs to the branch whose
/// columns are populated and is expanded to its observed index.
pub fn stack_anomalous(
    batch: &ReflectionBatch,
    spacegroup: &dyn SpaceGroupAdapter,
    merge_state: MergeState,
    labels: Option<(&[&str], &[&str])>,
    suffixes: &AnomalousSuffixes,
) -> Result<ReflectionBatch> {
    let (plus_labels, minus_labels): (Vec<String>, Vec<String>) = match labels {
        Some((plus, minus)) => (
            plus.iter().map(|l| l.to_string()).collect(),
            minus.iter().map(|l| l.to_string()).collect(),
        ),
        None => (
            labels_containing(batch, &suffixes.plus),
            labels_containing(batch, &suffixes.minus),
        ),
    };
    validate_pairs(batch, &plus_labels, &minus_labels)?;

    let stacked_labels: Vec<String> = plus_labels
        .iter()
        .map(|l| l.strip_suffix(suffixes.plus.as_str()).unwrap_or(l).to_string())
        .collect();
    let plus_mapping: Vec<(&String, &String)> = plus_labels.iter().zip(&stacked_labels).collect();
    let minus_mapping: Vec<(&String, &String)> = minus_labels.iter().zip(&stacked_labels).collect();

    let (mut plus, mut minus) = match merge_state {
        MergeState::Merged => {
            let plus = batch.without_columns(&minus_labels);
            let minus = friedel_mates(&batch.without_columns(&plus_labels))?;
            (plus, minus)
        }
        MergeState::Unmerged => {
            let plus_rows = batch.rows_all_na(&minus_labels)?;
            let minus_only = batch.rows_all_na(&plus_labels)?;
            // Rows with neither branch populated stay on the plus side
            let (neither, minus_rows): (Vec<usize>, Vec<usize>) = minus_only
                .into_iter()
                .partition(|row| plus_rows.binary_search(row).is_ok());

            if !neither.is_empty() && !plus_labels.is_empty() {
                warn!("{} rows carry neither Friedel branch; kept as Friedel-plus", neither.len());
            }
            let dropped = batch.len() - plus_rows.len() - minus_rows.len();
            if dropped > 0 {
                warn!("{dropped} rows carry both Friedel branches and are dropped while stacking");
            }

            let plus = transforms::hkl_to_observed(
                &batch.take_rows(&plus_rows).without_columns(&minus_labels),
                spacegroup,
                merge_state,
                None,
            )?;
            let minus = transforms::hkl_to_observed(
                &batch.take_rows(&minus_rows).without_columns(&plus_labels),
                spacegroup,
                merge_state,
                None,
            )?;
            (plus, minus)
        }
    };

    plus.rename_columns(&plus_mapping);
    minus.rename_columns(&minus_mapping);
    let mut stacked = plus.concat(&minus)?;
    for label in &stacked_labels {
        if let Some(column) = stacked.column(label).cloned() {
            let kind = column.kind.from_friedel();
            stacked.set_column(column.with_kind(kind)?)?;
        }
    }
    Ok(stacked)
}

// Row indices of Friedel-plus (odd ISYM) and Friedel-minus (even ISYM) reflections
fn split_by_branch(asu: &ReflectionBatch) -> Result<(Vec<usize>, Vec<usize>)> {
    let codes = asu
        .require_column(M_ISYM_LABEL)?
        .as_int()
        .unwrap_or_default();
    let mut plus = Vec::new();
    let mut minus = Vec::new();
    for (row, code) in codes.iter().enumerate() {
        let (isym, _) = decode_m_isym(code.unwrap_or(0))?;
        match FriedelBranch::from_isym(isym) {
            FriedelBranch::Plus => plus.push(row),
            FriedelBranch::Minus => minus.push(row),
        }
    }
    Ok((plus, minus))
}

fn suffixed(labels: &[String], suffix: &str) -> Vec<(String, String)> {
    labels
        .iter()
        .map(|l| (l.clone(), format!("{l}{suffix}")))
        .collect()
}

fn labels_containing(batch: &ReflectionBatch, suffix: &str) -> Vec<String> {
    batch
        .labels()
        .into_iter()
        .filter(|l| l.contains(suffix))
        .map(String::from)
        .collect()
}

fn validate_pairs(batch: &ReflectionBatch, plus: &[String], minus: &[String]) -> Result<()> {
    if plus.len() != minus.len() {
        return Err(ReflectionError::validation(
            ErrorInfo::new("Friedel-plus and Friedel-minus labels differ in number")
                .with_context("plus", plus.join(","))
                .with_context("minus", minus.join(",")),
        ));
    }
    for (p, m) in plus.iter().zip(minus) {
        let (p_col, m_col) = (batch.require_column(p)?, batch.require_column(m)?);
        if p_col.kind != m_col.kind {
            return Err(ReflectionError::validation(
                ErrorInfo::new("paired Friedel columns have different kinds")
                    .with_context("plus", format!("{p} ({})", p_col.kind))
                    .with_context("minus", format!("{m} ({})", m_col.kind)),
            ));
        }
    }
    Ok(())
}

// Friedel mates of merged rows: -H, phases negated
fn friedel_mates(batch: &ReflectionBatch) -> Result<ReflectionBatch> {
    validate_indices(batch.hkls())?;
    let negated = batch
        .hkls()
        .iter()
        .map(|hkl| [-hkl[0], -hkl[1], -hkl[2]])
        .collect();
    let mates = batch.with_hkls(negated)?;
    Ok(mates.map_columns_of_kind(ColumnKind::Phase, |c| {
        c.map_float(|phase| canonicalize_phase(-phase))
    }))
}
