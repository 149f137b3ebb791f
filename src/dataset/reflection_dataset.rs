// Reflection dataset: a reflection batch together with its crystallographic metadata
// Operations check that the metadata they need is present and delegate to the pure engine

use num_complex::Complex64;
use std::fmt;
use std::sync::Arc;

use crate::config::{
    ABSENT_LABEL, BIN_LABEL, CENTRIC_LABEL, DHKL_LABEL, EPSILON_LABEL, ISOMORPHISM_CELL_THRESHOLD,
};
use crate::dataset::column::{Column, ColumnKind};
use crate::dataset::friedel;
use crate::dataset::reflection_batch::ReflectionBatch;
use crate::dataset::transforms;
use crate::errors::{ErrorInfo, MetadataField, ReflectionError};
use crate::interfaces::{AnomalousSuffixes, MergeState};
use crate::lattice::UnitCell;
use crate::reflections::{self, to_structurefactor};
use crate::symmetries::{SpaceGroupAdapter, SymOp};
use crate::Result;

/// Reflection table plus space group, unit cell and merge state.
///
/// The space group is shared behind an [`Arc`] so that derived datasets are
/// cheap to produce. Every operation returns a new dataset.
#[derive(Clone)]
pub struct ReflectionDataset {
    batch: ReflectionBatch,
    spacegroup: Option<Arc<dyn SpaceGroupAdapter>>,
    cell: Option<UnitCell>,
    merge_state: MergeState,
}

impl fmt::Debug for ReflectionDataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionDataset")
            .field("reflections", &self.batch.len())
            .field("columns", &self.batch.labels())
            .field("spacegroup", &self.spacegroup.as_ref().map(|sg| sg.name().to_string()))
            .field("cell", &self.cell)
            .field("merge_state", &self.merge_state)
            .finish()
    }
}

impl ReflectionDataset {
    /// Create a dataset without space group or cell
    pub fn new(batch: ReflectionBatch, merge_state: MergeState) -> Self {
        Self {
            batch,
            spacegroup: None,
            cell: None,
            merge_state,
        }
    }

    pub fn with_spacegroup<S: SpaceGroupAdapter + 'static>(self, spacegroup: S) -> Self {
        self.with_shared_spacegroup(Arc::new(spacegroup))
    }

    pub fn with_shared_spacegroup(mut self, spacegroup: Arc<dyn SpaceGroupAdapter>) -> Self {
        self.spacegroup = Some(spacegroup);
        self
    }

    pub fn with_cell(mut self, cell: UnitCell) -> Self {
        self.cell = Some(cell);
        self
    }

    pub fn batch(&self) -> &ReflectionBatch {
        &self.batch
    }

    pub fn into_batch(self) -> ReflectionBatch {
        self.batch
    }

    pub fn spacegroup(&self) -> Option<&dyn SpaceGroupAdapter> {
        self.spacegroup.as_deref()
    }

    pub fn cell(&self) -> Option<&UnitCell> {
        self.cell.as_ref()
    }

    pub fn merge_state(&self) -> MergeState {
        self.merge_state
    }

    pub fn is_merged(&self) -> bool {
        self.merge_state.is_merged()
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }

    pub fn phase_keys(&self) -> Vec<String> {
        self.batch.phase_keys()
    }

    pub fn m_isym_keys(&self) -> Vec<String> {
        self.batch.m_isym_keys()
    }

    // Same metadata, new table
    fn derive(&self, batch: ReflectionBatch) -> Self {
        Self {
            batch,
            spacegroup: self.spacegroup.clone(),
            cell: self.cell,
            merge_state: self.merge_state,
        }
    }

    fn require_spacegroup(&self, operation: &'static str) -> Result<&dyn SpaceGroupAdapter> {
        self.spacegroup()
            .ok_or_else(|| ReflectionError::missing(MetadataField::SpaceGroup, operation))
    }

    fn require_cell(&self, operation: &'static str) -> Result<&UnitCell> {
        self.cell
            .as_ref()
            .ok_or_else(|| ReflectionError::missing(MetadataField::Cell, operation))
    }

    fn with_added_column(&self, column: Column) -> Result<Self> {
        let mut batch = self.batch.clone();
        batch.set_column(column)?;
        Ok(self.derive(batch))
    }

    // ======================== SYMMETRY ========================

    /// Apply a symmetry operation to every reflection, shifting phases.
    pub fn apply_symop(&self, op: &SymOp) -> Result<Self> {
        Ok(self.derive(transforms::apply_symop(&self.batch, op)?))
    }

    pub fn canonicalize_phases(&self) -> Self {
        self.derive(transforms::canonicalize_phases(&self.batch))
    }

    /// Map every reflection into the reciprocal-space ASU and record `M/ISYM`.
    pub fn hkl_to_asu(&self) -> Result<Self> {
        let spacegroup = self.require_spacegroup("hkl_to_asu")?;
        Ok(self.derive(transforms::hkl_to_asu(&self.batch, spacegroup)?))
    }

    /// Map reflections back to their observed indices.
    ///
    /// # Arguments
    /// * `m_isym` - Label of the M/ISYM column; `None` auto-detects a single column of kind Y
    pub fn hkl_to_observed(&self, m_isym: Option<&str>) -> Result<Self> {
        let spacegroup = self.require_spacegroup("hkl_to_observed")?;
        Ok(self.derive(transforms::hkl_to_observed(
            &self.batch,
            spacegroup,
            self.merge_state,
            m_isym,
        )?))
    }

    // ======================== CLASSIFICATION ========================

    /// Add a `CENTRIC` flag column.
    pub fn label_centrics(&self) -> Result<Self> {
        let spacegroup = self.require_spacegroup("label_centrics")?;
        reflections::validate_indices(self.batch.hkls())?;
        let centric = reflections::is_centric(self.batch.hkls(), spacegroup);
        self.with_added_column(Column::flag(
            CENTRIC_LABEL,
            centric.into_iter().map(Some).collect(),
        ))
    }

    /// Add an `ABSENT` flag column for systematically absent reflections.
    pub fn label_absences(&self) -> Result<Self> {
        let spacegroup = self.require_spacegroup("label_absences")?;
        reflections::validate_indices(self.batch.hkls())?;
        let absent = reflections::is_absent(self.batch.hkls(), spacegroup);
        self.with_added_column(Column::flag(
            ABSENT_LABEL,
            absent.into_iter().map(Some).collect(),
        ))
    }

    /// Add a `dHKL` column (Å).
    pub fn compute_dhkl(&self) -> Result<Self> {
        let cell = self.require_cell("compute_dhkl")?;
        let dhkl = reflections::compute_dhkl(self.batch.hkls(), cell)?;
        self.with_added_column(Column::float(DHKL_LABEL, ColumnKind::Real, dhkl)?)
    }

    /// Add an `EPSILON` column with the structure-factor multiplicity.
    pub fn compute_multiplicity(&self, include_centering: bool) -> Result<Self> {
        let spacegroup = self.require_spacegroup("compute_multiplicity")?;
        reflections::validate_indices(self.batch.hkls())?;
        let epsilon = reflections::compute_structurefactor_multiplicity(
            self.batch.hkls(),
            spacegroup,
            include_centering,
        );
        self.with_added_column(Column::int(
            EPSILON_LABEL,
            ColumnKind::Integer,
            epsilon.into_iter().map(Some).collect(),
        )?)
    }

    /// Add a `bin` column assigning reflections to resolution shells.
    ///
    /// Shells hold roughly equal numbers of reflections and are numbered from
    /// low to high resolution. An existing `dHKL` column is used, otherwise
    /// d-spacings are computed from the cell. Returns the dataset and one
    /// `"dmax - dmin"` label per shell.
    pub fn assign_resolution_bins(&self, bins: usize) -> Result<(Self, Vec<String>)> {
        let dhkl = match self.batch.column(DHKL_LABEL).and_then(Column::as_float) {
            Some(values) => values.to_vec(),
            None => {
                let cell = self.require_cell("assign_resolution_bins")?;
                reflections::compute_dhkl(self.batch.hkls(), cell)?
            }
        };
        let (assignments, labels) = reflections::bin_by_percentile(&dhkl, bins, false)?;
        let column = Column::int(
            BIN_LABEL,
            ColumnKind::Integer,
            assignments
                .into_iter()
                .map(|bin| bin.map(|b| b as i32))
                .collect(),
        )?;
        Ok((self.with_added_column(column)?, labels))
    }

    // ======================== FRIEDEL PAIRS ========================

    /// Two-column anomalous layout to one-column layout.
    pub fn stack_anomalous(
        &self,
        labels: Option<(&[&str], &[&str])>,
        suffixes: &AnomalousSuffixes,
    ) -> Result<Self> {
        let spacegroup = self.require_spacegroup("stack_anomalous")?;
        Ok(self.derive(friedel::stack_anomalous(
            &self.batch,
            spacegroup,
            self.merge_state,
            labels,
            suffixes,
        )?))
    }

    /// One-column anomalous layout to two-column layout.
    pub fn unstack_anomalous(
        &self,
        columns: Option<&[&str]>,
        suffixes: &AnomalousSuffixes,
    ) -> Result<Self> {
        let spacegroup = self.require_spacegroup("unstack_anomalous")?;
        Ok(self.derive(friedel::unstack_anomalous(
            &self.batch,
            spacegroup,
            self.merge_state,
            columns,
            suffixes,
        )?))
    }

    // ======================== COMPARISON & STRUCTURE FACTORS ========================

    /// Same space group and every cell parameter within `cell_threshold`
    /// (fraction of 100 Å or 100°, default [`ISOMORPHISM_CELL_THRESHOLD`]).
    pub fn is_isomorphous(&self, other: &ReflectionDataset, cell_threshold: Option<f64>) -> Result<bool> {
        let threshold = cell_threshold.unwrap_or(ISOMORPHISM_CELL_THRESHOLD);
        let (sg, other_sg) = (
            self.require_spacegroup("is_isomorphous")?,
            other.require_spacegroup("is_isomorphous")?,
        );
        let (cell, other_cell) = (
            self.require_cell("is_isomorphous")?,
            other.require_cell("is_isomorphous")?,
        );
        Ok(sg.is_same_group(other_sg) && cell.is_isomorphous_to(other_cell, threshold))
    }

    /// Complex structure factors from an amplitude and a phase column (degrees).
    pub fn to_structurefactor(&self, amplitude: &str, phase: &str) -> Result<Vec<Complex64>> {
        to_structurefactor(self.float_column(amplitude)?, self.float_column(phase)?)
    }

    fn float_column(&self, label: &str) -> Result<&[f64]> {
        self.batch.require_column(label)?.as_float().ok_or_else(|| {
            ReflectionError::validation(
                ErrorInfo::new("column does not hold real values").with_context("column", label),
            )
        })
    }
}
