// Reflection batch: Miller indices plus row-aligned typed columns
// This is the thin container the symmetry engine reads and writes; it knows rows and labels, nothing else

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::dataset::column::{Column, ColumnKind};
use crate::errors::{ErrorInfo, ReflectionError};
use crate::reflections::MillerIndex;
use crate::Result;

/// Miller indices and the columns observed at them, row by row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReflectionBatch {
    hkls: Vec<MillerIndex>,
    columns: Vec<Column>,
}

impl ReflectionBatch {
    /// Create a batch with no data columns
    pub fn new(hkls: Vec<MillerIndex>) -> Self {
        Self {
            hkls,
            columns: Vec::new(),
        }
    }

    /// Builder form of [`ReflectionBatch::set_column`].
    pub fn with_column(mut self, column: Column) -> Result<Self> {
        self.set_column(column)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.hkls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hkls.is_empty()
    }

    pub fn hkls(&self) -> &[MillerIndex] {
        &self.hkls
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column labels in table order
    pub fn labels(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.label.as_str()).collect()
    }

    pub fn contains(&self, label: &str) -> bool {
        self.position(label).is_some()
    }

    pub fn column(&self, label: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.label == label)
    }

    /// Column lookup that reports an unknown label as a validation error.
    pub fn require_column(&self, label: &str) -> Result<&Column> {
        self.column(label).ok_or_else(|| {
            ReflectionError::validation(
                ErrorInfo::new("unknown column")
                    .with_context("column", label)
                    .with_context("available", self.labels().join(",")),
            )
        })
    }

    fn position(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.label == label)
    }

    /// Labels of all columns of `kind`.
    pub fn keys_of_kind(&self, kind: ColumnKind) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.label.clone())
            .collect()
    }

    pub fn phase_keys(&self) -> Vec<String> {
        self.keys_of_kind(ColumnKind::Phase)
    }

    pub fn m_isym_keys(&self) -> Vec<String> {
        self.keys_of_kind(ColumnKind::MIsym)
    }

    /// Insert a column, replacing any column with the same label in place.
    ///
    /// # Errors
    /// Validation error when the column length differs from the number of rows.
    pub fn set_column(&mut self, column: Column) -> Result<()> {
        if column.len() != self.len() {
            return Err(ReflectionError::validation(
                ErrorInfo::new("column length does not match the number of reflections")
                    .with_context("column", &column.label)
                    .with_context("rows", self.len())
                    .with_context("values", column.len()),
            ));
        }
        match self.position(&column.label) {
            Some(i) => self.columns[i] = column,
            None => self.columns.push(column),
        }
        Ok(())
    }

    /// Remove a column, returning it if it existed.
    pub fn remove_column(&mut self, label: &str) -> Option<Column> {
        self.position(label).map(|i| self.columns.remove(i))
    }

    /// Copy without the listed columns; unknown labels are ignored.
    pub fn without_columns<S: AsRef<str>>(&self, labels: &[S]) -> Self {
        Self {
            hkls: self.hkls.clone(),
            columns: self
                .columns
                .iter()
                .filter(|c| !labels.iter().any(|l| l.as_ref() == c.label))
                .cloned()
                .collect(),
        }
    }

    /// Copy with only the listed columns, in the order given.
    pub fn select_columns<S: AsRef<str>>(&self, labels: &[S]) -> Result<Self> {
        let columns = labels
            .iter()
            .map(|l| self.require_column(l.as_ref()).cloned())
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            hkls: self.hkls.clone(),
            columns,
        })
    }

    /// Rename columns through `(old, new)` pairs. Unknown old labels are ignored.
    pub fn rename_columns<S: AsRef<str>, T: AsRef<str>>(&mut self, mapping: &[(S, T)]) {
        for column in self.columns.iter_mut() {
            if let Some((_, new)) = mapping.iter().find(|(old, _)| old.as_ref() == column.label) {
                column.label = new.as_ref().to_string();
            }
        }
    }

    /// Replace the index array, keeping every column.
    pub fn with_hkls(&self, hkls: Vec<MillerIndex>) -> Result<Self> {
        if hkls.len() != self.len() {
            return Err(ReflectionError::validation(
                ErrorInfo::new("index array length does not match the number of reflections")
                    .with_context("rows", self.len())
                    .with_context("hkls", hkls.len()),
            ));
        }
        Ok(Self {
            hkls,
            columns: self.columns.clone(),
        })
    }

    /// Rows at `rows`, in that order.
    pub fn take_rows(&self, rows: &[usize]) -> Self {
        Self {
            hkls: rows.iter().map(|&r| self.hkls[r]).collect(),
            columns: self.columns.iter().map(|c| c.take_rows(rows)).collect(),
        }
    }

    /// Indices of rows where every listed column is missing.
    pub fn rows_all_na<S: AsRef<str>>(&self, labels: &[S]) -> Result<Vec<usize>> {
        let columns = labels
            .iter()
            .map(|l| self.require_column(l.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok((0..self.len())
            .filter(|&row| columns.iter().all(|c| c.is_na(row)))
            .collect())
    }

    /// Rows of `self` followed by rows of `other`.
    ///
    /// Columns are the union of both label sets in first-seen order; a column
    /// missing from one side is filled with missing values there. Columns
    /// sharing a label must share a kind.
    pub fn concat(&self, other: &ReflectionBatch) -> Result<Self> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let mut merged = column.clone();
            match other.column(&column.label) {
                Some(tail) => merged.append(tail)?,
                None => merged.append(&Column::missing(&column.label, column.kind, other.len()))?,
            }
            columns.push(merged);
        }
        for column in other.columns.iter().filter(|c| !self.contains(&c.label)) {
            let mut merged = Column::missing(&column.label, column.kind, self.len());
            merged.append(column)?;
            columns.push(merged);
        }

        let mut hkls = self.hkls.clone();
        hkls.extend_from_slice(&other.hkls);
        Ok(Self { hkls, columns })
    }

    /// Outer join of two batches on the Miller index.
    ///
    /// Every row of `self` is kept in order and matched with the first row of
    /// `right` at the same index; rows of `right` with no partner are appended
    /// at the end. Labels present on both sides get `suffixes.0` on the left
    /// and `suffixes.1` on the right.
    pub fn outer_join_on_hkl(&self, right: &ReflectionBatch, suffixes: (&str, &str)) -> Self {
        let mut right_lookup: HashMap<MillerIndex, usize> = HashMap::with_capacity(right.len());
        for (row, hkl) in right.hkls.iter().enumerate() {
            right_lookup.entry(*hkl).or_insert(row);
        }

        let mut left_rows: Vec<Option<usize>> = (0..self.len()).map(Some).collect();
        let mut right_rows: Vec<Option<usize>> = self
            .hkls
            .iter()
            .map(|hkl| right_lookup.get(hkl).copied())
            .collect();
        let mut hkls = self.hkls.clone();

        let mut matched = vec![false; right.len()];
        for row in right_rows.iter().flatten() {
            matched[*row] = true;
        }
        for (row, hkl) in right.hkls.iter().enumerate() {
            if !matched[row] {
                left_rows.push(None);
                right_rows.push(Some(row));
                hkls.push(*hkl);
            }
        }

        let overlapping = |label: &str, other: &ReflectionBatch| other.contains(label);
        let mut columns: Vec<Column> = Vec::with_capacity(self.columns.len() + right.columns.len());
        for column in &self.columns {
            let joined = column.take_optional(&left_rows);
            columns.push(if overlapping(&column.label, right) {
                let label = format!("{}{}", column.label, suffixes.0);
                joined.renamed(label)
            } else {
                joined
            });
        }
        for column in &right.columns {
            let joined = column.take_optional(&right_rows);
            columns.push(if overlapping(&column.label, self) {
                let label = format!("{}{}", column.label, suffixes.1);
                joined.renamed(label)
            } else {
                joined
            });
        }

        Self { hkls, columns }
    }

    /// Apply `f` to every column of `kind`.
    pub fn map_columns_of_kind(&self, kind: ColumnKind, f: impl Fn(&Column) -> Column) -> Self {
        Self {
            hkls: self.hkls.clone(),
            columns: self
                .columns
                .iter()
                .map(|c| if c.kind == kind { f(c) } else { c.clone() })
                .collect(),
        }
    }
}
