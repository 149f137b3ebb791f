// Column module: typed, labelled value columns of a reflection table
// Every column carries its MTZ column type so that phase, M/ISYM and Friedel columns can be found by kind

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{ErrorInfo, ReflectionError};
use crate::Result;

/// MTZ column type of a data column.
///
/// `Flag` has no MTZ code; it is used for boolean annotations such as
/// `PARTIAL`, `CENTRIC` and `ABSENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnKind {
    /// H: Miller index component
    Index,
    /// J: intensity
    Intensity,
    /// K: intensity of one Friedel mate
    FriedelIntensity,
    /// F: structure factor amplitude
    Amplitude,
    /// G: amplitude of one Friedel mate
    FriedelAmplitude,
    /// D: anomalous difference
    AnomalousDifference,
    /// Q: standard deviation
    StandardDeviation,
    /// L: standard deviation of a Friedel amplitude
    FriedelSigmaF,
    /// M: standard deviation of a Friedel intensity
    FriedelSigmaI,
    /// P: phase in degrees
    Phase,
    /// W: weight
    Weight,
    /// A: Hendrickson-Lattman coefficient
    HendricksonLattman,
    /// B: batch number
    Batch,
    /// Y: packed M/ISYM code
    MIsym,
    /// I: generic integer
    Integer,
    /// R: generic real
    Real,
    /// Boolean annotation
    Flag,
}

/// Physical storage behind a [`ColumnKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Float,
    Int,
    Flag,
}

impl ColumnKind {
    /// Single-letter MTZ column type, `None` for [`ColumnKind::Flag`].
    pub fn mtz_code(self) -> Option<char> {
        let code = match self {
            ColumnKind::Index => 'H',
            ColumnKind::Intensity => 'J',
            ColumnKind::FriedelIntensity => 'K',
            ColumnKind::Amplitude => 'F',
            ColumnKind::FriedelAmplitude => 'G',
            ColumnKind::AnomalousDifference => 'D',
            ColumnKind::StandardDeviation => 'Q',
            ColumnKind::FriedelSigmaF => 'L',
            ColumnKind::FriedelSigmaI => 'M',
            ColumnKind::Phase => 'P',
            ColumnKind::Weight => 'W',
            ColumnKind::HendricksonLattman => 'A',
            ColumnKind::Batch => 'B',
            ColumnKind::MIsym => 'Y',
            ColumnKind::Integer => 'I',
            ColumnKind::Real => 'R',
            ColumnKind::Flag => return None,
        };
        Some(code)
    }

    pub fn from_mtz_code(code: char) -> Option<Self> {
        let kind = match code.to_ascii_uppercase() {
            'H' => ColumnKind::Index,
            'J' => ColumnKind::Intensity,
            'K' => ColumnKind::FriedelIntensity,
            'F' => ColumnKind::Amplitude,
            'G' => ColumnKind::FriedelAmplitude,
            'D' => ColumnKind::AnomalousDifference,
            'Q' => ColumnKind::StandardDeviation,
            'L' => ColumnKind::FriedelSigmaF,
            'M' => ColumnKind::FriedelSigmaI,
            'P' => ColumnKind::Phase,
            'W' => ColumnKind::Weight,
            'A' => ColumnKind::HendricksonLattman,
            'B' => ColumnKind::Batch,
            'Y' => ColumnKind::MIsym,
            'I' => ColumnKind::Integer,
            'R' => ColumnKind::Real,
            _ => return None,
        };
        Some(kind)
    }

    pub fn storage(self) -> Storage {
        match self {
            ColumnKind::Index | ColumnKind::Batch | ColumnKind::MIsym | ColumnKind::Integer => {
                Storage::Int
            }
            ColumnKind::Flag => Storage::Flag,
            _ => Storage::Float,
        }
    }

    /// Kind used for one half of a Friedel pair.
    ///
    /// Standard deviations are told apart by label: `SIGF` columns become
    /// [`ColumnKind::FriedelSigmaF`], `SIGI` columns [`ColumnKind::FriedelSigmaI`].
    pub fn to_friedel(self, label: &str) -> Self {
        match self {
            ColumnKind::Intensity => ColumnKind::FriedelIntensity,
            ColumnKind::Amplitude => ColumnKind::FriedelAmplitude,
            ColumnKind::StandardDeviation if label.contains("SIGF") => ColumnKind::FriedelSigmaF,
            ColumnKind::StandardDeviation if label.contains("SIGI") => ColumnKind::FriedelSigmaI,
            other => other,
        }
    }

    /// Inverse of [`ColumnKind::to_friedel`].
    pub fn from_friedel(self) -> Self {
        match self {
            ColumnKind::FriedelIntensity => ColumnKind::Intensity,
            ColumnKind::FriedelAmplitude => ColumnKind::Amplitude,
            ColumnKind::FriedelSigmaF | ColumnKind::FriedelSigmaI => ColumnKind::StandardDeviation,
            other => other,
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mtz_code() {
            Some(code) => write!(f, "{code}"),
            None => write!(f, "flag"),
        }
    }
}

/// Column values. Missing entries are NaN for floats and `None` otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    Float(Vec<f64>),
    Int(Vec<Option<i32>>),
    Flag(Vec<Option<bool>>),
}

impl ColumnData {
    /// All-missing data of the given storage
    pub fn missing(storage: Storage, len: usize) -> Self {
        match storage {
            Storage::Float => ColumnData::Float(vec![f64::NAN; len]),
            Storage::Int => ColumnData::Int(vec![None; len]),
            Storage::Flag => ColumnData::Flag(vec![None; len]),
        }
    }

    pub fn storage(&self) -> Storage {
        match self {
            ColumnData::Float(_) => Storage::Float,
            ColumnData::Int(_) => Storage::Int,
            ColumnData::Flag(_) => Storage::Flag,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Float(values) => values.len(),
            ColumnData::Int(values) => values.len(),
            ColumnData::Flag(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_na(&self, row: usize) -> bool {
        match self {
            ColumnData::Float(values) => values[row].is_nan(),
            ColumnData::Int(values) => values[row].is_none(),
            ColumnData::Flag(values) => values[row].is_none(),
        }
    }

    /// Gather rows; `None` produces a missing entry.
    pub fn take_optional(&self, rows: &[Option<usize>]) -> Self {
        match self {
            ColumnData::Float(values) => ColumnData::Float(
                rows.iter()
                    .map(|row| row.map_or(f64::NAN, |r| values[r]))
                    .collect(),
            ),
            ColumnData::Int(values) => {
                ColumnData::Int(rows.iter().map(|row| row.and_then(|r| values[r])).collect())
            }
            ColumnData::Flag(values) => {
                ColumnData::Flag(rows.iter().map(|row| row.and_then(|r| values[r])).collect())
            }
        }
    }

    fn append(&mut self, other: &ColumnData) -> bool {
        match (self, other) {
            (ColumnData::Float(a), ColumnData::Float(b)) => a.extend_from_slice(b),
            (ColumnData::Int(a), ColumnData::Int(b)) => a.extend_from_slice(b),
            (ColumnData::Flag(a), ColumnData::Flag(b)) => a.extend_from_slice(b),
            _ => return false,
        }
        true
    }
}

/// A labelled, typed column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub label: String,
    pub kind: ColumnKind,
    pub data: ColumnData,
}

impl Column {
    /// Create a column, checking that the data storage fits the kind.
    pub fn new(label: impl Into<String>, kind: ColumnKind, data: ColumnData) -> Result<Self> {
        let label = label.into();
        if kind.storage() != data.storage() {
            return Err(ReflectionError::validation(
                ErrorInfo::new("column data does not match the column kind")
                    .with_context("column", &label)
                    .with_context("kind", kind)
                    .with_context("storage", format!("{:?}", data.storage())),
            ));
        }
        Ok(Self { label, kind, data })
    }

    /// Real-valued column (NaN = missing).
    pub fn float(label: impl Into<String>, kind: ColumnKind, values: Vec<f64>) -> Result<Self> {
        Self::new(label, kind, ColumnData::Float(values))
    }

    /// Integer column (`None` = missing).
    pub fn int(label: impl Into<String>, kind: ColumnKind, values: Vec<Option<i32>>) -> Result<Self> {
        Self::new(label, kind, ColumnData::Int(values))
    }

    pub fn flag(label: impl Into<String>, values: Vec<Option<bool>>) -> Self {
        Self {
            label: label.into(),
            kind: ColumnKind::Flag,
            data: ColumnData::Flag(values),
        }
    }

    /// Column of `len` missing values.
    pub fn missing(label: impl Into<String>, kind: ColumnKind, len: usize) -> Self {
        Self {
            label: label.into(),
            kind,
            data: ColumnData::missing(kind.storage(), len),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_na(&self, row: usize) -> bool {
        self.data.is_na(row)
    }

    pub fn as_float(&self) -> Option<&[f64]> {
        match &self.data {
            ColumnData::Float(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<&[Option<i32>]> {
        match &self.data {
            ColumnData::Int(values) => Some(values),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<&[Option<bool>]> {
        match &self.data {
            ColumnData::Flag(values) => Some(values),
            _ => None,
        }
    }

    pub fn take_rows(&self, rows: &[usize]) -> Self {
        let rows: Vec<Option<usize>> = rows.iter().copied().map(Some).collect();
        self.take_optional(&rows)
    }

    pub fn take_optional(&self, rows: &[Option<usize>]) -> Self {
        Self {
            label: self.label.clone(),
            kind: self.kind,
            data: self.data.take_optional(rows),
        }
    }

    pub fn renamed(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Same values under another kind of the same storage.
    pub fn with_kind(mut self, kind: ColumnKind) -> Result<Self> {
        if kind.storage() != self.kind.storage() {
            return Err(ReflectionError::validation(
                ErrorInfo::new("cannot change column kind across storage types")
                    .with_context("column", &self.label)
                    .with_context("from", self.kind)
                    .with_context("to", kind),
            ));
        }
        self.kind = kind;
        Ok(self)
    }

    /// Append the rows of `other`; both columns must share a kind.
    pub fn append(&mut self, other: &Column) -> Result<()> {
        if self.kind != other.kind || !self.data.append(&other.data) {
            return Err(ReflectionError::validation(
                ErrorInfo::new("cannot concatenate columns of different kinds")
                    .with_context("column", &self.label)
                    .with_context("left", self.kind)
                    .with_context("right", other.kind),
            ));
        }
        Ok(())
    }

    /// Map every float value (NaN stays NaN for arithmetic maps); no-op for other storages.
    pub fn map_float(&self, f: impl Fn(f64) -> f64) -> Self {
        let data = match &self.data {
            ColumnData::Float(values) => ColumnData::Float(values.iter().map(|&v| f(v)).collect()),
            other => other.clone(),
        };
        Self {
            label: self.label.clone(),
            kind: self.kind,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mtz_codes_round_trip() {
        for code in "HJKFGDQLMPWABYIR".chars() {
            let kind = ColumnKind::from_mtz_code(code).unwrap();
            assert_eq!(kind.mtz_code(), Some(code));
        }
        assert_eq!(ColumnKind::Flag.mtz_code(), None);
        assert_eq!(ColumnKind::from_mtz_code('X'), None);
    }

    #[test]
    fn test_friedel_kinds() {
        assert_eq!(ColumnKind::Intensity.to_friedel("I"), ColumnKind::FriedelIntensity);
        assert_eq!(ColumnKind::Amplitude.to_friedel("F"), ColumnKind::FriedelAmplitude);
        assert_eq!(
            ColumnKind::StandardDeviation.to_friedel("SIGF"),
            ColumnKind::FriedelSigmaF
        );
        assert_eq!(
            ColumnKind::StandardDeviation.to_friedel("SIGIMEAN"),
            ColumnKind::FriedelSigmaI
        );
        // No SIGF/SIGI hint: unchanged
        assert_eq!(
            ColumnKind::StandardDeviation.to_friedel("SIGDANO"),
            ColumnKind::StandardDeviation
        );
        assert_eq!(ColumnKind::Phase.to_friedel("PHI"), ColumnKind::Phase);

        assert_eq!(ColumnKind::FriedelSigmaI.from_friedel(), ColumnKind::StandardDeviation);
        assert_eq!(ColumnKind::FriedelAmplitude.from_friedel(), ColumnKind::Amplitude);
    }

    #[test]
    fn test_storage_must_match_kind() {
        assert!(Column::float("I", ColumnKind::Intensity, vec![1.0]).is_ok());
        assert!(Column::float("BATCH", ColumnKind::Batch, vec![1.0]).is_err());
        assert!(Column::int("M/ISYM", ColumnKind::MIsym, vec![Some(1)]).is_ok());
        assert!(Column::int("PHI", ColumnKind::Phase, vec![Some(1)]).is_err());
    }

    #[test]
    fn test_take_optional_fills_missing() {
        let column = Column::int("B", ColumnKind::Batch, vec![Some(4), Some(5)]).unwrap();
        let taken = column.take_optional(&[Some(1), None, Some(0)]);
        assert_eq!(taken.as_int().unwrap(), &[Some(5), None, Some(4)]);
        assert!(taken.is_na(1));

        let column = Column::float("F", ColumnKind::Amplitude, vec![1.5]).unwrap();
        let taken = column.take_optional(&[None, Some(0)]);
        assert!(taken.is_na(0));
        assert_eq!(taken.as_float().unwrap()[1], 1.5);
    }

    #[test]
    fn test_append_requires_same_kind() {
        let mut a = Column::float("F", ColumnKind::Amplitude, vec![1.0]).unwrap();
        let b = Column::float("F", ColumnKind::Amplitude, vec![2.0]).unwrap();
        let c = Column::float("F", ColumnKind::FriedelAmplitude, vec![3.0]).unwrap();
        a.append(&b).unwrap();
        assert_eq!(a.as_float().unwrap(), &[1.0, 2.0]);
        assert!(a.append(&c).is_err());
    }

    #[test]
    fn test_kind_change_keeps_storage() {
        let column = Column::float("I", ColumnKind::Intensity, vec![1.0]).unwrap();
        assert_eq!(
            column.clone().with_kind(ColumnKind::FriedelIntensity).unwrap().kind,
            ColumnKind::FriedelIntensity
        );
        assert!(column.with_kind(ColumnKind::Batch).is_err());
    }
}
