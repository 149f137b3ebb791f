//! Error types for the reflection symmetry engine.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use thiserror::Error;

use crate::reflections::MillerIndex;

/// Message plus contextual key/value pairs (column labels, row counts, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorInfo {
    pub message: String,
    pub context: BTreeMap<String, String>,
}

impl ErrorInfo {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.context.is_empty() {
            write!(f, " [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}

/// Dataset metadata that an operation may require.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataField {
    SpaceGroup,
    Cell,
}

impl Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataField::SpaceGroup => write!(f, "space group"),
            MetadataField::Cell => write!(f, "unit cell"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectionError {
    #[error("{field} is not set but is required by {operation}")]
    MissingMetadata {
        field: MetadataField,
        operation: &'static str,
    },

    #[error("validation error: {0}")]
    Validation(ErrorInfo),

    #[error("M/ISYM encoding error: {0}")]
    Encoding(ErrorInfo),

    /// No operation of the group maps the index into the ASU. The adapter is broken.
    #[error("no symmetry operation of {spacegroup} maps {hkl:?} into the reciprocal ASU")]
    SymmetryContractViolation {
        spacegroup: String,
        hkl: MillerIndex,
    },

    #[error("cannot parse symmetry operation '{triplet}': {reason}")]
    SymopParse { triplet: String, reason: String },

    #[error("unknown space group '{0}'")]
    UnknownSpaceGroup(String),
}

impl ReflectionError {
    pub fn validation(info: ErrorInfo) -> Self {
        ReflectionError::Validation(info)
    }

    pub fn encoding(info: ErrorInfo) -> Self {
        ReflectionError::Encoding(info)
    }

    pub fn missing(field: MetadataField, operation: &'static str) -> Self {
        ReflectionError::MissingMetadata { field, operation }
    }

    /// Returns the structured payload for validation and encoding errors.
    pub fn info(&self) -> Option<&ErrorInfo> {
        match self {
            ReflectionError::Validation(info) | ReflectionError::Encoding(info) => Some(info),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_info_display_lists_context_in_key_order() {
        let info = ErrorInfo::new("columns differ")
            .with_context("rows", 12)
            .with_context("column", "I(+)");
        assert_eq!(info.to_string(), "columns differ [column=I(+), rows=12]");
    }

    #[test]
    fn test_missing_metadata_message() {
        let err = ReflectionError::missing(MetadataField::Cell, "compute_dhkl");
        assert_eq!(
            err.to_string(),
            "unit cell is not set but is required by compute_dhkl"
        );
        assert!(err.info().is_none());
    }
}
