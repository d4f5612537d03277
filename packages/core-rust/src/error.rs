//! Error taxonomy for schema declaration, header validation, row parsing,
//! and store loading.
//!
//! Errors nest from the innermost cause outward: a [`CoercionError`] names the
//! failing field, raw value, and kind; [`ParseError`] wraps it for a single
//! row; [`LoadError`] adds the source line number. Callers can always walk
//! back down to the cell that failed via [`LoadError::coercion`].

use std::io;
use std::path::PathBuf;

use crate::types::FieldKind;

/// Errors raised while declaring a schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("column `{column}` is declared more than once")]
    DuplicateColumn { column: String },
}

/// Header row does not match the schema's expected columns.
///
/// Carries both full lists so the caller can show the whole picture, not
/// just the first offending column.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error(
    "header validation failed: {}; expected {expected:?}, got {observed:?}",
    describe_mismatch(.missing, .extra)
)]
pub struct ValidationError {
    /// Column names the schema expects, in schema order.
    pub expected: Vec<String>,
    /// Header row as observed in the source.
    pub observed: Vec<String>,
    /// Expected names absent from the header row, in schema order.
    pub missing: Vec<String>,
    /// Observed names the schema does not declare, in header order.
    /// Only populated in strict mode.
    pub extra: Vec<String>,
}

fn describe_mismatch(missing: &[String], extra: &[String]) -> String {
    let mut parts = Vec::with_capacity(2);
    if !missing.is_empty() {
        parts.push(format!("missing required headers {missing:?}"));
    }
    if !extra.is_empty() {
        parts.push(format!("unexpected headers {extra:?}"));
    }
    parts.join(", ")
}

/// Why a cell failed to coerce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CoercionFailure {
    #[error("invalid syntax")]
    Malformed,
    #[error("negative values are not allowed")]
    Negative,
    #[error("does not fit in {bits} bits")]
    OutOfRange { bits: u32 },
}

/// A single cell's text does not match its column's declared kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("field `{field}`: value {value:?} is not a valid {kind}: {reason}")]
pub struct CoercionError {
    /// Column name of the failing field.
    pub field: String,
    /// Raw cell text exactly as read.
    pub value: String,
    /// Kind the cell was coerced to.
    pub kind: FieldKind,
    /// Failure reason; part of the message, not a `source`.
    pub reason: CoercionFailure,
}

impl CoercionError {
    #[must_use]
    pub fn new(field: &str, value: &str, kind: FieldKind, reason: CoercionFailure) -> Self {
        Self {
            field: field.to_owned(),
            value: value.to_owned(),
            kind,
            reason,
        }
    }
}

/// A single row could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("row too short: got {got} fields, need at least {need}")]
    RowTooShort { got: usize, need: usize },
    #[error("column `{column}` has no position in the header map")]
    UnmappedColumn { column: String },
    #[error(transparent)]
    Field(#[from] CoercionError),
}

impl ParseError {
    /// The failing cell, if this row failed on coercion.
    #[must_use]
    pub fn coercion(&self) -> Option<&CoercionError> {
        match self {
            ParseError::Field(err) => Some(err),
            _ => None,
        }
    }
}

/// Errors that abort a store load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),
    #[error("opening source {}: {source}", .path.display())]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("source has no header row")]
    EmptySource,
    #[error("reading header row: {source}")]
    HeaderRead {
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("reading row at line {line}: {source}")]
    Read {
        line: u64,
        #[source]
        source: csv::Error,
    },
    #[error("parsing row at line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    /// Source line of the failing data row, when the failure is row-scoped.
    #[must_use]
    pub fn line(&self) -> Option<u64> {
        match self {
            LoadError::Read { line, .. } | LoadError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The failing cell, when the load aborted on a coercion failure.
    #[must_use]
    pub fn coercion(&self) -> Option<&CoercionError> {
        match self {
            LoadError::Parse { source, .. } => source.coercion(),
            _ => None,
        }
    }
}

/// Lookup by identifier matched no record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("record with id {id} not found")]
pub struct NotFound {
    pub id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coercion_error_names_field_value_and_kind() {
        let err = CoercionError::new(
            "height",
            "tall",
            FieldKind::Unsigned { bits: 32 },
            CoercionFailure::Malformed,
        );
        assert_eq!(
            err.to_string(),
            "field `height`: value \"tall\" is not a valid unsigned integer: invalid syntax"
        );
    }

    #[test]
    fn coercion_reason_is_not_repeated_in_the_chain() {
        use std::error::Error as _;

        let err = CoercionError::new(
            "on",
            "yes",
            FieldKind::Boolean,
            CoercionFailure::Malformed,
        );
        assert!(err.source().is_none());
        assert_eq!(err.to_string().matches("invalid syntax").count(), 1);
    }

    #[test]
    fn validation_error_lists_missing_and_extra() {
        let err = ValidationError {
            expected: vec!["id".into(), "name".into()],
            observed: vec!["id".into(), "nick".into()],
            missing: vec!["name".into()],
            extra: vec!["nick".into()],
        };
        let msg = err.to_string();
        assert!(msg.contains("missing required headers [\"name\"]"));
        assert!(msg.contains("unexpected headers [\"nick\"]"));
        assert!(msg.contains("expected [\"id\", \"name\"]"));
    }

    #[test]
    fn load_error_exposes_line_and_cell() {
        let cell = CoercionError::new(
            "id",
            "abc",
            FieldKind::Unsigned { bits: 64 },
            CoercionFailure::Malformed,
        );
        let err = LoadError::Parse {
            line: 3,
            source: ParseError::Field(cell.clone()),
        };
        assert_eq!(err.line(), Some(3));
        assert_eq!(err.coercion(), Some(&cell));
        assert!(err.to_string().starts_with("parsing row at line 3: field `id`"));
    }

    #[test]
    fn row_too_short_has_no_cell() {
        let err = ParseError::RowTooShort { got: 1, need: 3 };
        assert!(err.coercion().is_none());
        assert_eq!(err.to_string(), "row too short: got 1 fields, need at least 3");
    }
}
