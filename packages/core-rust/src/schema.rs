//! Statically declared record schemas.
//!
//! A [`Schema`] is the ordered list of columns a record type maps from a
//! delimited source. Each column is declared once with a name and an accessor
//! returning the record's storage slot; the column's [`FieldKind`] is derived
//! from the slot's Rust type through [`FieldType`].
//!
//! ```
//! use dex_core::Schema;
//!
//! #[derive(Default)]
//! struct Row {
//!     id: u64,
//!     name: String,
//!     cached: Vec<u8>,
//! }
//!
//! let schema = Schema::<Row>::builder()
//!     .field("id", |r: &mut Row| &mut r.id)
//!     .field("name", |r: &mut Row| &mut r.name)
//!     .build()
//!     .unwrap();
//! assert_eq!(schema.columns(), vec!["id", "name"]);
//! ```
//!
//! Fields that are never declared (`cached` above) are not mapped and keep
//! their `Default` value in every parsed record.

use std::collections::HashSet;
use std::fmt;

use crate::error::{CoercionError, CoercionFailure, SchemaError};
use crate::types::{FieldKind, Value};

/// Rust types that can back a mapped column.
pub trait FieldType: Sized + 'static {
    /// Kind the coercer parses cells of this type as.
    const KIND: FieldKind;

    /// Narrows a coerced value to this type. Returns `None` when the value's
    /// variant or magnitude does not fit.
    fn from_value(value: Value) -> Option<Self>;
}

impl FieldType for String {
    const KIND: FieldKind = FieldKind::String;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl FieldType for bool {
    const KIND: FieldKind = FieldKind::Boolean;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }
}

impl FieldType for f64 {
    const KIND: FieldKind = FieldKind::Float;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldType for f32 {
    const KIND: FieldKind = FieldKind::Float;

    // Finite values that overflow `f32` are rejected; infinities and NaN
    // pass through.
    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(v) => {
                let narrowed = v as f32;
                (narrowed.is_finite() || !v.is_finite()).then_some(narrowed)
            }
            _ => None,
        }
    }
}

macro_rules! integer_field_type {
    ($variant:ident, $kind:ident: $($ty:ty),+) => {
        $(
            impl FieldType for $ty {
                const KIND: FieldKind = FieldKind::$kind { bits: <$ty>::BITS };

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => <$ty>::try_from(v).ok(),
                        _ => None,
                    }
                }
            }
        )+
    };
}

integer_field_type!(Unsigned, Unsigned: u8, u16, u32, u64, usize);
integer_field_type!(Signed, Signed: i8, i16, i32, i64, isize);

type Assign<R> = Box<dyn Fn(&mut R, Value) -> bool + Send + Sync>;

/// One mapped column: logical name, declaration index, kind, and slot.
pub struct FieldSpec<R> {
    column: String,
    index: usize,
    kind: FieldKind,
    assign: Assign<R>,
}

impl<R> FieldSpec<R> {
    /// Logical column name matched against the header row.
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// Declaration index of the field; identifies the slot within the record.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Kind cells in this column are coerced to.
    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Stores a coerced value into the record's slot.
    ///
    /// # Errors
    ///
    /// Returns a [`CoercionError`] if the value does not fit the slot's type.
    /// Integers from [`coerce`](crate::coerce::coerce) are already
    /// width-checked; an `f32` slot still rejects finite values beyond its
    /// range.
    pub fn assign(&self, record: &mut R, value: Value, raw: &str) -> Result<(), CoercionError> {
        if (self.assign)(record, value) {
            Ok(())
        } else {
            let reason = match self.kind {
                FieldKind::Unsigned { bits } | FieldKind::Signed { bits } => {
                    CoercionFailure::OutOfRange { bits }
                }
                // Only `f32` slots reject a float.
                FieldKind::Float => CoercionFailure::OutOfRange { bits: 32 },
                _ => CoercionFailure::Malformed,
            };
            Err(CoercionError::new(&self.column, raw, self.kind, reason))
        }
    }
}

impl<R> fmt::Debug for FieldSpec<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSpec")
            .field("column", &self.column)
            .field("index", &self.index)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Ordered set of mapped columns for record type `R`.
///
/// Column names are unique; [`SchemaBuilder::build`] enforces this.
pub struct Schema<R> {
    fields: Vec<FieldSpec<R>>,
}

impl<R: 'static> Schema<R> {
    #[must_use]
    pub fn builder() -> SchemaBuilder<R> {
        SchemaBuilder {
            fields: Vec::new(),
            declared: 0,
        }
    }
}

impl<R> Schema<R> {
    /// Mapped fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec<R>] {
        &self.fields
    }

    /// Expected header names in declaration order.
    #[must_use]
    pub fn columns(&self) -> Vec<&str> {
        self.fields.iter().map(FieldSpec::column).collect()
    }

    /// `(column, field index, kind)` for every mapped field, in order.
    #[must_use]
    pub fn descriptors(&self) -> Vec<(&str, usize, FieldKind)> {
        self.fields
            .iter()
            .map(|f| (f.column(), f.index(), f.kind()))
            .collect()
    }

    #[must_use]
    pub fn field(&self, column: &str) -> Option<&FieldSpec<R>> {
        self.fields.iter().find(|f| f.column == column)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<R> fmt::Debug for Schema<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.fields).finish()
    }
}

/// Builder for [`Schema`].
pub struct SchemaBuilder<R> {
    fields: Vec<FieldSpec<R>>,
    declared: usize,
}

impl<R: 'static> SchemaBuilder<R> {
    /// Declares a mapped column backed by the slot `slot` returns.
    ///
    /// An empty column name declares the field without mapping it: it takes
    /// up a field index but is neither validated nor populated.
    #[must_use]
    pub fn field<T: FieldType>(mut self, column: &str, slot: fn(&mut R) -> &mut T) -> Self {
        let index = self.declared;
        self.declared += 1;
        if column.is_empty() {
            return self;
        }

        let assign: Assign<R> = Box::new(move |record, value| match T::from_value(value) {
            Some(v) => {
                *slot(record) = v;
                true
            }
            None => false,
        });

        self.fields.push(FieldSpec {
            column: column.to_owned(),
            index,
            kind: T::KIND,
            assign,
        });
        self
    }

    /// Finishes the schema.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::DuplicateColumn`] if two fields share a column name.
    pub fn build(self) -> Result<Schema<R>, SchemaError> {
        let mut seen = HashSet::with_capacity(self.fields.len());
        for field in &self.fields {
            if !seen.insert(field.column.as_str()) {
                return Err(SchemaError::DuplicateColumn {
                    column: field.column.clone(),
                });
            }
        }
        Ok(Schema {
            fields: self.fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Sample {
        name: String,
        skipped: String,
        count: i32,
        size: u16,
        ratio: f64,
        enabled: bool,
    }

    fn sample_schema() -> Schema<Sample> {
        Schema::builder()
            .field("name", |s: &mut Sample| &mut s.name)
            .field("", |s: &mut Sample| &mut s.skipped)
            .field("count", |s: &mut Sample| &mut s.count)
            .field("size", |s: &mut Sample| &mut s.size)
            .field("ratio", |s: &mut Sample| &mut s.ratio)
            .field("enabled", |s: &mut Sample| &mut s.enabled)
            .build()
            .unwrap()
    }

    #[test]
    fn columns_follow_declaration_order() {
        let schema = sample_schema();
        assert_eq!(schema.columns(), vec!["name", "count", "size", "ratio", "enabled"]);
        assert_eq!(schema.len(), 5);
    }

    #[test]
    fn unnamed_field_is_skipped_but_keeps_its_index() {
        let schema = sample_schema();
        let descriptors = schema.descriptors();
        assert_eq!(descriptors[0], ("name", 0, FieldKind::String));
        assert_eq!(descriptors[1], ("count", 2, FieldKind::Signed { bits: 32 }));
        assert_eq!(descriptors[2], ("size", 3, FieldKind::Unsigned { bits: 16 }));
        assert_eq!(descriptors[3], ("ratio", 4, FieldKind::Float));
        assert_eq!(descriptors[4], ("enabled", 5, FieldKind::Boolean));
    }

    #[test]
    fn duplicate_column_is_rejected() {
        let err = Schema::<Sample>::builder()
            .field("name", |s: &mut Sample| &mut s.name)
            .field("name", |s: &mut Sample| &mut s.skipped)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            SchemaError::DuplicateColumn {
                column: "name".into()
            }
        );
    }

    #[test]
    fn empty_schema_is_valid() {
        let schema = Schema::<Sample>::builder().build().unwrap();
        assert!(schema.is_empty());
        assert!(schema.columns().is_empty());
    }

    #[test]
    fn assign_writes_the_slot() {
        let schema = sample_schema();
        let mut record = Sample::default();
        schema
            .field("size")
            .unwrap()
            .assign(&mut record, Value::Unsigned(512), "512")
            .unwrap();
        schema
            .field("enabled")
            .unwrap()
            .assign(&mut record, Value::Bool(true), "true")
            .unwrap();
        assert_eq!(record.size, 512);
        assert!(record.enabled);
        assert_eq!(record.skipped, "");
    }

    #[test]
    fn assign_rejects_values_wider_than_the_slot() {
        let schema = sample_schema();
        let mut record = Sample::default();
        let err = schema
            .field("size")
            .unwrap()
            .assign(&mut record, Value::Unsigned(70_000), "70000")
            .unwrap_err();
        assert_eq!(err.field, "size");
        assert_eq!(err.value, "70000");
        assert_eq!(err.reason, CoercionFailure::OutOfRange { bits: 16 });
        assert_eq!(record.size, 0);
    }

    #[test]
    fn f32_slot_rejects_finite_overflow() {
        #[derive(Debug, Default)]
        struct Reading {
            level: f32,
        }

        let schema = Schema::<Reading>::builder()
            .field("level", |r: &mut Reading| &mut r.level)
            .build()
            .unwrap();
        let level = schema.field("level").unwrap();
        let mut record = Reading::default();

        let err = level
            .assign(&mut record, Value::Float(1e300), "1e300")
            .unwrap_err();
        assert_eq!(err.reason, CoercionFailure::OutOfRange { bits: 32 });
        assert_eq!(record.level, 0.0);

        level.assign(&mut record, Value::Float(2.5), "2.5").unwrap();
        assert_eq!(record.level, 2.5);
        level
            .assign(&mut record, Value::Float(f64::INFINITY), "inf")
            .unwrap();
        assert!(record.level.is_infinite());
    }
}
