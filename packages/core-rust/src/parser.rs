//! Row-to-record parsing.
//!
//! [`RecordParser`] resolves every schema field to its column once, then
//! turns rows into records. Parsing is fail-fast: the first cell that does not
//! coerce aborts the row, and no partially populated record escapes.

use crate::coerce::coerce;
use crate::error::ParseError;
use crate::schema::Schema;
use crate::validator::HeaderPositions;

/// Ordered cells of one data row.
pub trait Row {
    /// Number of cells in the row.
    fn cell_count(&self) -> usize;

    /// Cell text at `index`, or `None` past the end.
    fn cell(&self, index: usize) -> Option<&str>;
}

impl<S: AsRef<str>> Row for [S] {
    fn cell_count(&self) -> usize {
        self.len()
    }

    fn cell(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }
}

impl<S: AsRef<str>> Row for Vec<S> {
    fn cell_count(&self) -> usize {
        self.len()
    }

    fn cell(&self, index: usize) -> Option<&str> {
        self.get(index).map(AsRef::as_ref)
    }
}

impl Row for csv::StringRecord {
    fn cell_count(&self) -> usize {
        self.len()
    }

    fn cell(&self, index: usize) -> Option<&str> {
        self.get(index)
    }
}

/// Parser bound to one schema and one header layout.
#[derive(Debug)]
pub struct RecordParser<'s, R> {
    schema: &'s Schema<R>,
    columns: Vec<usize>,
    need: usize,
}

impl<'s, R: Default> RecordParser<'s, R> {
    /// Resolves each schema field's column index.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::UnmappedColumn`] if a schema column has no
    /// position. Positions produced by the header validator always cover the
    /// schema.
    pub fn new(schema: &'s Schema<R>, positions: &HeaderPositions) -> Result<Self, ParseError> {
        let columns = schema
            .fields()
            .iter()
            .map(|field| {
                positions
                    .get(field.column())
                    .ok_or_else(|| ParseError::UnmappedColumn {
                        column: field.column().to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let need = columns.iter().max().map_or(0, |max| max + 1);

        Ok(Self {
            schema,
            columns,
            need,
        })
    }

    /// Minimum number of cells a row must have.
    #[must_use]
    pub fn min_cells(&self) -> usize {
        self.need
    }

    /// Parses one row into a fully populated record.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::RowTooShort`] before touching any cell if the
    /// row cannot cover every mapped column, or [`ParseError::Field`] for the
    /// first cell that fails to coerce.
    pub fn parse<W: Row + ?Sized>(&self, row: &W) -> Result<R, ParseError> {
        let got = row.cell_count();
        if got < self.need {
            return Err(ParseError::RowTooShort {
                got,
                need: self.need,
            });
        }

        let mut record = R::default();
        for (field, &column) in self.schema.fields().iter().zip(&self.columns) {
            let raw = row.cell(column).unwrap_or_default();
            let value = coerce(raw, field.kind(), field.column())?;
            field.assign(&mut record, value, raw)?;
        }
        Ok(record)
    }
}

/// Parses a single row without keeping the resolved layout around.
///
/// # Errors
///
/// See [`RecordParser::new`] and [`RecordParser::parse`].
pub fn parse_record<R: Default, W: Row + ?Sized>(
    row: &W,
    positions: &HeaderPositions,
    schema: &Schema<R>,
) -> Result<R, ParseError> {
    RecordParser::new(schema, positions)?.parse(row)
}
