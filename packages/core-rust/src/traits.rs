use crate::error::SchemaError;
use crate::schema::Schema;

/// A record type the store can load from a delimited source.
///
/// Implementors declare their column mapping once in [`Record::schema`]; the
/// store builds it at the start of every load and passes it explicitly to the
/// validator and parser. Fields left out of the schema keep their `Default`
/// value.
pub trait Record: Default + Clone + Send + Sync + 'static {
    /// Unique identifier used as the store key.
    fn id(&self) -> u64;

    /// Column mapping for this type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the declaration is invalid (e.g. a column
    /// name used twice).
    fn schema() -> Result<Schema<Self>, SchemaError>;
}
