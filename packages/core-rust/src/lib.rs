//! `Dex` Core -- schema-driven loading of delimited record files.
//!
//! A record type declares its column mapping as a [`Schema`]; the
//! [`RecordStore`] validates a source's header row against it, coerces every
//! data row into a typed record, and indexes the results by identifier.

pub mod coerce;
pub mod error;
pub mod parser;
pub mod schema;
pub mod store;
pub mod traits;
pub mod types;
pub mod validator;

pub use coerce::coerce;
pub use error::{
    CoercionError, CoercionFailure, LoadError, NotFound, ParseError, SchemaError, ValidationError,
};
pub use parser::{parse_record, RecordParser, Row};
pub use schema::{FieldSpec, FieldType, Schema, SchemaBuilder};
pub use store::{LoadState, LoadSummary, LoaderOptions, RecordStore};
pub use traits::Record;
pub use types::{FieldKind, Value};
pub use validator::{HeaderPositions, HeaderValidator};
