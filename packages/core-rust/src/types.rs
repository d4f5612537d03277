use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared kind of a mapped column.
///
/// Integer kinds carry the bit width of the target field so the coercer can
/// reject text that parses as a number but would not fit the slot it is
/// destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    /// UTF-8 text, stored verbatim.
    String,
    /// Base-10 non-negative integer of the given width.
    Unsigned {
        /// Width of the target integer type in bits.
        bits: u32,
    },
    /// Base-10 integer with optional sign, of the given width.
    Signed {
        /// Width of the target integer type in bits.
        bits: u32,
    },
    /// Decimal or scientific-notation floating point.
    Float,
    /// `true` or `false`.
    Boolean,
}

impl FieldKind {
    /// Human-readable kind name used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Unsigned { .. } => "unsigned integer",
            FieldKind::Signed { .. } => "signed integer",
            FieldKind::Float => "float",
            FieldKind::Boolean => "boolean",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single coerced cell value.
///
/// Produced by [`coerce`](crate::coerce::coerce) and handed to the field's
/// accessor, which narrows it to the concrete Rust type of the slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Text cell.
    String(String),
    /// Unsigned integer cell, widened to 64 bits.
    Unsigned(u64),
    /// Signed integer cell, widened to 64 bits.
    Signed(i64),
    /// Floating-point cell.
    Float(f64),
    /// Boolean cell.
    Bool(bool),
}

impl Value {
    /// Zero value substituted for an empty cell of the given kind.
    #[must_use]
    pub fn zero(kind: FieldKind) -> Self {
        match kind {
            FieldKind::String => Value::String(String::new()),
            FieldKind::Unsigned { .. } => Value::Unsigned(0),
            FieldKind::Signed { .. } => Value::Signed(0),
            FieldKind::Float => Value::Float(0.0),
            FieldKind::Boolean => Value::Bool(false),
        }
    }
}
