//! Cell coercion: raw text to a [`Value`] of a declared [`FieldKind`].
//!
//! Empty cells are never errors; they yield the kind's zero value. Every other
//! cell must match its kind exactly. No whitespace trimming is done.

use crate::error::{CoercionError, CoercionFailure};
use crate::types::{FieldKind, Value};

/// Converts one raw cell into a typed value.
///
/// # Errors
///
/// Returns a [`CoercionError`] naming `field`, the raw text, and `kind` when
/// the text is not a valid value of that kind.
pub fn coerce(raw: &str, kind: FieldKind, field: &str) -> Result<Value, CoercionError> {
    if raw.is_empty() {
        return Ok(Value::zero(kind));
    }

    let result = match kind {
        FieldKind::String => Ok(Value::String(raw.to_owned())),
        FieldKind::Unsigned { bits } => coerce_unsigned(raw, bits).map(Value::Unsigned),
        FieldKind::Signed { bits } => coerce_signed(raw, bits).map(Value::Signed),
        FieldKind::Float => raw
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| CoercionFailure::Malformed),
        FieldKind::Boolean => coerce_bool(raw).map(Value::Bool),
    };

    result.map_err(|reason| CoercionError::new(field, raw, kind, reason))
}

/// Accepts `1`/`0`, `t`/`f`, and `true`/`false` in lower, upper, or title
/// case. Mixed case such as `tRuE` is rejected.
fn coerce_bool(raw: &str) -> Result<bool, CoercionFailure> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(CoercionFailure::Malformed),
    }
}

fn coerce_unsigned(raw: &str, bits: u32) -> Result<u64, CoercionFailure> {
    if raw.starts_with('-') {
        return Err(CoercionFailure::Negative);
    }
    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoercionFailure::Malformed);
    }
    // Digits only at this point, so a parse failure can only be overflow.
    let value: u64 = raw
        .parse()
        .map_err(|_| CoercionFailure::OutOfRange { bits })?;
    if value > unsigned_max(bits) {
        return Err(CoercionFailure::OutOfRange { bits });
    }
    Ok(value)
}

fn coerce_signed(raw: &str, bits: u32) -> Result<i64, CoercionFailure> {
    let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoercionFailure::Malformed);
    }
    let value: i64 = raw
        .parse()
        .map_err(|_| CoercionFailure::OutOfRange { bits })?;
    let (min, max) = signed_bounds(bits);
    if value < min || value > max {
        return Err(CoercionFailure::OutOfRange { bits });
    }
    Ok(value)
}

fn unsigned_max(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

fn signed_bounds(bits: u32) -> (i64, i64) {
    if bits >= i64::BITS {
        (i64::MIN, i64::MAX)
    } else {
        let max = (1i64 << (bits - 1)) - 1;
        (-max - 1, max)
    }
}
