//! Header row reconciliation against a schema.
//!
//! Matching is by name, never by position: a file may list its columns in any
//! order. Every expected column must be present. Unexpected columns are an
//! error in strict mode and ignored otherwise.

use std::collections::{HashMap, HashSet};

use crate::error::ValidationError;
use crate::schema::Schema;

/// Column name to zero-based index in the observed header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderPositions {
    positions: HashMap<String, usize>,
}

impl HeaderPositions {
    /// Indexes a header row. A repeated name keeps its first position.
    #[must_use]
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let mut positions = HashMap::with_capacity(headers.len());
        for (index, header) in headers.iter().enumerate() {
            positions
                .entry(header.as_ref().to_owned())
                .or_insert(index);
        }
        Self { positions }
    }

    /// Index of `column` in the header row.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<usize> {
        self.positions.get(column).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Column names and their header indices, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.positions.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

/// Validates header rows against expected column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderValidator {
    strict: bool,
}

impl HeaderValidator {
    /// `strict` rejects header names the schema does not declare.
    #[must_use]
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    #[must_use]
    pub fn strict() -> Self {
        Self::new(true)
    }

    #[must_use]
    pub fn lenient() -> Self {
        Self::new(false)
    }

    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Validates `headers` against the schema's columns and returns their
    /// positions.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if an expected column is missing, or in
    /// strict mode if the header row contains an undeclared column.
    pub fn validate<R, S: AsRef<str>>(
        &self,
        headers: &[S],
        schema: &Schema<R>,
    ) -> Result<HeaderPositions, ValidationError> {
        self.validate_columns(headers, &schema.columns())
    }

    /// Same as [`validate`](Self::validate) against a plain list of names.
    ///
    /// # Errors
    ///
    /// See [`validate`](Self::validate).
    pub fn validate_columns<S: AsRef<str>, E: AsRef<str>>(
        &self,
        headers: &[S],
        expected: &[E],
    ) -> Result<HeaderPositions, ValidationError> {
        let observed: HashSet<&str> = headers.iter().map(AsRef::as_ref).collect();
        let declared: HashSet<&str> = expected.iter().map(AsRef::as_ref).collect();

        let missing: Vec<String> = expected
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| !observed.contains(name))
            .map(str::to_owned)
            .collect();

        let extra: Vec<String> = if self.strict {
            headers
                .iter()
                .map(AsRef::as_ref)
                .filter(|name| !declared.contains(name))
                .map(str::to_owned)
                .collect()
        } else {
            Vec::new()
        };

        if !missing.is_empty() || !extra.is_empty() {
            return Err(ValidationError {
                expected: expected.iter().map(|s| s.as_ref().to_owned()).collect(),
                observed: headers.iter().map(|s| s.as_ref().to_owned()).collect(),
                missing,
                extra,
            });
        }

        Ok(HeaderPositions::from_headers(headers))
    }
}

impl Default for HeaderValidator {
    fn default() -> Self {
        Self::strict()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[derive(Debug, Default)]
    struct Fixture {
        name: String,
        optional: String,
        no_csv: String,
        different: String,
        id: u64,
    }

    fn fixture_schema() -> Schema<Fixture> {
        Schema::builder()
            .field("name", |f: &mut Fixture| &mut f.name)
            .field("optional", |f: &mut Fixture| &mut f.optional)
            .field("", |f: &mut Fixture| &mut f.no_csv)
            .field("csv_name", |f: &mut Fixture| &mut f.different)
            .field("id", |f: &mut Fixture| &mut f.id)
            .build()
            .unwrap()
    }

    #[test]
    fn exact_match_is_valid() {
        let schema = fixture_schema();
        let result = HeaderValidator::strict().validate(&["id", "name", "optional", "csv_name"], &schema);
        assert!(result.is_ok());
    }

    #[test]
    fn missing_header_is_reported() {
        let schema = fixture_schema();
        let err = HeaderValidator::strict()
            .validate(&["id", "name", "csv_name"], &schema)
            .unwrap_err();
        assert_eq!(err.missing, vec!["optional"]);
        assert!(err.extra.is_empty());
        assert_eq!(err.expected, vec!["name", "optional", "csv_name", "id"]);
        assert_eq!(err.observed, vec!["id", "name", "csv_name"]);
    }

    #[test]
    fn extra_header_is_rejected_in_strict_mode() {
        let schema = fixture_schema();
        let err = HeaderValidator::strict()
            .validate(&["id", "name", "optional", "csv_name", "extra"], &schema)
            .unwrap_err();
        assert_eq!(err.extra, vec!["extra"]);
        assert!(err.missing.is_empty());
    }

    #[test]
    fn extra_header_is_ignored_in_lenient_mode() {
        let schema = fixture_schema();
        let positions = HeaderValidator::lenient()
            .validate(&["id", "name", "optional", "csv_name", "extra_ok"], &schema)
            .unwrap();
        assert_eq!(positions.get("id"), Some(0));
        assert_eq!(positions.get("extra_ok"), Some(4));
    }

    #[test]
    fn missing_header_is_fatal_in_lenient_mode() {
        let schema = fixture_schema();
        let err = HeaderValidator::lenient()
            .validate(&["id", "name", "extra_ok"], &schema)
            .unwrap_err();
        assert_eq!(err.missing, vec!["optional", "csv_name"]);
        assert!(err.extra.is_empty());
    }

    #[test]
    fn positions_follow_observed_order() {
        let schema = fixture_schema();
        let positions = HeaderValidator::strict()
            .validate(&["name", "id", "csv_name", "optional"], &schema)
            .unwrap();
        assert_eq!(positions.get("id"), Some(1));
        assert_eq!(positions.get("name"), Some(0));
        assert_eq!(positions.get("csv_name"), Some(2));
        assert_eq!(positions.get("optional"), Some(3));
        assert_eq!(positions.len(), 4);
    }

    #[test]
    fn repeated_header_keeps_first_position() {
        let positions = HeaderPositions::from_headers(&["id", "name", "id"]);
        assert_eq!(positions.get("id"), Some(0));
        assert_eq!(positions.len(), 2);
    }

    #[test]
    fn empty_schema_rejects_any_header_in_strict_mode() {
        let schema = Schema::<Fixture>::builder().build().unwrap();
        let err = HeaderValidator::strict().validate(&["id"], &schema).unwrap_err();
        assert_eq!(err.extra, vec!["id"]);
        assert!(HeaderValidator::strict()
            .validate::<Fixture, &str>(&[], &schema)
            .is_ok());
    }

    #[test]
    fn default_validator_is_strict() {
        assert!(HeaderValidator::default().is_strict());
    }

    fn names(pattern: &'static str) -> impl Strategy<Value = Vec<String>> {
        prop::collection::hash_set(pattern, 1..8).prop_map(|set| set.into_iter().collect())
    }

    proptest! {
        #[test]
        fn any_permutation_validates_by_name(
            (expected, observed) in names("[a-z_]{1,10}")
                .prop_flat_map(|names| (Just(names.clone()), Just(names).prop_shuffle()))
        ) {
            let positions = HeaderValidator::strict()
                .validate_columns(&observed, &expected)
                .unwrap();
            for name in &expected {
                prop_assert_eq!(positions.get(name), observed.iter().position(|h| h == name));
            }
        }

        #[test]
        fn missing_is_expected_minus_observed(
            (expected, observed) in names("[a-z_]{1,10}").prop_flat_map(|names| {
                let len = names.len();
                (Just(names.clone()), prop::sample::subsequence(names, 0..len))
            }),
            strict in any::<bool>(),
        ) {
            let err = HeaderValidator::new(strict)
                .validate_columns(&observed, &expected)
                .unwrap_err();
            let want: Vec<String> = expected
                .iter()
                .filter(|name| !observed.contains(name))
                .cloned()
                .collect();
            prop_assert_eq!(err.missing, want);
        }

        // Disjoint alphabets keep the extras out of the expected set.
        #[test]
        fn extra_is_observed_minus_expected_only_when_strict(
            (expected, observed) in (names("[a-m]{1,6}"), names("[n-z]{1,6}"))
                .prop_flat_map(|(expected, extras)| {
                    let mut all = expected.clone();
                    all.extend(extras);
                    (Just(expected), Just(all).prop_shuffle())
                })
        ) {
            let err = HeaderValidator::strict()
                .validate_columns(&observed, &expected)
                .unwrap_err();
            let want: Vec<String> = observed
                .iter()
                .filter(|name| !expected.contains(name))
                .cloned()
                .collect();
            prop_assert_eq!(err.extra, want);
            prop_assert!(err.missing.is_empty());

            prop_assert!(HeaderValidator::lenient()
                .validate_columns(&observed, &expected)
                .is_ok());
        }
    }
}
