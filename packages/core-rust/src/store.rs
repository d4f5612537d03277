//! Identifier-indexed record store populated from a delimited source.
//!
//! Lifecycle: `Empty -> Loading -> {Ready | Failed}`. A load parses the whole
//! source into a staging map before touching the store, so a failed load
//! leaves the previously visible records (none, on a first load) in place.
//! A successful load replaces the store's contents wholesale.
//!
//! Loading takes `&mut self`; once it returns the store is a read-only
//! snapshot and can be shared freely across readers.

use std::collections::HashMap;
use std::fs::File;
use std::io;
use std::path::Path;

use csv::{Position, ReaderBuilder, StringRecord};
use tracing::{debug, info, warn};

use crate::error::{LoadError, NotFound};
use crate::parser::RecordParser;
use crate::traits::Record;
use crate::validator::HeaderValidator;

/// Where the store is in its load lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Never loaded.
    Empty,
    /// A load is in progress.
    Loading,
    /// The last load succeeded.
    Ready,
    /// The last load failed; contents are those of the last successful load.
    Failed,
}

impl LoadState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            LoadState::Empty => "empty",
            LoadState::Loading => "loading",
            LoadState::Ready => "ready",
            LoadState::Failed => "failed",
        }
    }
}

/// Options applied to every load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Reject header columns the schema does not declare.
    pub strict: bool,
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            strict: true,
            delimiter: b',',
        }
    }
}

/// Summary of a successful load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadSummary {
    /// Data rows parsed.
    pub rows: usize,
    /// Distinct identifiers stored. Lower than `rows` when identifiers repeat.
    pub records: usize,
}

/// Records of type `R` keyed by [`Record::id`].
#[derive(Debug, Clone)]
pub struct RecordStore<R> {
    items: HashMap<u64, R>,
    options: LoaderOptions,
    state: LoadState,
}

impl<R: Record> RecordStore<R> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(LoaderOptions::default())
    }

    #[must_use]
    pub fn with_options(options: LoaderOptions) -> Self {
        Self {
            items: HashMap::new(),
            options,
            state: LoadState::Empty,
        }
    }

    #[must_use]
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Loads records from the file at `path`.
    ///
    /// The file is opened for the duration of the call only.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::SourceOpen`] if the file cannot be opened, or any
    /// error [`load_reader`](Self::load_reader) returns.
    pub fn load_path(&mut self, path: impl AsRef<Path>) -> Result<LoadSummary, LoadError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "opening record source");
        match File::open(path) {
            Ok(file) => self.load_reader(file),
            Err(source) => {
                self.state = LoadState::Failed;
                warn!(path = %path.display(), error = %source, "record source could not be opened");
                Err(LoadError::SourceOpen {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    /// Loads records from any byte source.
    ///
    /// The first line is the header row; every following line is one record.
    /// A later row with an already-seen identifier replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Any header, validation, read, or parse error aborts the load. The
    /// store keeps its previous contents and moves to [`LoadState::Failed`].
    pub fn load_reader<S: io::Read>(&mut self, source: S) -> Result<LoadSummary, LoadError> {
        self.state = LoadState::Loading;
        match self.read_all(source) {
            Ok((items, rows)) => {
                self.items = items;
                self.state = LoadState::Ready;
                let summary = LoadSummary {
                    rows,
                    records: self.items.len(),
                };
                info!(rows = summary.rows, records = summary.records, "record store loaded");
                Ok(summary)
            }
            Err(err) => {
                self.state = LoadState::Failed;
                warn!(error = %err, "record store load failed");
                Err(err)
            }
        }
    }

    fn read_all<S: io::Read>(&self, source: S) -> Result<(HashMap<u64, R>, usize), LoadError> {
        let schema = R::schema()?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(self.options.delimiter)
            .from_reader(source);

        let mut header = StringRecord::new();
        let has_header = reader
            .read_record(&mut header)
            .map_err(|source| LoadError::HeaderRead { source })?;
        if !has_header {
            return Err(LoadError::EmptySource);
        }

        let headers: Vec<&str> = header.iter().collect();
        let positions = HeaderValidator::new(self.options.strict).validate(&headers, &schema)?;
        debug!(columns = schema.len(), headers = headers.len(), "header row validated");

        let parser = RecordParser::new(&schema, &positions).map_err(|source| LoadError::Parse {
            line: 1,
            source,
        })?;

        let mut items = HashMap::new();
        let mut rows = 0;
        let mut row = StringRecord::new();
        loop {
            match reader.read_record(&mut row) {
                Ok(true) => {}
                Ok(false) => break,
                Err(source) => {
                    let line = source.position().map_or(0, Position::line);
                    return Err(LoadError::Read { line, source });
                }
            }
            let line = row.position().map_or(0, Position::line);
            let record: R = parser
                .parse(&row)
                .map_err(|source| LoadError::Parse { line, source })?;
            if let Some(previous) = items.insert(record.id(), record) {
                debug!(id = previous.id(), line, "identifier repeated; keeping later row");
            }
            rows += 1;
        }

        Ok((items, rows))
    }

    /// Looks up a record by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`NotFound`] if no record has this identifier.
    pub fn get_by_id(&self, id: u64) -> Result<&R, NotFound> {
        self.items.get(&id).ok_or(NotFound { id })
    }

    #[must_use]
    pub fn contains(&self, id: u64) -> bool {
        self.items.contains_key(&id)
    }

    /// All records, in no particular order.
    #[must_use]
    pub fn list(&self) -> Vec<&R> {
        self.items.values().collect()
    }

    /// Records matching `predicate`, in no particular order.
    pub fn search<P: FnMut(&R) -> bool>(&self, mut predicate: P) -> Vec<&R> {
        self.items.values().filter(|item| predicate(item)).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<R: Record> Default for RecordStore<R> {
    fn default() -> Self {
        Self::new()
    }
}
