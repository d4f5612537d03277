//! Shared, atomically swappable snapshot of the loaded record store.
//!
//! Handlers read through [`Catalog::snapshot`] without locking. The store
//! inside a snapshot is never mutated; a reload builds a fresh store and
//! publishes it with a single pointer swap, so in-flight readers keep the
//! snapshot they started with.

use std::path::Path;
use std::sync::Arc;

use arc_swap::ArcSwap;
use dex_core::{LoadError, LoadSummary, LoaderOptions, RecordStore};
use tracing::info;

use crate::models::Pokemon;

/// Number of records echoed to the log after startup.
const PREVIEW_COUNT: usize = 5;

/// Shared handle to the current `Pokemon` store.
#[derive(Debug, Clone)]
pub struct Catalog {
    current: Arc<ArcSwap<RecordStore<Pokemon>>>,
    options: LoaderOptions,
}

impl Catalog {
    /// Creates a catalog holding an empty store.
    #[must_use]
    pub fn new(options: LoaderOptions) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(RecordStore::with_options(
                options.clone(),
            ))),
            options,
        }
    }

    /// Loads `path` into a fresh store and publishes it.
    ///
    /// On failure the published snapshot is left untouched.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] that aborted the load.
    pub fn load(&self, path: &Path) -> Result<LoadSummary, LoadError> {
        let mut store = RecordStore::with_options(self.options.clone());
        let summary = store.load_path(path)?;
        self.current.store(Arc::new(store));
        info!(path = %path.display(), records = summary.records, "catalog published");
        Ok(summary)
    }

    /// Current store snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RecordStore<Pokemon>> {
        self.current.load_full()
    }

    /// Number of records in the current snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }
}

/// Logs a startup overview: total count, record #1, and the first few
/// records by identifier.
pub fn log_summary(store: &RecordStore<Pokemon>) {
    info!(count = store.len(), "loaded pokemon");

    if let Ok(first) = store.get_by_id(1) {
        info!(
            identifier = %first.identifier,
            height = first.height,
            weight = first.weight,
            "found pokemon #1"
        );
    }

    for pokemon in preview(store) {
        info!(
            id = pokemon.id,
            identifier = %pokemon.identifier,
            species_id = pokemon.species_id,
            "preview"
        );
    }
}

/// The lowest-numbered records, up to [`PREVIEW_COUNT`].
#[must_use]
pub fn preview(store: &RecordStore<Pokemon>) -> Vec<&Pokemon> {
    let mut all = store.list();
    all.sort_unstable_by_key(|p| p.id);
    all.truncate(PREVIEW_COUNT);
    all
}
