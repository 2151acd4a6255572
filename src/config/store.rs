//! Process-wide holder of the current configuration snapshot.
//!
//! Readers get an `Arc<ConfigDocument>` without taking a lock. A reload parses
//! the whole file and swaps the pointer in one step, so a reader never sees a
//! half-updated document.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use once_cell::sync::OnceCell;

use crate::config::loader::{config_path_from_env, load_document, save_document, ConfigError};
use crate::config::schema::ConfigDocument;

static INSTANCE: OnceCell<ConfigStore> = OnceCell::new();

/// Cached configuration backed by a single YAML file.
pub struct ConfigStore {
    path: PathBuf,
    current: ArcSwapOption<ConfigDocument>,
    generation: AtomicU64,
}

impl ConfigStore {
    /// Create a store for `path` and perform the initial load.
    ///
    /// A failed initial load is logged and leaves the store empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let store = Self {
            path: path.into(),
            current: ArcSwapOption::empty(),
            generation: AtomicU64::new(0),
        };
        let _ = store.load();
        store
    }

    /// Create a store for the path named by `NASTOOL_CONFIG`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self::open(config_path_from_env()?))
    }

    /// The process-wide store, built from the environment on first use.
    ///
    /// Concurrent first callers block until the single initializer finishes.
    /// If the environment does not name a path the error is returned and a
    /// later call tries again.
    pub fn get_instance() -> Result<&'static ConfigStore, ConfigError> {
        INSTANCE.get_or_try_init(Self::from_env)
    }

    /// Re-read the backing file and replace the cached snapshot.
    ///
    /// On failure the previous snapshot is kept.
    pub fn load(&self) -> Result<Arc<ConfigDocument>, ConfigError> {
        match load_document(&self.path) {
            Ok(doc) => {
                let doc = Arc::new(doc);
                self.current.store(Some(Arc::clone(&doc)));
                let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
                tracing::debug!(path = ?self.path, generation, "Configuration loaded");
                Ok(doc)
            }
            Err(e) => {
                tracing::error!(
                    path = ?self.path,
                    error = %e,
                    keeping_previous = self.current.load().is_some(),
                    "Failed to read configuration file"
                );
                Err(e)
            }
        }
    }

    /// [`load`](Self::load) reduced to success or failure.
    pub fn reload(&self) -> bool {
        self.load().is_ok()
    }

    /// Current snapshot, or `None` if nothing has loaded successfully yet.
    pub fn get_config(&self) -> Option<Arc<ConfigDocument>> {
        self.current.load_full()
    }

    /// Write `doc` to the backing file. The cached snapshot is not changed.
    pub fn save(&self, doc: &ConfigDocument) -> Result<(), ConfigError> {
        save_document(&self.path, doc)?;
        tracing::info!(path = ?self.path, "Configuration saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of successful loads so far.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for ConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigStore")
            .field("path", &self.path)
            .field("generation", &self.generation())
            .field("loaded", &self.current.load().is_some())
            .finish()
    }
}
