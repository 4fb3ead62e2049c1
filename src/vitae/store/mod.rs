//! # Storage Layer
//!
//! This module defines the storage abstraction for vitae. The [`DocumentStore`] trait
//! moves one whole [`Document`] in and out of persistence; it knows nothing about
//! categories, entries or validation.
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production storage in a single JSON file
//!   - Atomic writes (temp file in the same directory, fsync, rename)
//!   - Bounded retries for busy files, see [`retry`]
//!   - Corrupt files are copied aside and replaced with a default document
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Same locking semantics, so command tests exercise the same paths
//!
//! ## Locking
//!
//! Every store serializes `load`, `save` and `update` behind one exclusive lock.
//! [`DocumentStore::update`] holds that lock for its entire load → mutate → save
//! sequence, so two updates can never interleave. Callers that instead pair a
//! separate `load` with a later `save` can lose a concurrent writer's change.
//!
//! ## Storage Layout
//!
//! ```text
//! <dir>/
//! ├── resume_data.json                       # the document
//! ├── tmp_resume_XXXXXX.json                 # in-flight write, never left behind
//! └── corrupt_backup_20261018_093000_123.json # copy of an unreadable document
//! ```

use crate::error::Result;
use crate::model::Document;

pub mod fs;
pub mod memory;
pub mod retry;

pub trait DocumentStore: Send + Sync {
    /// Read the current document. Missing top-level keys come back as defaults.
    fn load(&self) -> Result<Document>;

    /// Replace the stored document.
    fn save(&self, doc: &Document) -> Result<()>;

    /// Load, apply `f`, and save, all under one lock acquisition.
    ///
    /// If `f` fails nothing is written and its error is returned.
    fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>;
}
