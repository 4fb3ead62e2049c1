//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single entry
//! point for every client: the bundled CLI, a web handler, or a renderer that only
//! reads.
//!
//! The facade dispatches to `commands/*.rs` and returns their structured results. It
//! holds no logic of its own and never touches stdout or stderr.
//!
//! ## Generic Over DocumentStore
//!
//! `VitaeApi<S: DocumentStore>` is generic over the storage backend:
//! - Production: `VitaeApi<FileStore>`
//! - Testing: `VitaeApi<InMemoryStore>`
//!
//! All methods take `&self`; the store serializes access internally, so one API value
//! can be shared across worker threads behind an `Arc`.

use crate::commands::entries::NewEntry;
use crate::commands::profile::ProfileUpdate;
use crate::commands::{self, CmdResult};
use crate::error::Result;
use crate::model::{Document, Entry, Profile};
use crate::settings::{Settings, SettingsUpdate};
use crate::store::DocumentStore;

pub struct VitaeApi<S: DocumentStore> {
    store: S,
}

impl<S: DocumentStore> VitaeApi<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot of the whole document, for read-only consumers such as renderers.
    pub fn document(&self) -> Result<Document> {
        self.store.load()
    }

    pub fn get_profile(&self) -> Result<Profile> {
        commands::profile::get(&self.store)
    }

    pub fn set_profile(&self, update: ProfileUpdate) -> Result<CmdResult> {
        commands::profile::set(&self.store, update)
    }

    pub fn list_categories(&self) -> Result<Vec<String>> {
        commands::categories::list(&self.store)
    }

    pub fn entries(&self, category: &str) -> Result<Vec<Entry>> {
        commands::categories::entries(&self.store, category)
    }

    pub fn add_category(&self, name: &str) -> Result<CmdResult> {
        commands::categories::add(&self.store, name)
    }

    pub fn delete_category(&self, name: &str) -> Result<CmdResult> {
        commands::categories::delete(&self.store, name)
    }

    pub fn add_entry(&self, entry: NewEntry) -> Result<CmdResult> {
        commands::entries::add(&self.store, entry)
    }

    pub fn delete_entry(&self, category: &str, index: usize) -> Result<CmdResult> {
        commands::entries::delete(&self.store, category, index)
    }

    pub fn get_settings(&self) -> Result<Settings> {
        commands::settings::get(&self.store)
    }

    pub fn set_settings(&self, update: &SettingsUpdate) -> Result<(Settings, CmdResult)> {
        commands::settings::set(&self.store, update)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Columns;
    use crate::store::memory::InMemoryStore;

    fn api() -> VitaeApi<InMemoryStore> {
        VitaeApi::new(InMemoryStore::new())
    }

    #[test]
    fn dispatches_category_and_entry_calls() {
        let api = api();
        api.add_category("Work").unwrap();
        let result = api.add_entry(NewEntry::new("Work", "Engine")).unwrap();
        assert_eq!(result.affected_entries[0].category, "Work");

        assert_eq!(api.list_categories().unwrap(), vec!["Work"]);
        assert_eq!(api.entries("Work").unwrap().len(), 1);

        api.delete_entry("Work", 0).unwrap();
        assert!(api.entries("Work").unwrap().is_empty());

        api.delete_category("Work").unwrap();
        assert!(api.document().unwrap().categories.is_empty());
    }

    #[test]
    fn dispatches_profile_and_settings_calls() {
        let api = api();
        api.set_profile(ProfileUpdate {
            name: Some("Ada".into()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(api.get_profile().unwrap().name, "Ada");

        let (stored, _) = api
            .set_settings(&SettingsUpdate::default().columns(1))
            .unwrap();
        assert_eq!(stored.columns, Columns::One);
        assert_eq!(api.get_settings().unwrap(), stored);
    }

    #[test]
    fn rejections_surface_unchanged() {
        let api = api();
        assert!(api.add_category("").unwrap_err().is_rejection());
        assert!(api.delete_entry("Work", 0).unwrap_err().is_rejection());
    }
}
