//! # Command Layer
//!
//! This module contains the **document service**: every validated operation on the
//! profile, categories, entries and settings lives in one of its submodules.
//!
//! ## Shape of a Command
//!
//! Every write is a single [`DocumentStore::update`] call:
//!
//! 1. normalize the input (trim, default dates, blank links become `None`)
//! 2. validate against the loaded document
//! 3. mutate the in-memory copy, which the store then saves
//!
//! A validation failure returns [`VitaeError::Rejected`] from inside the closure, so
//! no partial mutation is ever written. Storage failures come back as the other
//! [`VitaeError`] variants, which lets callers tell bad input from an unavailable
//! store.
//!
//! Reads return domain types directly; writes return a [`CmdResult`] with the
//! affected entries and user-facing messages.
//!
//! ## Entry Indexes
//!
//! Entries are addressed by their zero-based position in a category. Positions are
//! resolved against the document loaded inside the same update, but they are not
//! stable identities: after any mutation callers must re-read before deleting by
//! index again.
//!
//! ## Testing Strategy
//!
//! Command tests use `InMemoryStore` and cover every validation branch.
//!
//! ## Command Modules
//!
//! - [`profile`]: Read and replace the personal details
//! - [`categories`]: Create, delete and list categories
//! - [`entries`]: Add and delete entries
//! - [`settings`]: Read and partially update display settings
//!
//! [`DocumentStore::update`]: crate::store::DocumentStore::update
//! [`VitaeError`]: crate::error::VitaeError
//! [`VitaeError::Rejected`]: crate::error::VitaeError::Rejected

use crate::model::Entry;
use serde::Serialize;

pub mod categories;
pub mod entries;
pub mod profile;
pub mod settings;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
}

#[derive(Debug, Clone, Serialize)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }
}

/// An entry together with where it sits (or sat) in the document.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DisplayEntry {
    pub category: String,
    pub index: usize,
    pub entry: Entry,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CmdResult {
    pub affected_entries: Vec<DisplayEntry>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_message(mut self, message: CmdMessage) -> Self {
        self.add_message(message);
        self
    }
}

/// Trim, mapping `None` to the empty string.
pub(crate) fn clean(value: Option<&str>) -> String {
    value.unwrap_or_default().trim().to_string()
}
