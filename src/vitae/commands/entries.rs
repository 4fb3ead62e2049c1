use super::{CmdMessage, CmdResult, DisplayEntry};
use crate::error::{Rejection, Result};
use crate::model::Entry;
use crate::store::DocumentStore;
use chrono::{Local, NaiveDate};
use serde::Deserialize;

/// Input for [`add`]. Everything is trimmed before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewEntry {
    pub category: String,
    pub name: String,
    /// Blank links are stored as absent.
    pub link: Option<String>,
    /// Blank dates become today. Anything else is stored as given, unparsed.
    pub date: Option<String>,
}

impl NewEntry {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }
}

/// Appends an entry to an existing category. Categories are never created here.
pub fn add<S: DocumentStore>(store: &S, new: NewEntry) -> Result<CmdResult> {
    let category = new.category.trim().to_string();
    if category.is_empty() {
        return Err(Rejection::EmptyCategoryName.into());
    }

    let name = new.name.trim().to_string();
    let link = new
        .link
        .as_deref()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string);
    let date = match new.date.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => d.to_string(),
        _ => Local::now().date_naive().format("%Y-%m-%d").to_string(),
    };

    let (index, entry) = store.update(|doc| {
        let list = doc
            .categories
            .get_mut(&category)
            .ok_or_else(|| Rejection::UnknownCategory(category.clone()))?;
        if name.is_empty() {
            return Err(Rejection::EmptyEntryName.into());
        }
        let entry = Entry::new(name, link, date);
        list.push(entry.clone());
        Ok((list.len() - 1, entry))
    })?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Entry added to {}: {}",
        category, entry.name
    )));
    if NaiveDate::parse_from_str(&entry.date, "%Y-%m-%d").is_err() {
        result.add_message(CmdMessage::warning(format!(
            "Date '{}' is not YYYY-MM-DD; stored as written",
            entry.date
        )));
    }
    result.affected_entries.push(DisplayEntry {
        category,
        index,
        entry,
    });
    Ok(result)
}

/// Removes the entry at zero-based `index`; later entries shift down by one.
pub fn delete<S: DocumentStore>(store: &S, category: &str, index: usize) -> Result<CmdResult> {
    let category = category.trim().to_string();
    let entry = store.update(|doc| {
        let list = doc
            .categories
            .get_mut(&category)
            .ok_or_else(|| Rejection::UnknownCategory(category.clone()))?;
        if index >= list.len() {
            return Err(Rejection::IndexOutOfRange {
                category: category.clone(),
                index,
                len: list.len(),
            }
            .into());
        }
        Ok(list.remove(index))
    })?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Entry deleted from {}: {}",
        category, entry.name
    )));
    result.affected_entries.push(DisplayEntry {
        category,
        index,
        entry,
    });
    Ok(result)
}
