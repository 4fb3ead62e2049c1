use super::{CmdMessage, CmdResult};
use crate::error::{Rejection, Result};
use crate::model::Entry;
use crate::store::DocumentStore;

pub fn add<S: DocumentStore>(store: &S, name: &str) -> Result<CmdResult> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Rejection::EmptyCategoryName.into());
    }

    store.update(|doc| {
        if doc.categories.contains(name) {
            return Err(Rejection::DuplicateCategory(name.to_string()).into());
        }
        doc.categories.insert(name.to_string(), Vec::new());
        Ok(())
    })?;

    Ok(CmdResult::default().with_message(CmdMessage::success(format!(
        "Category created: {}",
        name
    ))))
}

/// Removes the category and every entry in it. `name` must match the stored key
/// exactly; it is not trimmed.
pub fn delete<S: DocumentStore>(store: &S, name: &str) -> Result<CmdResult> {
    let removed = store.update(|doc| {
        doc.categories
            .remove(name)
            .ok_or_else(|| Rejection::UnknownCategory(name.to_string()).into())
    })?;

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Category deleted: {}", name)));
    if !removed.is_empty() {
        result.add_message(CmdMessage::info(format!(
            "Removed {} {}",
            removed.len(),
            if removed.len() == 1 { "entry" } else { "entries" }
        )));
    }
    Ok(result)
}

pub fn list<S: DocumentStore>(store: &S) -> Result<Vec<String>> {
    let doc = store.load()?;
    Ok(doc.categories.names().map(str::to_string).collect())
}

pub fn entries<S: DocumentStore>(store: &S, name: &str) -> Result<Vec<Entry>> {
    let name = name.trim();
    let doc = store.load()?;
    doc.categories
        .get(name)
        .cloned()
        .ok_or_else(|| Rejection::UnknownCategory(name.to_string()).into())
}
