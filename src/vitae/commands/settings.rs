use super::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::settings::{Settings, SettingsUpdate};
use crate::store::DocumentStore;

pub fn get<S: DocumentStore>(store: &S) -> Result<Settings> {
    Ok(store.load()?.settings)
}

/// Applies a partial update and returns the settings as stored.
pub fn set<S: DocumentStore>(store: &S, update: &SettingsUpdate) -> Result<(Settings, CmdResult)> {
    let settings = store.update(|doc| {
        doc.settings = update.apply(doc.settings);
        Ok(doc.settings)
    })?;
    Ok((
        settings,
        CmdResult::default().with_message(CmdMessage::success("Settings saved.")),
    ))
}
