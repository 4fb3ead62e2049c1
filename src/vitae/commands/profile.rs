use super::{clean, CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::Profile;
use crate::store::DocumentStore;
use chrono::Local;
use serde::Deserialize;

/// Submitted personal details. The stored profile is replaced wholesale, so a field
/// left as `None` is stored empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(alias = "dob")]
    pub date_of_birth: Option<String>,
    pub summary: Option<String>,
}

pub fn set<S: DocumentStore>(store: &S, update: ProfileUpdate) -> Result<CmdResult> {
    let profile = Profile {
        name: clean(update.name.as_deref()),
        email: clean(update.email.as_deref()),
        phone: clean(update.phone.as_deref()),
        address: clean(update.address.as_deref()),
        date_of_birth: clean(update.date_of_birth.as_deref()),
        summary: clean(update.summary.as_deref()),
        updated_at: Some(Local::now().date_naive()),
    };

    store.update(|doc| {
        doc.profile = profile;
        Ok(())
    })?;

    Ok(CmdResult::default().with_message(CmdMessage::success("Personal details saved.")))
}

pub fn get<S: DocumentStore>(store: &S) -> Result<Profile> {
    Ok(store.load()?.profile)
}
