//! # Document Model
//!
//! The whole persisted state is one [`Document`]:
//!
//! ```text
//! Document
//! ├── profile      (stored as "personal_details")
//! ├── categories   name → [Entry, ...], in insertion order
//! └── settings     { columns, separator }
//! ```
//!
//! Deserialization fills gaps instead of failing. A missing or `null` top-level key
//! gets its default, and a scalar field of the wrong type (a number where a name
//! was expected, a timestamp that does not parse) is coerced or left empty. Only a
//! wrong structure is a parse error, which the file store treats as corruption:
//! a document, profile or entry that is not an object, `categories` that is not a
//! map, or a category that is not a list.

use crate::settings::Settings;
use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    #[serde(
        rename = "personal_details",
        alias = "profile",
        deserialize_with = "null_as_default"
    )]
    pub profile: Profile,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Categories,
    #[serde(deserialize_with = "null_as_default")]
    pub settings: Settings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub email: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(
        rename = "dob",
        alias = "date_of_birth",
        deserialize_with = "lenient_string"
    )]
    pub date_of_birth: String,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_date"
    )]
    pub updated_at: Option<NaiveDate>,
}

impl Profile {
    /// True when no free-text field carries anything.
    pub fn is_blank(&self) -> bool {
        [
            &self.name,
            &self.email,
            &self.phone,
            &self.address,
            &self.date_of_birth,
            &self.summary,
        ]
        .iter()
        .all(|s| s.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    /// Absent for entries written by hand or by tools that did not stamp them.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_datetime"
    )]
    pub created_at: Option<NaiveDateTime>,
}

impl Entry {
    /// A new entry stamped with the current local time, whole seconds.
    pub fn new(name: String, link: Option<String>, date: String) -> Self {
        Self {
            name,
            link,
            date,
            created_at: Some(Local::now().naive_local().trunc_subsecs(0)),
        }
    }
}

/// Named categories of entries, kept in the order they were created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Categories(Vec<(String, Vec<Entry>)>);

impl Categories {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Vec<Entry>> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Vec<Entry>> {
        self.0.iter_mut().find(|(n, _)| n == name).map(|(_, e)| e)
    }

    /// Insert or replace. A replaced category keeps its position.
    pub fn insert(&mut self, name: String, entries: Vec<Entry>) {
        match self.position(&name) {
            Some(i) => self.0[i].1 = entries,
            None => self.0.push((name, entries)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Vec<Entry>> {
        self.position(name).map(|i| self.0.remove(i).1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Entry])> {
        self.0.iter().map(|(n, e)| (n.as_str(), e.as_slice()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|(n, _)| n == name)
    }
}

impl Serialize for Categories {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entries) in &self.0 {
            map.serialize_entry(name, entries)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Categories {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CategoriesVisitor;

        impl<'de> Visitor<'de> for CategoriesVisitor {
            type Value = Categories;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category names to entry lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Categories, A::Error> {
                let mut categories = Categories::new();
                while let Some((name, entries)) = access.next_entry::<String, Vec<Entry>>()? {
                    categories.insert(name, entries);
                }
                Ok(categories)
            }
        }

        deserializer.deserialize_map(CategoriesVisitor)
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Scalars become their text form; null, arrays and objects become empty.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn lenient_opt_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn lenient_date<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
    let text = scalar_text(Value::deserialize(deserializer)?);
    Ok(text.and_then(|s| {
        let date_part = s.split('T').next().unwrap_or_default().trim();
        NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
    }))
}

fn lenient_datetime<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDateTime>, D::Error> {
    let text = scalar_text(Value::deserialize(deserializer)?);
    Ok(text.and_then(|s| {
        let s = s.trim();
        s.parse::<NaiveDateTime>()
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
            .ok()
    }))
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}
