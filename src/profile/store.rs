//! Persisted biodata profile.
//!
//! One SQLite database holds a single-row `user_profile` table (row id 1),
//! created and seeded on open. Updates are merge-only: a new value is
//! written only when it is non-empty and differs from what is stored, and
//! `additional_fields` keys are added but never overwritten. The fill pass
//! consumes the profile as an immutable field-to-value map.

use crate::core::{FillResult, FormFillError};
use rusqlite::{Connection, OptionalExtension, params, params_from_iter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

/// The fixed biodata columns updated field-by-field during merges.
pub const STANDARD_FIELDS: [&str; 12] = [
    "name",
    "first_name",
    "last_name",
    "mobile_no",
    "email_id",
    "date_of_birth",
    "address",
    "designation",
    "company",
    "experience",
    "age",
    "gender",
];

/// A freshly extracted biodata record, before merging into the store.
///
/// All fields are optional; `None` and empty strings mean "nothing
/// extracted" and never erase stored data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Biodata {
    pub name: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub mobile_no: Option<String>,
    pub email_id: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub designation: Option<String>,
    pub company: Option<String>,
    pub experience: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    /// Free-form extras (roll numbers, exam centers, ...).
    #[serde(default)]
    pub additional_fields: BTreeMap<String, String>,
}

impl Biodata {
    /// Returns the standard field with the given name.
    pub fn standard_field(&self, name: &str) -> Option<&str> {
        let value = match name {
            "name" => &self.name,
            "first_name" => &self.first_name,
            "last_name" => &self.last_name,
            "mobile_no" => &self.mobile_no,
            "email_id" => &self.email_id,
            "date_of_birth" => &self.date_of_birth,
            "address" => &self.address,
            "designation" => &self.designation,
            "company" => &self.company,
            "experience" => &self.experience,
            "age" => &self.age,
            "gender" => &self.gender,
            _ => &None,
        };
        value.as_deref()
    }

    /// Returns true when no field carries a usable value.
    pub fn is_empty(&self) -> bool {
        STANDARD_FIELDS
            .iter()
            .all(|f| self.standard_field(f).map_or(true, |v| v.trim().is_empty()))
            && self.additional_fields.values().all(|v| v.trim().is_empty())
    }
}

/// The stored profile: one row of biodata plus bookkeeping columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// The biodata columns.
    pub biodata: Biodata,
    /// The default fill-in date (today at seeding time, DD-MM-YYYY).
    pub date: String,
    /// RFC 3339 timestamp of the last merge that changed anything.
    pub last_updated: String,
}

impl Profile {
    /// Flattens the profile into the immutable field-to-value mapping the
    /// fill pass consumes. Empty fields are omitted.
    pub fn to_field_map(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        for field in STANDARD_FIELDS {
            if let Some(value) = self.biodata.standard_field(field) {
                if !value.trim().is_empty() {
                    map.insert(field.to_string(), value.to_string());
                }
            }
        }
        if !self.date.trim().is_empty() {
            map.insert("date".to_string(), self.date.clone());
        }
        for (key, value) in &self.biodata.additional_fields {
            if !value.trim().is_empty() {
                map.insert(key.clone(), value.clone());
            }
        }
        map
    }
}

/// SQLite-backed single-row profile store.
pub struct ProfileStore {
    conn: Connection,
}

impl ProfileStore {
    /// Opens (creating and seeding if necessary) a profile database file.
    pub fn open(path: &Path) -> FillResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Opens an in-memory store (tests, dry runs).
    pub fn open_in_memory() -> FillResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    fn init(&self) -> FillResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS user_profile (
                id INTEGER PRIMARY KEY,
                name TEXT,
                first_name TEXT,
                last_name TEXT,
                mobile_no TEXT,
                email_id TEXT,
                date_of_birth TEXT,
                address TEXT,
                designation TEXT,
                company TEXT,
                experience TEXT,
                age TEXT,
                gender TEXT,
                date TEXT,
                additional_fields TEXT,
                last_updated TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;

        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM user_profile", [], |row| row.get(0))?;
        if count == 0 {
            let today = chrono::Local::now().format("%d-%m-%Y").to_string();
            self.conn.execute(
                "INSERT INTO user_profile (id, date, additional_fields, last_updated)
                 VALUES (1, ?1, '{}', ?2)",
                params![today, chrono::Local::now().to_rfc3339()],
            )?;
            info!("seeded new profile row dated {}", today);
        }
        Ok(())
    }

    /// Loads the stored profile.
    pub fn load(&self) -> FillResult<Profile> {
        let row = self
            .conn
            .query_row(
                "SELECT name, first_name, last_name, mobile_no, email_id, date_of_birth,
                        address, designation, company, experience, age, gender,
                        date, additional_fields, last_updated
                 FROM user_profile WHERE id = 1",
                [],
                |row| {
                    let mut values: Vec<Option<String>> = Vec::with_capacity(12);
                    for i in 0..12 {
                        values.push(row.get(i)?);
                    }
                    let date: Option<String> = row.get(12)?;
                    let additional: Option<String> = row.get(13)?;
                    let last_updated: Option<String> = row.get(14)?;
                    Ok((values, date, additional, last_updated))
                },
            )
            .optional()?;

        let Some((values, date, additional, last_updated)) = row else {
            return Err(FormFillError::Storage(rusqlite::Error::QueryReturnedNoRows));
        };

        let mut biodata = Biodata::default();
        let mut iter = values.into_iter();
        biodata.name = iter.next().flatten();
        biodata.first_name = iter.next().flatten();
        biodata.last_name = iter.next().flatten();
        biodata.mobile_no = iter.next().flatten();
        biodata.email_id = iter.next().flatten();
        biodata.date_of_birth = iter.next().flatten();
        biodata.address = iter.next().flatten();
        biodata.designation = iter.next().flatten();
        biodata.company = iter.next().flatten();
        biodata.experience = iter.next().flatten();
        biodata.age = iter.next().flatten();
        biodata.gender = iter.next().flatten();
        biodata.additional_fields =
            serde_json::from_str(additional.as_deref().unwrap_or("{}")).unwrap_or_default();

        Ok(Profile {
            biodata,
            date: date.unwrap_or_default(),
            last_updated: last_updated.unwrap_or_default(),
        })
    }

    /// Merges freshly extracted biodata into the stored profile.
    ///
    /// A standard field is written only when the new value is non-empty and
    /// differs from the stored one. Additional fields are added only for
    /// keys that are missing or empty. Returns whether anything changed.
    pub fn merge_update(&mut self, new: &Biodata) -> FillResult<bool> {
        if new.is_empty() {
            debug!("no biodata to merge");
            return Ok(false);
        }

        let current = self.load()?;
        let mut set_clauses: Vec<String> = Vec::new();
        let mut values: Vec<String> = Vec::new();

        for field in STANDARD_FIELDS {
            let Some(new_value) = new.standard_field(field) else {
                continue;
            };
            let new_value = new_value.trim();
            if new_value.is_empty() {
                continue;
            }
            let current_value = current.biodata.standard_field(field).unwrap_or("").trim();
            if new_value != current_value {
                set_clauses.push(format!("{} = ?{}", field, values.len() + 1));
                values.push(new_value.to_string());
                debug!("will update {}: '{}' -> '{}'", field, current_value, new_value);
            }
        }

        let mut merged_additional = current.biodata.additional_fields.clone();
        let mut additional_changed = false;
        for (key, value) in &new.additional_fields {
            if value.trim().is_empty() {
                continue;
            }
            let existing_blank = merged_additional
                .get(key)
                .map_or(true, |v| v.trim().is_empty());
            if existing_blank {
                merged_additional.insert(key.clone(), value.clone());
                additional_changed = true;
                debug!("will add additional_fields.{} = '{}'", key, value);
            }
        }
        if additional_changed {
            set_clauses.push(format!("additional_fields = ?{}", values.len() + 1));
            values.push(serde_json::to_string(&merged_additional)?);
        }

        if set_clauses.is_empty() {
            debug!("nothing new to merge");
            return Ok(false);
        }

        set_clauses.push(format!("last_updated = ?{}", values.len() + 1));
        values.push(chrono::Local::now().to_rfc3339());

        let sql = format!(
            "UPDATE user_profile SET {} WHERE id = 1",
            set_clauses.join(", ")
        );
        self.conn.execute(&sql, params_from_iter(values))?;
        info!("profile updated ({} columns)", set_clauses.len());
        Ok(true)
    }
}
