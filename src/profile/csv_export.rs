//! CSV mirror of the stored profile.
//!
//! One header row and one data row, rewritten in full after every merge so
//! the file always reflects the database.

use crate::core::FillResult;
use crate::profile::{Profile, STANDARD_FIELDS};
use std::path::Path;
use tracing::info;

/// Writes the profile as a single-row CSV at `path`, overwriting any
/// previous mirror.
pub fn write_profile_csv(profile: &Profile, path: &Path) -> FillResult<()> {
    let mut writer = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = STANDARD_FIELDS.to_vec();
    header.push("date");
    header.push("additional_fields");
    header.push("last_updated");
    writer.write_record(&header)?;

    let mut record: Vec<String> = STANDARD_FIELDS
        .iter()
        .map(|f| profile.biodata.standard_field(f).unwrap_or("").to_string())
        .collect();
    record.push(profile.date.clone());
    record.push(serde_json::to_string(&profile.biodata.additional_fields)?);
    record.push(profile.last_updated.clone());
    writer.write_record(&record)?;

    writer.flush()?;
    info!("profile mirrored to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Biodata;

    #[test]
    fn test_csv_mirror_round_trips_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.csv");

        let mut profile = Profile::default();
        profile.biodata.name = Some("John Smith".to_string());
        profile
            .biodata
            .additional_fields
            .insert("roll_no".to_string(), "A-17".to_string());
        profile.date = "29-08-2026".to_string();

        write_profile_csv(&profile, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), STANDARD_FIELDS.len() + 3);
        assert_eq!(&headers[0], "name");

        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], "John Smith");
        assert!(row[STANDARD_FIELDS.len() + 1].contains("roll_no"));
    }

    #[test]
    fn test_csv_overwrites_previous_mirror() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.csv");

        let first = Profile {
            biodata: Biodata {
                name: Some("Old".to_string()),
                ..Biodata::default()
            },
            ..Profile::default()
        };
        write_profile_csv(&first, &path).unwrap();

        let second = Profile {
            biodata: Biodata {
                name: Some("New".to_string()),
                ..Biodata::default()
            },
            ..Profile::default()
        };
        write_profile_csv(&second, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("New"));
        assert!(!content.contains("Old"));
        assert_eq!(content.lines().count(), 2);
    }
}
