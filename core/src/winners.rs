//! Winner records and the JSON winners file
//!
//! The file is a pretty-printed JSON array, rewritten wholesale on every save.
//! Older files may hold plain display strings or spreadsheet-style records
//! instead of full records; all three forms are read back. Elements in none of
//! these shapes are skipped.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::roster::Participant;
use crate::store::StoreError;

/// A participant at the moment they won
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinnerRecord {
    #[serde(flatten)]
    pub participant: Participant,
    pub timestamp: DateTime<Local>,
}

impl WinnerRecord {
    pub fn new(participant: Participant, timestamp: DateTime<Local>) -> Self {
        Self {
            participant,
            timestamp,
        }
    }

    pub fn now(participant: Participant) -> Self {
        Self::new(participant, Local::now())
    }
}

/// Record from the spreadsheet-era winners file: column-named keys, no
/// timestamp, plus whatever other columns the roster carried.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedRecord {
    #[serde(rename = "STT")]
    pub id: serde_json::Number,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Group", default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(rename = "Department", default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Local>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ImportedRecord {
    fn display_text(&self) -> String {
        let mut text = self.name.clone();
        let parts: Vec<&str> = [&self.group, &self.department]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();
        if !parts.is_empty() {
            text.push('\n');
            text.push_str(&parts.join(" - "));
        }
        text
    }
}

/// One element of the winners file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WinnerEntry {
    Record(WinnerRecord),
    Imported(ImportedRecord),
    /// Display string written by older versions
    Legacy(String),
}

impl WinnerEntry {
    /// Line shown in the winners list
    pub fn list_line(&self) -> String {
        match self {
            WinnerEntry::Record(record) => format!(
                "🏆 {} - {}",
                record.timestamp.format("%Y-%m-%d %H:%M"),
                record.participant.display_text()
            ),
            WinnerEntry::Imported(record) => match record.timestamp {
                Some(timestamp) => format!(
                    "🏆 {} - {}",
                    timestamp.format("%Y-%m-%d %H:%M"),
                    record.display_text()
                ),
                None => format!("🏆 {}", record.display_text()),
            },
            WinnerEntry::Legacy(text) => format!("🏆 {}", text),
        }
    }
}

impl From<WinnerRecord> for WinnerEntry {
    fn from(record: WinnerRecord) -> Self {
        WinnerEntry::Record(record)
    }
}

/// Location of the winners file
#[derive(Debug, Clone)]
pub struct WinnersFile {
    path: PathBuf,
}

impl WinnersFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read previous winners. Missing or corrupt files read as empty.
    pub fn load(&self) -> Vec<WinnerEntry> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Could not read winners file");
                return Vec::new();
            }
        };

        if contents.trim().is_empty() {
            return Vec::new();
        }

        let elements: Vec<serde_json::Value> = match serde_json::from_str(&contents) {
            Ok(elements) => elements,
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Could not parse winners file, treating it as empty"
                );
                return Vec::new();
            }
        };

        // One unreadable element must not cost the rest of the history
        elements
            .into_iter()
            .enumerate()
            .filter_map(|(idx, element)| match serde_json::from_value(element) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        index = idx,
                        error = %e,
                        "Skipping unrecognised winners entry"
                    );
                    None
                }
            })
            .collect()
    }

    pub fn save(&self, entries: &[WinnerEntry]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(entries).map_err(StoreError::EncodeWinners)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::WriteWinners {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, json).map_err(|source| StoreError::WriteWinners {
            path: self.path.clone(),
            source,
        })
    }

    /// Reset to an empty array
    pub fn clear(&self) -> Result<(), StoreError> {
        self.save(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::scratch_dir;

    fn alice() -> Participant {
        Participant::new(1, "Alice")
            .with_group("G1")
            .with_department("Sales")
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = scratch_dir("winners_round_trip");
        let file = WinnersFile::new(dir.join("winners.json"));

        let entries = vec![
            WinnerEntry::Record(WinnerRecord::now(alice())),
            WinnerEntry::Record(WinnerRecord::now(Participant::new(2, "Bob"))),
        ];
        file.save(&entries).unwrap();

        assert_eq!(file.load(), entries);
    }

    #[test]
    fn test_file_is_indented_with_flat_records() {
        let dir = scratch_dir("winners_indented");
        let file = WinnersFile::new(dir.join("winners.json"));
        file.save(&[WinnerRecord::now(alice()).into()]).unwrap();

        let raw = std::fs::read_to_string(file.path()).unwrap();
        assert!(raw.contains("\n  "), "expected pretty-printed json: {raw}");

        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let first = &value[0];
        assert_eq!(first["id"], 1);
        assert_eq!(first["name"], "Alice");
        assert!(first["timestamp"].is_string());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = scratch_dir("winners_clear_twice");
        let file = WinnersFile::new(dir.join("winners.json"));
        file.save(&[WinnerRecord::now(alice()).into()]).unwrap();

        file.clear().unwrap();
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "[]");
        assert!(file.load().is_empty());

        file.clear().unwrap();
        assert_eq!(std::fs::read_to_string(file.path()).unwrap(), "[]");
        assert!(file.load().is_empty());
    }

    #[test]
    fn test_missing_and_corrupt_files_read_as_empty() {
        let dir = scratch_dir("winners_corrupt");
        let file = WinnersFile::new(dir.join("winners.json"));
        assert!(file.load().is_empty());

        std::fs::write(file.path(), "{ not json").unwrap();
        assert!(file.load().is_empty());

        std::fs::write(file.path(), "").unwrap();
        assert!(file.load().is_empty());
    }

    #[test]
    fn test_legacy_strings_are_accepted() {
        let dir = scratch_dir("winners_legacy");
        let file = WinnersFile::new(dir.join("winners.json"));
        std::fs::write(
            file.path(),
            r#"["2024-01-05 10:00 - Alice", {"id": 2, "name": "Bob", "timestamp": "2024-01-05T10:05:00+07:00"}]"#,
        )
        .unwrap();

        let entries = file.load();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].list_line(), "🏆 2024-01-05 10:00 - Alice");
        match &entries[1] {
            WinnerEntry::Record(record) => assert_eq!(record.participant.name, "Bob"),
            other => panic!("expected record, got {other:?}"),
        }
    }

    #[test]
    fn test_spreadsheet_records_are_read_and_kept() {
        let dir = scratch_dir("winners_spreadsheet_records");
        let file = WinnersFile::new(dir.join("winners.json"));
        std::fs::write(
            file.path(),
            r#"[{"STT": 1, "Name": "An", "Group": "G1", "Department": "D", "Seat": "A4"}, "2024-01-01 - Old"]"#,
        )
        .unwrap();

        let entries = file.load();
        assert_eq!(entries.len(), 2);
        let WinnerEntry::Imported(record) = &entries[0] else {
            panic!("expected spreadsheet record, got {:?}", entries[0]);
        };
        assert_eq!(record.name, "An");
        assert_eq!(record.extra["Seat"], "A4");
        assert_eq!(entries[0].list_line(), "🏆 An\nG1 - D");
        assert_eq!(entries[1], WinnerEntry::Legacy("2024-01-01 - Old".into()));

        // Written back unchanged in shape
        file.save(&entries).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        assert_eq!(value[0]["STT"], 1);
        assert_eq!(value[0]["Seat"], "A4");
        assert_eq!(file.load(), entries);
    }

    #[test]
    fn test_unknown_elements_are_skipped_individually() {
        let dir = scratch_dir("winners_unknown_element");
        let file = WinnersFile::new(dir.join("winners.json"));
        std::fs::write(file.path(), r#"[42, {"Name": "No id"}, "kept"]"#).unwrap();

        assert_eq!(file.load(), vec![WinnerEntry::Legacy("kept".into())]);
    }

    #[test]
    fn test_list_line_uses_display_text() {
        let timestamp = DateTime::parse_from_rfc3339("2024-03-01T09:30:00+00:00")
            .unwrap()
            .with_timezone(&Local);
        let entry = WinnerEntry::Record(WinnerRecord::new(alice(), timestamp));
        let expected = format!(
            "🏆 {} - Alice\nG1 - Sales",
            timestamp.format("%Y-%m-%d %H:%M")
        );
        assert_eq!(entry.list_line(), expected);
    }
}
