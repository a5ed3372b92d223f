//! Flat-file record store.
//!
//! The whole outfit collection lives in one pretty-printed JSON array. Every
//! mutation is a full read-modify-write: callers `load`, change the vector,
//! and `save` it back. Saving goes through a temporary file in the same
//! directory followed by a rename, so readers never observe a half-written
//! document.
//!
//! The store itself does no locking. `AppState` serializes writers.

use crate::error::{AppError, Result};
use common::model::outfit::OutfitRecord;
use log::debug;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the full collection. A missing document is an empty collection.
    pub fn load(&self) -> Result<Vec<OutfitRecord>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(AppError::persistence(
                    format!("Failed to read {}", self.path.display()),
                    e,
                ))
            }
        };

        serde_json::from_slice(&bytes).map_err(|source| AppError::CorruptStore {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the document with `records`.
    pub fn save(&self, records: &[OutfitRecord]) -> Result<()> {
        let write_err =
            |e: std::io::Error| AppError::persistence(format!("Failed to write {}", self.path.display()), e);

        let json = serde_json::to_vec_pretty(records)
            .map_err(|e| write_err(std::io::Error::new(ErrorKind::InvalidData, e)))?;

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(write_err)?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(write_err)?;
        tmp.write_all(&json).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;

        debug!("Saved {} outfit records to {}", records.len(), self.path.display());
        Ok(())
    }

    /// Deletes the document. Succeeds when it is already gone.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::persistence(
                format!("Failed to remove {}", self.path.display()),
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str) -> OutfitRecord {
        OutfitRecord::uploaded(name, "01/01/2025, 10:00:00 AM")
    }

    #[test]
    fn load_without_document_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("outfits.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("outfits.json"));
        let mut records = vec![record("2_b.png"), record("1_a.png"), record("3_c.jpg")];
        records[0].apply_ranking(0.9, "Office", "Classic");

        store.save(&records).unwrap();
        assert_eq!(store.load().unwrap(), records);
    }

    #[test]
    fn save_overwrites_previous_document() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("outfits.json"));
        store.save(&[record("1_a.png"), record("2_b.png")]).unwrap();
        store.save(&[record("3_c.png")]).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].filename, "3_c.png");
    }

    #[test]
    fn document_is_indented_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("outfits.json"));
        store.save(&[record("1_a.png")]).unwrap();

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.starts_with("[\n  {\n    \"filename\": \"1_a.png\""));
    }

    #[test]
    fn unparsable_document_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("outfits.json");
        fs::write(&path, "{\"outfits\": 3}").unwrap();

        let err = RecordStore::new(&path).load().unwrap_err();
        assert!(matches!(err, AppError::CorruptStore { .. }));
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("outfits.json"));
        store.save(&[record("1_a.png")]).unwrap();

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(!store.path().exists());
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn save_reports_unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "x").unwrap();
        let store = RecordStore::new(blocker.join("outfits.json"));

        let err = store.save(&[record("1_a.png")]).unwrap_err();
        assert!(matches!(err, AppError::Persistence { .. }));
    }
}
