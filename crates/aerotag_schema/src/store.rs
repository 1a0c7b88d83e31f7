//! Directory-backed schema store.
//!
//! One JSON document per version, named `community_submission.v{N}.schema.json`
//! inside an explicitly configured schema directory. Persisting is
//! create-only: a published version is never overwritten, so two generation
//! runs racing to publish the same version number cannot both succeed.

use crate::document::SchemaDocument;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const FILE_PREFIX: &str = "community_submission.v";
const FILE_SUFFIX: &str = ".schema.json";

/// Errors from schema store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no schema versions found in {dir}")]
    NoVersions { dir: PathBuf },

    #[error("schema v{version} not found at {path}")]
    NotFound { version: u32, path: PathBuf },

    #[error("schema v{version} already exists at {path}")]
    Conflict { version: u32, path: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Version-keyed storage for schema documents.
///
/// The schema directory is passed in explicitly so tests can point the
/// store at a temporary directory.
pub struct SchemaStore {
    dir: PathBuf,
}

impl SchemaStore {
    /// Create a store over the given schema directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this store reads and writes.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// On-disk path of the document for `version`.
    pub fn schema_path(&self, version: u32) -> PathBuf {
        self.dir.join(format!("{FILE_PREFIX}{version}{FILE_SUFFIX}"))
    }

    /// Greatest version number among the persisted documents.
    pub fn latest_version(&self) -> Result<u32, StoreError> {
        let entries = fs::read_dir(&self.dir).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                StoreError::NoVersions {
                    dir: self.dir.clone(),
                }
            } else {
                StoreError::Io(err)
            }
        })?;

        let mut latest: Option<u32> = None;
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else { continue };
            let Some(version) = parse_version(name) else {
                continue;
            };
            latest = Some(latest.map_or(version, |v| v.max(version)));
        }

        latest.ok_or_else(|| StoreError::NoVersions {
            dir: self.dir.clone(),
        })
    }

    /// Load the document for `version`.
    pub fn load(&self, version: u32) -> Result<SchemaDocument, StoreError> {
        let path = self.schema_path(version);
        let text = fs::read_to_string(&path).map_err(|err| {
            if err.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound {
                    version,
                    path: path.clone(),
                }
            } else {
                StoreError::Io(err)
            }
        })?;
        Ok(SchemaDocument::from_value(serde_json::from_str(&text)?))
    }

    /// Load the latest persisted document.
    pub fn load_latest(&self) -> Result<SchemaDocument, StoreError> {
        self.load(self.latest_version()?)
    }

    /// Write a new immutable document for `version`.
    ///
    /// Create-only: fails with [`StoreError::Conflict`] if the version is
    /// already published, leaving the existing bytes untouched. Returns the
    /// path of the new document.
    pub fn persist(&self, document: &SchemaDocument, version: u32) -> Result<PathBuf, StoreError> {
        let path = self.schema_path(version);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|err| {
                if err.kind() == io::ErrorKind::AlreadyExists {
                    StoreError::Conflict {
                        version,
                        path: path.clone(),
                    }
                } else {
                    StoreError::Io(err)
                }
            })?;
        file.write_all(document.to_json_string()?.as_bytes())?;
        info!(version, path = %path.display(), "persisted schema version");
        Ok(path)
    }
}

fn parse_version(file_name: &str) -> Option<u32> {
    file_name
        .strip_prefix(FILE_PREFIX)?
        .strip_suffix(FILE_SUFFIX)?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn doc(version: u32) -> SchemaDocument {
        SchemaDocument::from_value(json!({
            "title": format!("AeroTag Aircraft Community Submission (v{version})"),
            "type": "object"
        }))
    }

    #[test]
    fn test_parse_version_from_file_name() {
        assert_eq!(parse_version("community_submission.v1.schema.json"), Some(1));
        assert_eq!(parse_version("community_submission.v12.schema.json"), Some(12));
        assert_eq!(parse_version("community_submission.vx.schema.json"), None);
        assert_eq!(parse_version("notes.txt"), None);
    }

    #[test]
    fn test_latest_version_empty_dir() {
        let dir = tempdir().unwrap();
        let store = SchemaStore::new(dir.path());
        assert!(matches!(
            store.latest_version(),
            Err(StoreError::NoVersions { .. })
        ));
    }

    #[test]
    fn test_latest_version_missing_dir() {
        let dir = tempdir().unwrap();
        let store = SchemaStore::new(dir.path().join("does_not_exist"));
        assert!(matches!(
            store.latest_version(),
            Err(StoreError::NoVersions { .. })
        ));
    }

    #[test]
    fn test_persist_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = SchemaStore::new(dir.path());

        let path = store.persist(&doc(1), 1).unwrap();
        assert!(path.ends_with("community_submission.v1.schema.json"));

        let loaded = store.load(1).unwrap();
        assert_eq!(loaded, doc(1));
        assert_eq!(store.latest_version().unwrap(), 1);
    }

    #[test]
    fn test_latest_version_is_max() {
        let dir = tempdir().unwrap();
        let store = SchemaStore::new(dir.path());
        store.persist(&doc(1), 1).unwrap();
        store.persist(&doc(2), 2).unwrap();
        store.persist(&doc(10), 10).unwrap();
        assert_eq!(store.latest_version().unwrap(), 10);
        assert_eq!(
            store.load_latest().unwrap().title(),
            Some("AeroTag Aircraft Community Submission (v10)")
        );
    }

    #[test]
    fn test_load_missing_version() {
        let dir = tempdir().unwrap();
        let store = SchemaStore::new(dir.path());
        store.persist(&doc(1), 1).unwrap();
        assert!(matches!(
            store.load(7),
            Err(StoreError::NotFound { version: 7, .. })
        ));
    }

    #[test]
    fn test_persist_never_overwrites() {
        let dir = tempdir().unwrap();
        let store = SchemaStore::new(dir.path());
        store.persist(&doc(1), 1).unwrap();
        let original = fs::read(store.schema_path(1)).unwrap();

        let second = SchemaDocument::from_value(json!({"title": "clobber attempt"}));
        assert!(matches!(
            store.persist(&second, 1),
            Err(StoreError::Conflict { version: 1, .. })
        ));

        // The published bytes are untouched by the losing writer
        assert_eq!(fs::read(store.schema_path(1)).unwrap(), original);
    }

    #[test]
    fn test_unrelated_files_are_ignored() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("README.md"), "not a schema").unwrap();
        let store = SchemaStore::new(dir.path());
        store.persist(&doc(1), 1).unwrap();
        assert_eq!(store.latest_version().unwrap(), 1);
    }
}
