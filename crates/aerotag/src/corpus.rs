//! Submission corpus reader.
//!
//! Reads every `*.json` document under the submissions directory, in
//! sorted-path order so the registry's first-observed ordering is
//! deterministic across runs. This is the boundary collaborator of the
//! schema engine: file discovery and parsing live here, never in the core.

use aerotag_schema::Submission;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

/// Errors from reading the submission corpus.
#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{path} is not valid JSON: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Directory-backed submission corpus, one JSON document per file.
pub struct DirCorpus {
    dir: PathBuf,
}

impl DirCorpus {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Read the full corpus in deterministic (sorted-path) order.
    ///
    /// A file that fails to parse aborts the read with an error naming the
    /// file; a silently skipped submission would desynchronize the registry
    /// from the corpus.
    pub fn read_all(&self) -> Result<Vec<Submission>, CorpusError> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.dir) {
            let entry = entry?;
            let is_json = entry.path().extension().and_then(|ext| ext.to_str()) == Some("json");
            if entry.file_type().is_file() && is_json {
                paths.push(entry.into_path());
            }
        }
        paths.sort();

        let mut submissions = Vec::with_capacity(paths.len());
        for path in paths {
            let text = fs::read_to_string(&path).map_err(|source| CorpusError::Io {
                path: path.clone(),
                source,
            })?;
            let value = serde_json::from_str(&text).map_err(|source| CorpusError::Malformed {
                path: path.clone(),
                source,
            })?;
            debug!(path = %path.display(), "read submission");
            submissions.push(Submission::new(value));
        }
        Ok(submissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerotag_schema::TagRegistry;
    use tempfile::tempdir;

    #[test]
    fn test_empty_directory_yields_empty_corpus() {
        let dir = tempdir().unwrap();
        let corpus = DirCorpus::new(dir.path());
        assert!(corpus.read_all().unwrap().is_empty());
    }

    #[test]
    fn test_reads_in_sorted_path_order() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("b_second.json"),
            r#"{"registration": "N2", "tags": {"paint_color": "red"}}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("a_first.json"),
            r#"{"registration": "N1", "tags": {"engine_count": 2}}"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "not a submission").unwrap();

        let submissions = DirCorpus::new(dir.path()).read_all().unwrap();
        assert_eq!(submissions.len(), 2);

        // Registry order follows file order, which follows path order
        let registry = TagRegistry::build(&submissions);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, vec!["engine_count", "paint_color"]);
    }

    #[test]
    fn test_malformed_file_names_the_path() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("broken.json");
        fs::write(&bad, "{not json").unwrap();

        let err = DirCorpus::new(dir.path()).read_all().unwrap_err();
        match err {
            CorpusError::Malformed { path, .. } => assert_eq!(path, bad),
            other => panic!("expected Malformed, got {other}"),
        }
    }
}
