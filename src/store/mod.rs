//! Persistence of the deployment record.
//!
//! One JSON file, overwritten atomically: serialize, write to a temp file in
//! the destination directory, fsync, rename over the destination. A reader
//! observes the previous record or the new one, never a torn mix.

pub mod record;

pub use record::DeploymentRecord;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors from reading or writing the record file.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Parent directory could not be created.
    #[error("cannot create record directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serializing the record failed.
    #[error("cannot encode record: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    /// Writing or renaming the record file failed.
    #[error("cannot write record {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading the record file failed for a reason other than absence.
    #[error("cannot read record {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The record file exists but does not parse.
    #[error("record {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Store for the single deployment record at a configured path.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the record lives.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the record, replacing any previous one atomically.
    pub fn persist(&self, record: &DeploymentRecord) -> Result<(), StoreError> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;

        let body = serde_json::to_vec_pretty(record)
            .map_err(|source| StoreError::Encode { source })?;

        // Temp file in the same directory so the rename stays on one
        // filesystem.
        let mut tmp = NamedTempFile::new_in(parent).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        tmp.write_all(&body).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        tmp.as_file().sync_all().map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        tmp.persist(&self.path).map_err(|e| StoreError::Write {
            path: self.path.clone(),
            source: e.error,
        })?;

        tracing::info!(
            path = %self.path.display(),
            address = %record.address,
            "Deployment record saved"
        );
        Ok(())
    }

    /// Read the record back. A missing file is `Ok(None)`; a file that
    /// exists but does not parse is an error.
    pub fn load(&self) -> Result<Option<DeploymentRecord>, StoreError> {
        let content = match fs::read(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        let record = serde_json::from_slice(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        Ok(Some(record))
    }
}
