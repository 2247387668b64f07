// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Filesystem-backed `RecordStore` for the importer ledger.
//!
//! Each record is one JSON file named `<key>.json` under a root directory.
//! Writes land in a temporary sibling first and are renamed into place, so a
//! failed write never truncates the previous record.
#![forbid(unsafe_code)]

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use importer_store::{RecordStore, StoreError};
use tracing::debug;

const RECORD_EXT: &str = "json";

/// Store records as JSON files under a root directory.
#[derive(Debug, Clone)]
pub struct FsRecordStore {
    root: PathBuf,
}

impl FsRecordStore {
    /// Create a store rooted at the platform data directory
    /// (e.g. `~/.local/share/importer-ledger/records`).
    ///
    /// # Errors
    ///
    /// Fails when the data directory cannot be resolved or created.
    pub fn new() -> Result<Self, StoreError> {
        let proj = ProjectDirs::from("dev", "flyingrobots", "importer-ledger")
            .ok_or_else(|| StoreError::Other("could not resolve data dir".into()))?;
        Self::at(proj.data_dir().join("records"))
    }

    /// Create a store rooted at `root`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Fails when `root` cannot be created.
    pub fn at(root: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory holding the record files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if !is_addressable(key) {
            return Err(StoreError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(format!("{key}.{RECORD_EXT}")))
    }
}

/// Keys become file names, so anything that could escape `root` or collide
/// with a hidden/temporary file is refused.
fn is_addressable(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && !key.contains(['/', '\\', '\0'])
}

impl RecordStore for FsRecordStore {
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        Ok(path.try_exists()?)
    }

    fn load_raw(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read(path) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(key.to_owned()))
            }
            Err(err) => Err(StoreError::Io(err)),
        }
    }

    fn save_raw(&self, key: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let staging = self.root.join(format!(".{key}.{RECORD_EXT}.tmp"));
        let staged = fs::write(&staging, data).and_then(|()| fs::rename(&staging, &path));
        if let Err(err) = staged {
            // The staging file may be partially written or never renamed.
            let _ = fs::remove_file(&staging);
            return Err(StoreError::Io(err));
        }
        debug!(path = %path.display(), bytes = data.len(), "record file replaced");
        Ok(())
    }
}
