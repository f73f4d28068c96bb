//! Typed JSON data files
//!
//! A [`JsonFile`] is bound to one path and one stored type. A missing file is
//! reported as `None` so each repository picks its own starting contents.
//! Saves serialize fully in memory, then go through a hidden sibling temp
//! file and a rename, so readers see either the old or the new contents.

use std::ffi::OsString;
use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, BufReader, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::error::{TallyError, TallyResult};

/// One JSON document on disk holding a `T`
#[derive(Debug, Clone)]
pub struct JsonFile<T> {
    path: PathBuf,
    _contents: PhantomData<fn() -> T>,
}

impl<T> JsonFile<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _contents: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the file has been written
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// `.name.json.tmp` next to the target, on the same filesystem
    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_default());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn error(&self, action: &str, cause: impl Display) -> TallyError {
        TallyError::Storage(format!(
            "Failed to {} {}: {}",
            action,
            self.path.display(),
            cause
        ))
    }
}

impl<T: DeserializeOwned> JsonFile<T> {
    /// Read the stored value; `None` if the file does not exist
    pub fn load(&self) -> TallyResult<Option<T>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.error("open", e)),
        };

        serde_json::from_reader(BufReader::new(file))
            .map(Some)
            .map_err(|e| self.error("parse", e))
    }

    /// Read the stored value, or build one when nothing was saved yet
    pub fn load_or_else(&self, initial: impl FnOnce() -> T) -> TallyResult<T> {
        Ok(self.load()?.unwrap_or_else(initial))
    }
}

impl<T: DeserializeOwned + Default> JsonFile<T> {
    pub fn load_or_default(&self) -> TallyResult<T> {
        self.load_or_else(T::default)
    }
}

impl<T: Serialize> JsonFile<T> {
    /// Replace the file's contents with `value`
    ///
    /// Nothing on disk changes if `value` fails to serialize.
    pub fn save(&self, value: &T) -> TallyResult<()> {
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| self.error("serialize", e))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.error("create the directory for", e))?;
        }

        let staging = self.staging_path();
        let written = write_synced(&staging, &bytes).and_then(|()| fs::rename(&staging, &self.path));
        if let Err(e) = written {
            fs::remove_file(&staging).ok();
            return Err(self.error("write", e));
        }

        debug!(path = %self.path.display(), bytes = bytes.len(), "saved data file");
        Ok(())
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}
