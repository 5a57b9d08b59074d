use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::config::Config;

/// Raw key → JSON text storage underneath [`GameStore`](super::GameStore).
pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// One `<key>.json` file per entry under a base directory.
pub struct DirBackend {
    base_dir: PathBuf,
}

impl DirBackend {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("numquest");
        Self::with_base_dir(base_dir)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_base_dir(PathBuf::from(&config.data_dir))
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for DirBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.file_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.file_path(key);
        let tmp_path = path.with_extension("json.tmp");

        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.file_path(key)) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Process-local storage for tests and throwaway profiles.
#[derive(Default)]
pub struct MemoryBackend {
    entries: RefCell<HashMap<String, String>>,
    read_only: Cell<bool>,
    unreadable: Cell<bool>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every write fail, like a full or locked store.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.set(read_only);
    }

    /// Make every read fail, like a transient I/O error.
    pub fn set_unreadable(&self, unreadable: bool) {
        self.unreadable.set(unreadable);
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        if self.unreadable.get() {
            bail!("storage is unreadable, cannot read {key}");
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.read_only.get() {
            bail!("storage is read-only, cannot write {key}");
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if self.read_only.get() {
            bail!("storage is read-only, cannot remove {key}");
        }
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}
