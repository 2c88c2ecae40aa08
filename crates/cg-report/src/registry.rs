use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use cg_core::errors::{io_error, CgError};
use cg_core::serde::{from_json_slice, to_pretty_json_bytes};

/// Durable set of report file names that have already been pruned.
///
/// Persisted as a pretty-printed JSON array of names, sorted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedFileRegistry {
    path: PathBuf,
    names: BTreeSet<String>,
}

impl ProcessedFileRegistry {
    /// Loads the registry stored at `path`.
    ///
    /// A missing, unreadable or malformed file yields an empty registry bound
    /// to the same path.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let names = match fs::read(&path) {
            Ok(bytes) => match from_json_slice::<Vec<String>>(&bytes) {
                Ok(names) => names.into_iter().collect(),
                Err(err) => {
                    tracing::warn!(path = %path.display(), error = %err, "ignoring malformed registry");
                    BTreeSet::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeSet::new(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable registry");
                BTreeSet::new()
            }
        };
        Self { path, names }
    }

    /// Registry file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when `name` has already been pruned.
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Records `name`; returns false when it was already present.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    /// Number of registered names.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.names.iter().map(String::as_str)
    }

    /// Writes the registry to its file, creating parent directories.
    pub fn save(&self) -> Result<(), CgError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| io_error("registry.create_dir", parent, err))?;
        }
        let names: Vec<&str> = self.names().collect();
        let bytes = to_pretty_json_bytes(&names)?;
        fs::write(&self.path, bytes).map_err(|err| io_error("registry.write", &self.path, err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let registry = ProcessedFileRegistry::load(dir.path().join("processed_files.json"));
        assert!(registry.is_empty());
    }

    #[test]
    fn malformed_file_loads_empty() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("processed_files.json");
        fs::write(&path, "{not json").expect("write");
        assert!(ProcessedFileRegistry::load(&path).is_empty());
    }

    #[test]
    fn saved_names_are_sorted_and_reload() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("state").join("processed_files.json");
        let mut registry = ProcessedFileRegistry::load(&path);
        assert!(registry.insert("900_5_VOICE.xlsx"));
        assert!(registry.insert("1000_5_INBUILT.xlsx"));
        assert!(!registry.insert("900_5_VOICE.xlsx"));
        registry.save().expect("save");

        let raw: Vec<String> =
            serde_json::from_slice(&fs::read(&path).expect("read")).expect("json array");
        assert_eq!(raw, vec!["1000_5_INBUILT.xlsx", "900_5_VOICE.xlsx"]);

        let reloaded = ProcessedFileRegistry::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("900_5_VOICE.xlsx"));
        assert_eq!(reloaded.path(), path.as_path());
    }
}
