use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::models::error::TakeError;
use crate::storage::wav_writer::sha256_file;
use crate::traits::asset_registrar::AssetRegistrar;

/// Registrar for hosts without an asset database.
///
/// The identifier of a file is the SHA-256 digest of its contents, so
/// re-saving a changed take yields a new identifier.
#[derive(Debug, Default)]
pub struct ChecksumRegistrar {
    registered: BTreeMap<PathBuf, String>,
    refresh_count: u64,
}

impl ChecksumRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier last returned for `path`.
    pub fn identifier(&self, path: &Path) -> Option<&str> {
        self.registered.get(path).map(String::as_str)
    }

    pub fn registered(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.registered.iter().map(|(p, id)| (p.as_path(), id.as_str()))
    }

    /// Number of `refresh` calls so far.
    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }
}

impl AssetRegistrar for ChecksumRegistrar {
    fn import_and_register(&mut self, path: &Path) -> Result<String, TakeError> {
        let identifier = sha256_file(path).map_err(|e| TakeError::Registration(e.to_string()))?;
        self.registered.insert(path.to_path_buf(), identifier.clone());
        Ok(identifier)
    }

    fn refresh(&mut self) {
        self.refresh_count += 1;
        log::debug!("registry refreshed ({} files)", self.registered.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn identifier_follows_file_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take_1.wav");
        let mut registrar = ChecksumRegistrar::new();

        fs::write(&path, b"first").unwrap();
        let first = registrar.import_and_register(&path).unwrap();
        assert_eq!(registrar.identifier(&path), Some(first.as_str()));

        fs::write(&path, b"second").unwrap();
        let second = registrar.import_and_register(&path).unwrap();
        assert_ne!(first, second);
        assert_eq!(registrar.registered().count(), 1);
    }

    #[test]
    fn missing_file_fails_registration() {
        let dir = tempfile::tempdir().unwrap();
        let mut registrar = ChecksumRegistrar::new();
        let err = registrar.import_and_register(&dir.path().join("gone.wav")).unwrap_err();
        assert!(matches!(err, TakeError::Registration(_)));
    }

    #[test]
    fn refresh_is_counted() {
        let mut registrar = ChecksumRegistrar::new();
        registrar.refresh();
        registrar.refresh();
        assert_eq!(registrar.refresh_count(), 2);
    }
}
