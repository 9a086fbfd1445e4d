//! Identity store backed by JSON files in a data directory.

use crate::registration::{
    domain::RegistrationRecord,
    ports::{IdentityStore, IdentityStoreError, IdentityStoreResult},
};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use std::io::ErrorKind;

const RECORD_SUFFIX: &str = ".registration.json";

/// Stores one `<service>.registration.json` file per service.
///
/// Writes go to a temporary file first and are renamed into place, so a
/// crash mid-write never leaves a truncated record behind.
#[derive(Debug, Clone)]
pub struct FileIdentityStore {
    root: Utf8PathBuf,
}

impl FileIdentityStore {
    /// Creates a store rooted at `root`; nothing is touched until use.
    #[must_use]
    pub fn new(root: impl Into<Utf8PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the data directory.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn record_file(service_name: &str) -> String {
        format!("{service_name}{RECORD_SUFFIX}")
    }

    fn open_root(&self) -> std::io::Result<Dir> {
        Dir::open_ambient_dir(&self.root, ambient_authority())
    }
}

impl IdentityStore for FileIdentityStore {
    fn prepare(&self) -> IdentityStoreResult<()> {
        Dir::create_ambient_dir_all(&self.root, ambient_authority())?;
        Ok(())
    }

    fn load(&self, service_name: &str) -> IdentityStoreResult<Option<RegistrationRecord>> {
        let dir = match self.open_root() {
            Ok(dir) => dir,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let contents = match dir.read_to_string(Self::record_file(service_name)) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let record: RegistrationRecord =
            serde_json::from_str(&contents).map_err(|err| IdentityStoreError::Corrupt {
                service_name: service_name.to_owned(),
                message: err.to_string(),
            })?;
        Ok(Some(record))
    }

    fn save(&self, record: &RegistrationRecord) -> IdentityStoreResult<()> {
        let dir = self.open_root()?;
        let file_name = Self::record_file(record.service_name());
        let temp_name = format!("{file_name}.tmp");
        let contents = serde_json::to_vec_pretty(record).map_err(std::io::Error::other)?;
        dir.write(&temp_name, contents)?;
        dir.rename(&temp_name, &dir, &file_name)?;
        Ok(())
    }
}
