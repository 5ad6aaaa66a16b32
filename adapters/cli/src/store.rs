//! Best-wave record kept in a JSON file.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use horde_system_session::{BestWaveStore, StoreError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize)]
struct BestWaveRecord {
    best_wave: u32,
}

/// Store persisting `{ "best_wave": N }` at a fixed path.
#[derive(Debug)]
pub(crate) struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl BestWaveStore for JsonFileStore {
    fn load(&self) -> Result<u32, StoreError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(0),
            Err(error) => return Err(self.io_error(error)),
        };
        let record: BestWaveRecord = serde_json::from_str(&contents)
            .map_err(|error| StoreError::Malformed(error.to_string()))?;
        Ok(record.best_wave)
    }

    fn save(&mut self, best_wave: u32) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&BestWaveRecord { best_wave })
            .map_err(|error| StoreError::Malformed(error.to_string()))?;
        fs::write(&self.path, json).map_err(|error| self.io_error(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_reads_as_zero() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = JsonFileStore::new(dir.path().join("best_wave.json"));
        assert_eq!(store.load().expect("load"), 0);
    }

    #[test]
    fn saved_record_is_loaded_back() {
        let dir = tempfile::tempdir().expect("temp dir");
        let mut store = JsonFileStore::new(dir.path().join("best_wave.json"));
        store.save(14).expect("save");

        let reopened = JsonFileStore::new(store.path());
        assert_eq!(reopened.load().expect("load"), 14);

        let raw = fs::read_to_string(store.path()).expect("read back");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("valid json");
        assert_eq!(value["best_wave"], 14);
    }

    #[test]
    fn malformed_record_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("best_wave.json");
        fs::write(&path, "{ \"best\": ").expect("write");

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Malformed(_))));
    }
}
