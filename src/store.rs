use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::StoreError;
use crate::types::workout::Workout;

/// Key the workout collection is stored under.
pub const WORKOUTS_KEY: &str = "workouts";

/// Where an undecodable collection is copied before anything overwrites it.
pub const UNREADABLE_WORKOUTS_KEY: &str = "workouts.unreadable";

/// Flat string key-value storage, the way a browser's local storage behaves.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// One `<key>.json` file per key inside `dir`.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        source,
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(io_error(key, err)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                tracing::warn!(tmp = %tmp.display(), "could not remove temp file: {}", cleanup);
            }
            io_error(key, e)
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(key, err)),
        }
    }
}

#[derive(Default, Clone)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries().remove(key);
        Ok(())
    }
}

/// Writes the whole collection under [`WORKOUTS_KEY`].
pub fn save_workouts(store: &dyn KeyValueStore, workouts: &[Workout]) -> Result<(), StoreError> {
    let encoded = serde_json::to_string(workouts)?;
    store.set(WORKOUTS_KEY, &encoded)
}

/// Reads the collection back. Entries that fail to decode or fail their checks
/// are dropped one by one; only a value that is not a JSON array is an error.
pub fn load_workouts(store: &dyn KeyValueStore) -> Result<Vec<Workout>, StoreError> {
    let Some(encoded) = store.get(WORKOUTS_KEY)? else {
        return Ok(Vec::new());
    };

    let stored: Vec<serde_json::Value> = serde_json::from_str(&encoded)?;
    let total = stored.len();
    let workouts: Vec<Workout> = stored
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            let workout = match serde_json::from_value::<Workout>(entry) {
                Ok(workout) => workout,
                Err(err) => {
                    tracing::warn!(index, "dropping undecodable stored workout: {}", err);
                    return None;
                }
            };
            let id = workout.id();
            match workout.rehydrate() {
                Ok(w) => Some(w),
                Err(err) => {
                    tracing::warn!(%id, "dropping stored workout: {}", err);
                    None
                }
            }
        })
        .collect();

    tracing::debug!(loaded = workouts.len(), total, "workouts loaded from store");
    Ok(workouts)
}

/// Copies the raw value under [`WORKOUTS_KEY`] to [`UNREADABLE_WORKOUTS_KEY`].
pub fn backup_unreadable(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    if let Some(raw) = store.get(WORKOUTS_KEY)? {
        store.set(UNREADABLE_WORKOUTS_KEY, &raw)?;
    }
    Ok(())
}

pub fn clear_workouts(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    store.remove(WORKOUTS_KEY)
}
