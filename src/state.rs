use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::config::Config;
use crate::error::AppError;
use crate::store::{self, FileStore, KeyValueStore};
use crate::types::workout::Workout;

/// The session: an ordered workout collection mirrored into a key-value store.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    workouts: Arc<RwLock<Vec<Workout>>>,
    store: Arc<dyn KeyValueStore>,
    /// Set when the stored collection could neither be read nor backed up.
    writes_blocked: Arc<AtomicBool>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let store = Arc::new(FileStore::new(config.data_dir.clone()));
        Self::with_store(config, store)
    }

    /// Builds the session on top of `store`, loading whatever it already holds.
    /// A collection that cannot be decoded is copied to
    /// [`store::UNREADABLE_WORKOUTS_KEY`] and the session starts empty. If even
    /// the copy fails, writes are refused until a reset.
    pub fn with_store(config: Config, store: Arc<dyn KeyValueStore>) -> Self {
        let mut writes_blocked = false;
        let workouts = match store::load_workouts(store.as_ref()) {
            Ok(workouts) => {
                tracing::info!("Restored {} workouts", workouts.len());
                workouts
            }
            Err(err) => {
                tracing::warn!("Could not restore workouts, starting empty: {}", err);
                match store::backup_unreadable(store.as_ref()) {
                    Ok(()) => tracing::warn!(
                        "Unreadable workouts copied to key {}",
                        store::UNREADABLE_WORKOUTS_KEY
                    ),
                    Err(backup_err) => {
                        tracing::error!(
                            "Could not back up unreadable workouts, refusing writes until reset: {}",
                            backup_err
                        );
                        writes_blocked = true;
                    }
                }
                Vec::new()
            }
        };

        Self {
            config,
            workouts: Arc::new(RwLock::new(workouts)),
            store,
            writes_blocked: Arc::new(AtomicBool::new(writes_blocked)),
        }
    }

    fn ensure_writable(&self) -> Result<(), AppError> {
        if self.writes_blocked.load(Ordering::SeqCst) {
            return Err(AppError::Internal(
                "stored workouts could not be read or backed up; reset to continue".to_string(),
            ));
        }
        Ok(())
    }

    /// Appends and persists. Memory is only updated once the store accepted the write.
    pub async fn add(&self, workout: Workout) -> Result<(), AppError> {
        let mut workouts = self.workouts.write().await;
        self.ensure_writable()?;
        let mut next = workouts.clone();
        next.push(workout);
        store::save_workouts(self.store.as_ref(), &next)?;
        *workouts = next;
        Ok(())
    }

    pub async fn list(&self) -> Vec<Workout> {
        self.workouts.read().await.clone()
    }

    pub async fn get(&self, id: Uuid) -> Option<Workout> {
        self.workouts
            .read()
            .await
            .iter()
            .find(|w| w.id() == id)
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.workouts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.workouts.read().await.is_empty()
    }

    /// Bumps the click counter of one workout and returns its new state.
    pub async fn register_click(&self, id: Uuid) -> Result<Workout, AppError> {
        let mut workouts = self.workouts.write().await;
        self.ensure_writable()?;
        let index = workouts
            .iter()
            .position(|w| w.id() == id)
            .ok_or_else(|| AppError::NotFound(id.to_string()))?;

        let mut next = workouts.clone();
        next[index].register_click();
        store::save_workouts(self.store.as_ref(), &next)?;
        *workouts = next;
        Ok(workouts[index].clone())
    }

    /// Drops every workout, stored and in memory. Returns how many were removed.
    pub async fn reset(&self) -> Result<usize, AppError> {
        let mut workouts = self.workouts.write().await;
        store::clear_workouts(self.store.as_ref())?;
        let removed = workouts.len();
        workouts.clear();
        self.writes_blocked.store(false, Ordering::SeqCst);
        Ok(removed)
    }
}
