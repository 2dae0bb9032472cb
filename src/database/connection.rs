use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::info;

use super::json_store::JsonFileStore;
use super::memory_store::MemoryStore;
use super::store::{RecordStore, Snapshot};
use crate::errors::{StoreError, StoreResult};

pub const DEFAULT_STORE_PATH: &str = "data/db.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    Memory,
    File(PathBuf),
}

pub fn get_store_location(store_path: Option<&str>) -> StoreLocation {
    match store_path {
        Some(":memory:") => StoreLocation::Memory,
        Some(path) => StoreLocation::File(PathBuf::from(path)),
        None => StoreLocation::File(PathBuf::from(DEFAULT_STORE_PATH)),
    }
}

pub async fn establish_connection(location: &StoreLocation) -> StoreResult<Database> {
    match location {
        StoreLocation::Memory => Ok(Database::new(MemoryStore::new())),
        StoreLocation::File(path) => {
            let store = JsonFileStore::new(path);
            if store.ensure_exists().await? {
                info!("Created empty store at {}", path.display());
            }
            Ok(Database::new(store))
        }
    }
}

/// Create an empty store file if none exists.
pub async fn init_store(location: &StoreLocation) -> StoreResult<()> {
    match location {
        StoreLocation::Memory => info!("In-memory store needs no initialisation"),
        StoreLocation::File(path) => {
            establish_connection(location).await?;
            info!("Store ready at {}", path.display());
        }
    }
    Ok(())
}

/// Shared handle over a [`RecordStore`].
///
/// Every access goes through one async mutex, so a read-modify-write in
/// [`Database::transact`] can never interleave with another one.
#[derive(Clone)]
pub struct Database {
    store: Arc<dyn RecordStore>,
    gate: Arc<Mutex<()>>,
}

impl Database {
    pub fn new(store: impl RecordStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
            gate: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self::new(MemoryStore::with_snapshot(snapshot))
    }

    /// Run `f` against a consistent snapshot.
    pub async fn read<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&Snapshot) -> T,
    {
        let _guard = self.gate.lock().await;
        let snapshot = self.store.read_all().await?;
        Ok(f(&snapshot))
    }

    /// Exclusive read-modify-write. The snapshot is written back only when
    /// `f` succeeds.
    pub async fn transact<T, E, F>(&self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Snapshot) -> Result<T, E>,
        E: From<StoreError>,
    {
        let _guard = self.gate.lock().await;
        let mut snapshot = self.store.read_all().await?;
        let output = f(&mut snapshot)?;
        self.store.write_all(&snapshot).await?;
        Ok(output)
    }
}
