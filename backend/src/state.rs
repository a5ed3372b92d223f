//! Shared application state.
//!
//! `AppState` is cloned into every actix worker as `web::Data`. It bundles the
//! record store, the upload directory, and the scorer chosen at startup.
//!
//! The store does read-modify-write on the whole document, so concurrent
//! mutations would lose updates. `records_lock` serializes them: anything that
//! saves the store holds the write half for its full load → mutate → save
//! cycle, while plain readers take the read half.

use crate::config::StorageConfig;
use crate::naming::{resolve_in, StampAllocator};
use crate::scorer::Scorer;
use crate::store::RecordStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub uploads: Arc<UploadDir>,
    pub scorer: Arc<dyn Scorer>,
    pub records_lock: Arc<RwLock<()>>,
}

/// Where uploaded images live and what may be uploaded.
#[derive(Debug)]
pub struct UploadDir {
    pub dir: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub max_bytes: usize,
    pub stamps: StampAllocator,
}

impl UploadDir {
    pub fn is_allowed_extension(&self, ext: &str) -> bool {
        self.allowed_extensions
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext))
    }

    /// Path of a stored image, or `None` for names that escape the directory.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        resolve_in(&self.dir, filename)
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }
}

impl AppState {
    /// Builds the state and makes sure the upload directory exists.
    pub fn new(storage: &StorageConfig, scorer: Arc<dyn Scorer>) -> std::io::Result<Self> {
        std::fs::create_dir_all(&storage.upload_dir)?;
        Ok(Self {
            store: Arc::new(RecordStore::new(storage.data_file.clone())),
            uploads: Arc::new(UploadDir {
                dir: storage.upload_dir.clone(),
                allowed_extensions: storage.allowed_extensions.clone(),
                max_bytes: storage.max_upload_bytes,
                stamps: StampAllocator::new(),
            }),
            scorer,
            records_lock: Arc::new(RwLock::new(())),
        })
    }
}
