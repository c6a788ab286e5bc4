//! Service implementations
//!
//! Real implementations of [`RemoteStore`] for every supported backend

pub mod drive_store;
pub mod dropbox_store;
pub mod local_store;
pub mod memory_store;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::config::StoreSettings;
use crate::error::LabelerResult;
use crate::traits::RemoteStore;

// Re-export service implementations
pub use drive_store::DriveStore;
pub use dropbox_store::DropboxStore;
pub use local_store::LocalFsStore;
pub use memory_store::InMemoryStore;

/// Instantiate the store selected by configuration
pub fn build_store(settings: &StoreSettings) -> LabelerResult<Arc<dyn RemoteStore>> {
    let store: Arc<dyn RemoteStore> = match settings {
        StoreSettings::Local { base_dir } => Arc::new(LocalFsStore::new(base_dir.clone())),
        StoreSettings::Memory => Arc::new(InMemoryStore::new()),
        StoreSettings::Dropbox { token } => Arc::new(DropboxStore::new(token.clone())?),
        StoreSettings::Gdrive { token, folder_id } => {
            Arc::new(DriveStore::new(token.clone(), folder_id.clone())?)
        }
    };
    Ok(store)
}
