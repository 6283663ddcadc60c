//! Repository adapters for persistence layer

use std::sync::Arc;

use sow_domain::repository::{DocumentRepository, DraftRepository};
use sow_infra::persistence::{FileDocumentRepository, FileDraftRepository, RemoteDocumentRepository};
use sow_types::{Result, StorageBackend};
use tracing::debug;

use crate::config::Config;

/// Open the file-based draft store
pub fn open_draft_repo(config: &Config) -> Result<FileDraftRepository> {
    let store_dir = config.store_dir()?;
    FileDraftRepository::open(store_dir)
}

/// Open the document library selected by `config.backend`
pub fn open_library(config: &Config) -> Result<Arc<dyn DocumentRepository>> {
    debug!(backend = %config.backend, "opening document library");
    match config.backend {
        StorageBackend::Local => {
            let store_dir = config.store_dir()?;
            Ok(Arc::new(FileDocumentRepository::open(store_dir)?))
        }
        StorageBackend::Remote => Ok(Arc::new(RemoteDocumentRepository::new(
            &config.remote.settings(),
        )?)),
    }
}

/// Draft store and library as shared handles
pub fn open_repositories(
    config: &Config,
) -> Result<(Arc<dyn DraftRepository>, Arc<dyn DocumentRepository>)> {
    let drafts: Arc<dyn DraftRepository> = Arc::new(open_draft_repo(config)?);
    let library = open_library(config)?;
    Ok((drafts, library))
}
