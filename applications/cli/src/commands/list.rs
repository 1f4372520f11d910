use crate::error::Result;
use conty_core::Pack;
use conty_storage::FolderPackRepository;
use std::path::Path;

/// Packs found under a library root, sorted by id
pub async fn list(root: &Path) -> Result<Vec<Pack>> {
    let repository = FolderPackRepository::new(root);
    Ok(repository.list_packs().await?)
}
