/// Collaborator traits for Conty
use crate::error::Result;
use crate::types::{LoadedPack, Pack};
use async_trait::async_trait;

/// Pack repository
///
/// Implementers load a pack's metadata and stage graph. Repairs made to the
/// graph during a session are never written back through this trait.
#[async_trait]
pub trait PackRepository: Send + Sync {
    /// Load a pack and its stage graph
    ///
    /// # Errors
    /// Returns an error if the pack is unknown, unreadable, or its graph
    /// references stages/actions that do not exist
    async fn load_pack(&self, pack_id: &str) -> Result<LoadedPack>;

    /// Release whatever external resources are held for an open pack
    /// (file handles, cached images). Called once per session teardown.
    fn release_pack(&self, pack: &Pack) {
        let _ = pack;
    }
}

/// Audio duration probe
///
/// Used only when a stage omits an explicit duration.
pub trait DurationProbe: Send + Sync {
    /// Native length of the referenced audio asset, in milliseconds
    ///
    /// # Errors
    /// Returns an error if the asset cannot be found or read
    fn probe_duration(&self, file_ref: &str) -> Result<u64>;
}

/// Probe that always reports an unknown (zero) duration
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDurationProbe;

impl DurationProbe for NoDurationProbe {
    fn probe_duration(&self, _file_ref: &str) -> Result<u64> {
        Ok(0)
    }
}
