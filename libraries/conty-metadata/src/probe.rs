/// Duration probe implementation using lofty
use crate::error::{MetadataError, Result};
use conty_core::{DurationProbe, Pack};
use lofty::AudioFile;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Native length of an audio file in milliseconds
///
/// # Errors
/// Returns an error if the file is missing or not a readable audio file
pub fn read_duration_ms(path: &Path) -> Result<u64> {
    if !path.exists() {
        return Err(MetadataError::FileNotFound(path.display().to_string()));
    }

    let tagged_file = lofty::read_from_path(path)?;
    let duration = tagged_file.properties().duration();
    trace!(path = %path.display(), ?duration, "Probed audio duration");

    Ok(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

/// Probe resolving audio references against a pack's audio directory
#[derive(Debug, Clone)]
pub struct LoftyDurationProbe {
    audio_dir: PathBuf,
}

impl LoftyDurationProbe {
    /// Probe resolving references relative to `audio_dir`
    pub fn new(audio_dir: impl Into<PathBuf>) -> Self {
        Self {
            audio_dir: audio_dir.into(),
        }
    }

    /// Probe for the audio assets of `pack`
    pub fn for_pack(pack: &Pack) -> Self {
        Self::new(pack.folder.join(pack.kind.audio_dir()))
    }

    pub fn audio_dir(&self) -> &Path {
        &self.audio_dir
    }
}

impl DurationProbe for LoftyDurationProbe {
    fn probe_duration(&self, file_ref: &str) -> conty_core::Result<u64> {
        Ok(read_duration_ms(&self.audio_dir.join(file_ref))?)
    }
}
