//! Silent player for walking a pack without an audio device
//!
//! Segments never end on their own: the walker decides when the current
//! one finishes through a [`DryRunCursor`].

use conty_core::Pack;
use conty_playback::{
    AudioPlayer, PlaybackError, PlayerFactory, PlayerSignal, Result, SegmentToken, SignalSender,
};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

#[derive(Default)]
struct Current {
    segment: Option<(SignalSender, SegmentToken)>,
    duration_ms: u64,
}

/// Walker's handle on the segment the silent player is "playing"
#[derive(Clone, Default)]
pub struct DryRunCursor(Arc<Mutex<Current>>);

impl DryRunCursor {
    /// Report the current segment as played to its end
    ///
    /// Returns false when nothing is playing.
    pub fn finish(&self) -> bool {
        let segment = self.lock().segment.take();
        match segment {
            Some((signals, token)) => signals.send(PlayerSignal::Completed(token)).is_ok(),
            None => false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.lock().segment.is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Current> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub struct DryRunPlayer {
    cursor: DryRunCursor,
    signals: SignalSender,
}

impl AudioPlayer for DryRunPlayer {
    fn play(&mut self, path: &Path, looping: bool, token: SegmentToken) -> Result<()> {
        if !path.is_file() {
            return Err(PlaybackError::player(format!(
                "Audio file not found: {}",
                path.display()
            )));
        }
        debug!(path = %path.display(), looping, "Dry-run play");

        let mut current = self.cursor.lock();
        current.duration_ms = conty_metadata::read_duration_ms(path).unwrap_or(0);
        // a looping segment never ends
        current.segment = (!looping).then(|| (self.signals.clone(), token));
        Ok(())
    }

    fn stop(&mut self) {
        self.cursor.lock().segment = None;
    }

    fn pause(&mut self) {}

    fn resume(&mut self) {}

    fn seek(&mut self, _position_ms: u64) {}

    fn set_volume(&mut self, _volume: f32) {}

    fn dispose(&mut self) {
        let mut current = self.cursor.lock();
        current.segment = None;
        current.duration_ms = 0;
    }

    fn current_time_ms(&self) -> u64 {
        0
    }

    fn duration_ms(&self) -> u64 {
        self.cursor.lock().duration_ms
    }
}

/// Creates silent players sharing one cursor
#[derive(Default)]
pub struct DryRunFactory {
    cursor: DryRunCursor,
}

impl DryRunFactory {
    pub fn cursor(&self) -> DryRunCursor {
        self.cursor.clone()
    }
}

impl PlayerFactory for DryRunFactory {
    fn create(&self, pack: &Pack, signals: SignalSender) -> Box<dyn AudioPlayer> {
        debug!(pack = %pack.id, "Creating dry-run player");
        Box::new(DryRunPlayer {
            cursor: self.cursor.clone(),
            signals,
        })
    }
}
