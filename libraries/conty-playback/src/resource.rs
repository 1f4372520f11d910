//! Single-player audio resource
//!
//! Owns at most one [`AudioPlayer`] at a time. The player is created on the
//! first play request of a session and disposed on teardown; every play
//! request gets a fresh [`SegmentToken`] so late reports from replaced or
//! stopped segments are recognized and dropped.
//!
//! A multi-file sequence (`play_audios`) is one segment: it advances file by
//! file on completion signals. Stopping it drops the rest of the queue and
//! reports `Stopped` instead of `Finished`, so a cut sequence never plays
//! its next file.

use crate::error::{PlaybackError, Result};
use crate::player::{AudioPlayer, PlayerFactory, PlayerSignal, SegmentToken, SignalSender};
use crate::types::PlayerState;
use conty_core::Pack;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// How a segment ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentOutcome {
    /// Played to its end (every file, for a sequence)
    Finished,

    /// A file failed; the rest of a sequence is abandoned
    Failed(String),

    /// Cut by an explicit stop
    Stopped {
        /// Files of the sequence that never started
        unplayed: usize,
    },
}

/// End report of one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentEnd {
    /// Token returned when the segment was started
    pub segment: SegmentToken,
    pub outcome: SegmentOutcome,
}

#[derive(Debug)]
struct Segment {
    id: SegmentToken,
    file_token: SegmentToken,
    remaining: VecDeque<String>,
    /// Full file list, kept only for looping sequences
    replay: Option<Vec<String>>,
}

/// The session's audio resource
pub struct PlaybackResource {
    factory: Arc<dyn PlayerFactory>,
    signals: SignalSender,
    pack: Option<Pack>,
    player: Option<Box<dyn AudioPlayer>>,
    segment: Option<Segment>,
    next_token: SegmentToken,
    paused: bool,
}

impl PlaybackResource {
    pub fn new(factory: Arc<dyn PlayerFactory>, signals: SignalSender) -> Self {
        Self {
            factory,
            signals,
            pack: None,
            player: None,
            segment: None,
            next_token: SegmentToken::first(),
            paused: false,
        }
    }

    /// Bind the resource to a pack; audio references resolve against it
    pub fn attach(&mut self, pack: Pack) {
        self.pack = Some(pack);
    }

    pub fn is_attached(&self) -> bool {
        self.pack.is_some()
    }

    /// Whether a player currently exists
    pub fn is_live(&self) -> bool {
        self.player.is_some()
    }

    /// Play one file, replacing the current segment
    pub fn play(&mut self, file: &str, looping: bool) -> Result<SegmentToken> {
        self.start_segment(vec![file.to_string()], looping)
    }

    /// Play files one after the other as a single segment
    ///
    /// A looping sequence starts over after its last file. Returns `None`
    /// for an empty list.
    pub fn play_audios(&mut self, files: Vec<String>, looping: bool) -> Result<Option<SegmentToken>> {
        if files.is_empty() {
            return Ok(None);
        }
        self.start_segment(files, looping).map(Some)
    }

    fn start_segment(&mut self, files: Vec<String>, looping: bool) -> Result<SegmentToken> {
        if let Some(cut) = self.halt() {
            trace!(segment = cut.segment.value(), "Replacing segment");
        }

        // a single looping file loops in the player itself
        let player_loops = looping && files.len() == 1;
        let replay = (looping && files.len() > 1).then(|| files.clone());
        let mut remaining: VecDeque<String> = files.into();
        let Some(first) = remaining.pop_front() else {
            return Err(PlaybackError::player("empty segment"));
        };

        let token = self.start_file(&first, player_loops)?;
        self.segment = Some(Segment {
            id: token,
            file_token: token,
            remaining,
            replay,
        });
        Ok(token)
    }

    fn start_file(&mut self, file: &str, looping: bool) -> Result<SegmentToken> {
        let pack = self.pack.as_ref().ok_or(PlaybackError::NoActiveSession)?;
        let path = pack.audio_path(file);

        let factory = &self.factory;
        let signals = &self.signals;
        let player = self.player.get_or_insert_with(|| {
            debug!(pack = %pack.id, "Creating audio player");
            factory.create(pack, signals.clone())
        });

        let token = self.next_token;
        self.next_token = token.next();
        self.paused = false;

        debug!(file, token = token.value(), looping, "Playing audio");
        player.play(&path, looping, token)?;
        Ok(token)
    }

    /// Apply a player report
    ///
    /// Returns the end of the live segment, or `None` when the signal was
    /// stale or only moved a sequence on to its next file.
    pub fn on_signal(&mut self, signal: PlayerSignal) -> Option<SegmentEnd> {
        let live = self.segment.as_ref().map(|segment| segment.file_token);
        if live != Some(signal.token()) {
            trace!(token = signal.token().value(), "Dropping stale player signal");
            return None;
        }
        let mut segment = self.segment.take()?;

        match signal {
            PlayerSignal::Failed { message, .. } => {
                warn!(segment = segment.id.value(), %message, "Audio segment failed");
                Some(SegmentEnd {
                    segment: segment.id,
                    outcome: SegmentOutcome::Failed(message),
                })
            }
            PlayerSignal::Completed(_) => {
                if segment.remaining.is_empty() {
                    if let Some(replay) = &segment.replay {
                        segment.remaining = replay.iter().cloned().collect();
                    }
                }
                let Some(next) = segment.remaining.pop_front() else {
                    return Some(SegmentEnd {
                        segment: segment.id,
                        outcome: SegmentOutcome::Finished,
                    });
                };
                match self.start_file(&next, false) {
                    Ok(token) => {
                        segment.file_token = token;
                        self.segment = Some(segment);
                        None
                    }
                    Err(err) => Some(SegmentEnd {
                        segment: segment.id,
                        outcome: SegmentOutcome::Failed(err.to_string()),
                    }),
                }
            }
        }
    }

    /// Cut the live segment, keeping the player
    pub fn halt(&mut self) -> Option<SegmentEnd> {
        let segment = self.segment.take()?;
        if let Some(player) = &mut self.player {
            player.stop();
        }
        self.paused = false;
        Some(SegmentEnd {
            segment: segment.id,
            outcome: SegmentOutcome::Stopped {
                unplayed: segment.remaining.len(),
            },
        })
    }

    /// Pause the live segment; false if there was nothing to pause
    pub fn pause(&mut self) -> bool {
        if self.state() != PlayerState::Playing {
            return false;
        }
        if let Some(player) = &mut self.player {
            player.pause();
        }
        self.paused = true;
        true
    }

    /// Resume a paused segment; false if nothing was paused
    pub fn resume(&mut self) -> bool {
        if self.state() != PlayerState::Paused {
            return false;
        }
        if let Some(player) = &mut self.player {
            player.resume();
        }
        self.paused = false;
        true
    }

    /// Seek within the live segment; ignored when nothing plays
    pub fn seek(&mut self, position_ms: u64) -> bool {
        if self.segment.is_none() {
            return false;
        }
        match &mut self.player {
            Some(player) => {
                player.seek(position_ms);
                true
            }
            None => false,
        }
    }

    pub fn set_volume(&mut self, volume: f32) {
        if let Some(player) = &mut self.player {
            player.set_volume(volume.clamp(0.0, 1.0));
        }
    }

    pub fn position_ms(&self) -> u64 {
        self.player.as_ref().map_or(0, |player| player.current_time_ms())
    }

    pub fn duration_ms(&self) -> u64 {
        self.player.as_ref().map_or(0, |player| player.duration_ms())
    }

    pub fn state(&self) -> PlayerState {
        match (&self.segment, self.paused) {
            (None, _) => PlayerState::Stopped,
            (Some(_), true) => PlayerState::Paused,
            (Some(_), false) => PlayerState::Playing,
        }
    }

    /// Whether audio is audible right now
    pub fn is_playing(&self) -> bool {
        self.state() == PlayerState::Playing
    }

    /// Cut the segment, dispose the player and detach from the pack
    pub fn dispose(&mut self) -> Option<SegmentEnd> {
        let cut = self.halt();
        if let Some(mut player) = self.player.take() {
            debug!("Disposing audio player");
            player.dispose();
        }
        self.pack = None;
        cut
    }
}
