//! Navigation engine
//!
//! Walks a pack's stage graph live: holds the candidate stage set and the
//! selected index, resolves ok/home transitions, plays stage audio through
//! the [`PlaybackResource`] and auto-advances on completion.
//!
//! Everything runs on the task owning the engine. Player reports arrive on
//! a channel and are applied by [`NavigationEngine::pump`],
//! [`NavigationEngine::next_signal`] or the command loop, never from the
//! player's own thread.
//!
//! Failure policy:
//! - a playback error only ends the current audio segment; the stage stays
//!   selected and nothing auto-advances
//! - a dangling graph reference (or a pass-through loop) aborts the
//!   session: it is torn down and `SessionFailed` + `PackStopped` are
//!   emitted
//! - a pack that cannot be opened only emits `SessionFailed`

mod command;

pub use command::{NavigationCommand, NavigationHandle};

use crate::error::{PlaybackError, Result};
use crate::events::NavigationEvent;
use crate::fade::FadeOut;
use crate::player::{PlayerFactory, PlayerSignal, SegmentToken};
use crate::resource::{PlaybackResource, SegmentOutcome};
use crate::types::{NavigationConfig, NavigationState, PlayerState, PlayingInfo};
use conty_core::graph::{map_of_stages_for_option, StageGraph, StageGraphQuery, StageId};
use conty_core::{LoadedPack, Pack, PackRepository, Stage, StageType};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Ok,
    Home,
}

/// Active pack session
struct Session {
    pack: Pack,
    graph: StageGraph,
    /// Current candidate stages, never empty
    stages: Vec<StageId>,
    selected_index: usize,
    /// Stage whose audio is the live segment
    playing: Option<(StageId, SegmentToken)>,
}

impl Session {
    fn selected(&self) -> StageId {
        self.stages[self.selected_index]
    }
}

/// Live navigation over one pack at a time
pub struct NavigationEngine {
    config: NavigationConfig,
    repository: Arc<dyn PackRepository>,
    resource: PlaybackResource,
    signals: mpsc::UnboundedReceiver<PlayerSignal>,
    session: Option<Session>,
    /// Pack to open once the running teardown completes
    pending_next: Option<String>,
    pending_events: Vec<NavigationEvent>,
}

impl NavigationEngine {
    pub fn new(
        repository: Arc<dyn PackRepository>,
        factory: Arc<dyn PlayerFactory>,
        config: NavigationConfig,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            config,
            repository,
            resource: PlaybackResource::new(factory, tx),
            signals: rx,
            session: None,
            pending_next: None,
            pending_events: Vec::new(),
        }
    }

    // ===== Session Lifecycle =====

    /// Open a pack, tearing down the running session first
    ///
    /// The start stage is entered through an implicit ok step, so playback
    /// begins with the first real content.
    pub async fn start_pack(&mut self, pack_id: &str) -> Result<()> {
        self.pending_next = None;
        if self.session.is_some() {
            self.stop(false).await?;
        }
        self.open_session(pack_id).await
    }

    /// Queue a pack and stop; the teardown opens it
    pub async fn switch_pack(&mut self, pack_id: &str, fade: bool) -> Result<()> {
        self.pending_next = Some(pack_id.to_string());
        self.stop(fade).await
    }

    /// Stop the session, optionally fading the audio out first
    ///
    /// Returns once the session is fully torn down and, if a pack was
    /// queued meanwhile, once that pack has started.
    pub async fn stop(&mut self, fade: bool) -> Result<()> {
        if fade && self.resource.is_playing() {
            let mut tween = self.fade_out();
            while let Some(gain) = tween.next_gain().await {
                self.resource.set_volume(gain);
            }
        }
        self.finish_stop().await
    }

    fn fade_out(&self) -> FadeOut {
        debug!(duration_ms = self.config.fade_out_ms, "Fading out");
        FadeOut::new(
            Duration::from_millis(self.config.fade_out_ms),
            self.config.fade_steps,
            self.config.fade_curve,
        )
    }

    async fn finish_stop(&mut self) -> Result<()> {
        match self.teardown() {
            Some(pack_id) => {
                info!(pack = %pack_id, "Starting queued pack");
                self.open_session(&pack_id).await
            }
            None => Ok(()),
        }
    }

    async fn open_session(&mut self, pack_id: &str) -> Result<()> {
        let (pack, graph, start) = match self.load_session(pack_id).await {
            Ok(loaded) => loaded,
            Err(err) => {
                error!(pack = %pack_id, %err, "Pack failed to open");
                self.pending_events.push(NavigationEvent::SessionFailed {
                    message: err.to_string(),
                });
                return Err(err);
            }
        };
        info!(pack = %pack.id, start = %graph.stage(start).uuid, "Starting pack");

        self.resource.attach(pack.clone());
        self.pending_events.push(NavigationEvent::PackStarted {
            pack_id: pack.id.clone(),
            title: pack.title().to_string(),
        });
        self.session = Some(Session {
            pack,
            graph,
            stages: vec![start],
            selected_index: 0,
            playing: None,
        });
        self.emit_stages_changed();

        let result = self.advance(Direction::Ok);
        self.guard(result)
    }

    async fn load_session(&mut self, pack_id: &str) -> Result<(Pack, StageGraph, StageId)> {
        let LoadedPack { pack, graph } = self.repository.load_pack(pack_id).await?;
        let start = graph.start()?;
        Ok((pack, graph, start))
    }

    /// Non-fade teardown; hands back the queued pack, if any
    ///
    /// Order: stopped notifications, pack release, state reset, player
    /// disposal.
    fn teardown(&mut self) -> Option<String> {
        if let Some(session) = self.session.take() {
            info!(pack = %session.pack.id, "Stopping pack");
            self.pending_events.push(NavigationEvent::PlaybackChanged {
                state: PlayerState::Stopped,
                playing_info: None,
            });
            self.pending_events.push(NavigationEvent::PackStopped);
            self.repository.release_pack(&session.pack);
        }
        if let Some(cut) = self.resource.dispose() {
            debug!(segment = cut.segment.value(), outcome = ?cut.outcome, "Cut audio on teardown");
        }
        self.pending_next.take()
    }

    /// Abort the session on fatal errors, pass everything through
    fn guard<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            if err.is_fatal() && self.session.is_some() {
                error!(%err, "Aborting session");
                self.pending_events.push(NavigationEvent::SessionFailed {
                    message: err.to_string(),
                });
                if let Some(pack_id) = self.teardown() {
                    warn!(pack = %pack_id, "Dropping queued pack after session failure");
                }
            }
        }
        result
    }

    // ===== Navigation =====

    /// Select another candidate of the current set and enter it
    ///
    /// Selecting the already selected index does nothing.
    pub fn select(&mut self, index: usize) -> Result<()> {
        let session = self.session.as_mut().ok_or(PlaybackError::NoActiveSession)?;
        if index >= session.stages.len() {
            return Err(PlaybackError::IndexOutOfBounds(index));
        }
        if index == session.selected_index {
            return Ok(());
        }
        session.selected_index = index;
        self.emit_stages_changed();

        let result = self.enter_selected();
        self.guard(result)
    }

    /// Follow the selected stage's ok transition; no-op without one
    pub fn advance_ok(&mut self) -> Result<()> {
        let result = self.advance(Direction::Ok);
        self.guard(result)
    }

    /// Follow the selected stage's home transition; no-op without one
    ///
    /// Always lands on the first candidate: home transitions in the wild
    /// carry unreliable option indexes.
    pub fn advance_home(&mut self) -> Result<()> {
        let result = self.advance(Direction::Home);
        self.guard(result)
    }

    fn advance(&mut self, direction: Direction) -> Result<()> {
        if self.step(direction)? {
            self.enter_selected()
        } else {
            Ok(())
        }
    }

    /// Replace the candidate set; false when there is no transition
    fn step(&mut self, direction: Direction) -> Result<bool> {
        let session = self.session.as_mut().ok_or(PlaybackError::NoActiveSession)?;
        let current = session.selected();
        let stage = session.graph.stage(current);

        let (next, option_index) = match direction {
            Direction::Ok => (
                session.graph.next_from(current)?,
                stage.ok_transition.as_ref().and_then(|t| t.option_index()),
            ),
            Direction::Home => (session.graph.home_from(current)?, None),
        };
        if next.is_empty() {
            debug!(stage = %session.graph.stage(current).uuid, ?direction, "No transition");
            return Ok(false);
        }

        let stages = map_of_stages_for_option(&session.graph, next, None);
        session.selected_index = option_index.filter(|&i| i < stages.len()).unwrap_or(0);
        session.stages = stages;
        debug!(
            ?direction,
            candidates = session.stages.len(),
            selected = session.selected_index,
            "Moved to new stage set"
        );

        self.emit_stages_changed();
        Ok(true)
    }

    /// Stage-entry procedure for the selected stage
    ///
    /// Stages with audio start playing; stages without audio are passed
    /// through with an implicit ok, up to a bounded number of hops.
    fn enter_selected(&mut self) -> Result<()> {
        let limit = self.pass_through_limit();
        let mut hops = 0;
        loop {
            let session = self.session.as_mut().ok_or(PlaybackError::NoActiveSession)?;
            let id = session.selected();
            session.graph.repair_missing_home(id);

            let stage = session.graph.stage(id);
            if let Some(audio) = stage.audio.clone() {
                self.play_stage(id, &audio);
                return Ok(());
            }

            hops += 1;
            if hops > limit {
                return Err(PlaybackError::PassThroughLoop(stage.uuid.clone()));
            }
            debug!(stage = %stage.uuid, "Passing through stage without audio");
            if !self.step(Direction::Ok)? {
                return Ok(());
            }
        }
    }

    fn pass_through_limit(&self) -> usize {
        match (self.config.max_pass_through, &self.session) {
            (0, Some(session)) => session.graph.stages().len(),
            (limit, _) => limit,
        }
    }

    fn play_stage(&mut self, id: StageId, audio: &str) {
        let result = self.resource.play(audio, false);
        let Some(session) = self.session.as_mut() else {
            return;
        };
        match result {
            Ok(token) => {
                session.playing = Some((id, token));
                let playing_info = self.playing_info();
                self.pending_events.push(NavigationEvent::PlaybackChanged {
                    state: PlayerState::Playing,
                    playing_info,
                });
            }
            Err(err) => {
                session.playing = None;
                warn!(stage = %session.graph.stage(id).uuid, %err, "Stage audio failed to start");
                self.report_playback_failure(err.to_string());
            }
        }
    }

    fn report_playback_failure(&mut self, message: String) {
        self.pending_events
            .push(NavigationEvent::PlaybackFailed { message });
        let playing_info = self.playing_info();
        self.pending_events.push(NavigationEvent::PlaybackChanged {
            state: PlayerState::Stopped,
            playing_info,
        });
    }

    // ===== Player Signals =====

    /// Apply one player report
    ///
    /// A finished stage segment auto-advances when its stage is still the
    /// selected one and carries autoplay.
    pub fn handle_signal(&mut self, signal: PlayerSignal) -> Result<()> {
        let Some(end) = self.resource.on_signal(signal) else {
            return Ok(());
        };

        let ended_stage = self.session.as_mut().and_then(|session| match session.playing {
            Some((id, token)) if token == end.segment => {
                session.playing = None;
                Some(id)
            }
            _ => None,
        });

        match end.outcome {
            SegmentOutcome::Finished => {
                let playing_info = self.playing_info();
                self.pending_events.push(NavigationEvent::PlaybackChanged {
                    state: PlayerState::Stopped,
                    playing_info,
                });
                let autoplay = match (&self.session, ended_stage) {
                    (Some(session), Some(id)) => {
                        session.selected() == id
                            && session.graph.stage(id).control_settings.autoplay
                    }
                    _ => false,
                };
                if autoplay {
                    debug!("Autoplay after segment end");
                    return self.advance_ok();
                }
                Ok(())
            }
            SegmentOutcome::Failed(message) => {
                self.report_playback_failure(message);
                Ok(())
            }
            SegmentOutcome::Stopped { .. } => Ok(()),
        }
    }

    /// Apply every player report already received; returns how many
    pub fn pump(&mut self) -> Result<usize> {
        let mut handled = 0;
        while let Ok(signal) = self.signals.try_recv() {
            self.handle_signal(signal)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Wait for the next player report and apply it
    pub async fn next_signal(&mut self) -> Result<()> {
        match self.signals.recv().await {
            Some(signal) => self.handle_signal(signal),
            None => Ok(()),
        }
    }

    // ===== Player Controls =====

    /// Play files one after another, outside of stage navigation
    pub fn play_audios(&mut self, files: Vec<String>, looping: bool) -> Result<()> {
        let session = self.session.as_mut().ok_or(PlaybackError::NoActiveSession)?;
        session.playing = None;
        match self.resource.play_audios(files, looping) {
            Ok(Some(_)) => {
                let playing_info = self.playing_info();
                self.pending_events.push(NavigationEvent::PlaybackChanged {
                    state: PlayerState::Playing,
                    playing_info,
                });
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                self.report_playback_failure(err.to_string());
                Err(err)
            }
        }
    }

    pub fn pause(&mut self) -> bool {
        let paused = self.resource.pause();
        if paused {
            self.emit_player_state(PlayerState::Paused);
        }
        paused
    }

    pub fn resume(&mut self) -> bool {
        let resumed = self.resource.resume();
        if resumed {
            self.emit_player_state(PlayerState::Playing);
        }
        resumed
    }

    /// Flip between playing and paused; no-op when nothing plays
    pub fn toggle_play_state(&mut self) -> bool {
        match self.resource.state() {
            PlayerState::Playing => self.pause(),
            PlayerState::Paused => self.resume(),
            PlayerState::Stopped => false,
        }
    }

    /// Seek within the current segment
    pub fn seek(&mut self, position_ms: u64) -> bool {
        self.resource.seek(position_ms)
    }

    // ===== Queries =====

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn player_state(&self) -> PlayerState {
        self.resource.state()
    }

    pub fn position_ms(&self) -> u64 {
        self.resource.position_ms()
    }

    pub fn duration_ms(&self) -> u64 {
        self.resource.duration_ms()
    }

    /// Whether a player instance currently exists
    pub fn has_live_player(&self) -> bool {
        self.resource.is_live()
    }

    pub fn pack(&self) -> Option<&Pack> {
        self.session.as_ref().map(|session| &session.pack)
    }

    pub fn graph(&self) -> Option<&StageGraph> {
        self.session.as_ref().map(|session| &session.graph)
    }

    pub fn current_stage(&self) -> Option<&Stage> {
        self.session
            .as_ref()
            .map(|session| session.graph.stage(session.selected()))
    }

    pub fn can_go_home(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| session.graph.can_go_home(session.selected()))
    }

    /// Snapshot of the session, `None` when idle
    pub fn state(&self) -> Option<NavigationState> {
        let session = self.session.as_ref()?;
        Some(NavigationState {
            pack_id: session.pack.id.clone(),
            stages: session
                .stages
                .iter()
                .map(|&id| session.graph.stage(id).uuid.clone())
                .collect(),
            selected_index: session.selected_index,
            player_state: self.resource.state(),
        })
    }

    /// Description of what is playing
    ///
    /// Long segments are named after their story, option stages and plain
    /// confirmable stages after themselves, anything else after the pack.
    pub fn playing_info(&self) -> Option<PlayingInfo> {
        let session = self.session.as_ref()?;
        let graph = &session.graph;
        let id = session.selected();
        let stage = graph.stage(id);
        let duration_ms = self.resource.duration_ms();
        let title = session.pack.title().to_string();

        let (name, description) = if duration_ms > self.config.story_name_threshold_ms {
            (graph.story_name(id), Some(title))
        } else if stage.stage_type == StageType::MenuOptionStage
            || (stage.stage_type == StageType::Stage && stage.control_settings.ok)
        {
            (graph.clean_display_name(id), Some(title))
        } else {
            (Some(title), session.pack.metadata.description.clone())
        };

        let image = if graph.is_story(id) {
            graph.story_image(id)
        } else {
            stage.image.as_deref()
        };

        Some(PlayingInfo {
            can_pause: stage.control_settings.pause,
            duration_ms,
            name,
            description,
            image: image.map(str::to_string),
        })
    }

    // ===== Events =====

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<NavigationEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn emit_stages_changed(&mut self) {
        if let Some(session) = &self.session {
            self.pending_events.push(NavigationEvent::StagesChanged {
                stages: session
                    .stages
                    .iter()
                    .map(|&id| session.graph.stage(id).uuid.clone())
                    .collect(),
                selected_index: session.selected_index,
            });
        }
    }

    fn emit_player_state(&mut self, state: PlayerState) {
        let playing_info = self.playing_info();
        self.pending_events
            .push(NavigationEvent::PlaybackChanged { state, playing_info });
    }
}
