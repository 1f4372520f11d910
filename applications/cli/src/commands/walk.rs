use super::pack_id;
use crate::config::ContyConfig;
use crate::dry_run::DryRunFactory;
use crate::error::{CliError, Result};
use conty_playback::{NavigationEngine, NavigationEvent, PlayerState};
use conty_storage::FolderPackRepository;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// A stage whose audio started during the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedStage {
    pub uuid: String,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct WalkReport {
    pub played: Vec<PlayedStage>,
    /// Non-fatal playback failures
    pub failures: Vec<String>,
    /// Set when the session was aborted
    pub aborted: Option<String>,
    /// Step budget ran out before the walk settled
    pub exhausted: bool,
    opened: bool,
}

impl WalkReport {
    fn record(&mut self, engine: &mut NavigationEngine) {
        for event in engine.drain_events() {
            match event {
                NavigationEvent::PlaybackChanged {
                    state: PlayerState::Playing,
                    playing_info,
                } => {
                    if let Some(stage) = engine.current_stage() {
                        self.played.push(PlayedStage {
                            uuid: stage.uuid.clone(),
                            name: playing_info.and_then(|info| info.name),
                        });
                    }
                }
                NavigationEvent::PackStarted { .. } => self.opened = true,
                NavigationEvent::PlaybackFailed { message } => self.failures.push(message),
                NavigationEvent::SessionFailed { message } => self.aborted = Some(message),
                other => debug!(event = ?other, "Walk event"),
            }
        }
    }
}

/// Walk a pack with a silent player
///
/// Every segment is taken to play to its end. Whenever navigation waits
/// for the listener, the next choice selects a candidate and confirms it;
/// the walk ends when choices run out.
pub async fn walk(folder: &Path, choices: &[usize], config: &ContyConfig) -> Result<WalkReport> {
    let id = pack_id(folder)?;
    let root = folder
        .parent()
        .ok_or_else(|| CliError::InvalidPack(folder.display().to_string()))?;

    let factory = DryRunFactory::default();
    let cursor = factory.cursor();
    let mut engine = NavigationEngine::new(
        Arc::new(FolderPackRepository::new(root)),
        Arc::new(factory),
        config.navigation.clone(),
    );

    let mut report = WalkReport::default();
    let started = engine.start_pack(&id).await;
    report.record(&mut engine);
    if let Err(err) = started {
        // A pack that never opened is an error, not a walk
        if !report.opened {
            return Err(err.into());
        }
        return Ok(report);
    }

    let mut choices = choices.iter().copied();
    let mut budget = config.walk.max_steps;
    while engine.is_active() {
        if budget == 0 {
            warn!(pack = %id, "Walk step budget exhausted");
            report.exhausted = true;
            break;
        }
        budget -= 1;

        if cursor.finish() {
            if let Err(err) = engine.pump() {
                debug!(%err, "Session ended while applying segment end");
            }
        } else {
            let Some(choice) = choices.next() else {
                break;
            };
            engine.select(choice)?;
            report.record(&mut engine);
            if let Err(err) = engine.advance_ok() {
                debug!(%err, "Session ended on confirm");
            }
        }
        report.record(&mut engine);
    }

    engine.stop(false).await?;
    report.record(&mut engine);
    Ok(report)
}

impl fmt::Display for WalkReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.played.iter().enumerate() {
            match &stage.name {
                Some(name) => writeln!(f, "{:>3}. {} ({name})", i + 1, stage.uuid)?,
                None => writeln!(f, "{:>3}. {}", i + 1, stage.uuid)?,
            }
        }
        for failure in &self.failures {
            writeln!(f, "  playback failed: {failure}")?;
        }
        if let Some(reason) = &self.aborted {
            writeln!(f, "  session aborted: {reason}")?;
        }
        if self.exhausted {
            writeln!(f, "  stopped: step budget exhausted")?;
        }
        Ok(())
    }
}
