//! Command loop driving a navigation engine on its own task

use super::NavigationEngine;
use crate::error::{PlaybackError, Result};
use crate::events::NavigationEvent;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Commands sent to the navigation task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationCommand {
    /// Open a pack, replacing the current one
    StartPack(String),

    /// Stop the current pack, then open another one
    SwitchPack { pack_id: String, fade: bool },

    /// Stop the current pack
    Stop { fade: bool },

    /// Select a candidate of the current stage set
    Select(usize),

    /// OK button
    AdvanceOk,

    /// Home button
    AdvanceHome,

    Pause,

    Resume,

    TogglePlayState,

    /// Seek to position (in milliseconds)
    Seek(u64),

    /// Play files outside of stage navigation
    PlayAudios { files: Vec<String>, looping: bool },

    /// Stop without fade and end the task
    Shutdown,
}

/// Host side of a spawned engine
pub struct NavigationHandle {
    commands: mpsc::UnboundedSender<NavigationCommand>,
    events: mpsc::UnboundedReceiver<NavigationEvent>,
    task: JoinHandle<()>,
}

impl NavigationHandle {
    /// Send command to the navigation task
    pub fn send_command(&self, command: NavigationCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PlaybackError::player("Navigation task has stopped"))
    }

    /// Try to receive next event (non-blocking)
    pub fn try_recv_event(&mut self) -> Option<NavigationEvent> {
        self.events.try_recv().ok()
    }

    /// Receive next event, `None` once the task has ended
    pub async fn recv_event(&mut self) -> Option<NavigationEvent> {
        self.events.recv().await
    }

    /// Ask the task to shut down and wait for it
    pub async fn shutdown(self) {
        self.commands.send(NavigationCommand::Shutdown).ok();
        if let Err(err) = self.task.await {
            warn!(%err, "Navigation task ended abnormally");
        }
    }
}

impl NavigationEngine {
    /// Move the engine onto a tokio task
    pub fn spawn(self) -> NavigationHandle {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(self.run(command_rx, event_tx));
        NavigationHandle {
            commands: command_tx,
            events: event_rx,
            task,
        }
    }

    /// Serve commands and player reports until shutdown
    ///
    /// While a fade-out runs, pack requests are queued as the pack to open
    /// next, a stop clears that queue and commands aimed at the fading
    /// session are dropped.
    pub async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<NavigationCommand>,
        events: mpsc::UnboundedSender<NavigationEvent>,
    ) {
        info!("Navigation task started");

        loop {
            let command = tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => command,
                    None => break,
                },
                Some(signal) = self.signals.recv() => {
                    if let Err(err) = self.handle_signal(signal) {
                        warn!(%err, "Player report failed the session");
                    }
                    self.flush(&events);
                    continue;
                }
            };

            debug!(?command, "Navigation command");
            let shutdown = match command {
                NavigationCommand::Shutdown => break,
                NavigationCommand::Stop { fade } => self.stop_accepting(fade, &mut commands).await,
                NavigationCommand::SwitchPack { pack_id, fade } => {
                    self.pending_next = Some(pack_id);
                    self.stop_accepting(fade, &mut commands).await
                }
                command => {
                    if let Err(err) = self.execute(command).await {
                        warn!(%err, "Navigation command failed");
                    }
                    false
                }
            };
            self.flush(&events);
            if shutdown {
                break;
            }
        }

        self.pending_next = None;
        if let Err(err) = self.stop(false).await {
            warn!(%err, "Stop on shutdown failed");
        }
        self.flush(&events);
        info!("Navigation task stopped");
    }

    /// Apply one command directly
    pub async fn execute(&mut self, command: NavigationCommand) -> Result<()> {
        match command {
            NavigationCommand::StartPack(pack_id) => self.start_pack(&pack_id).await,
            NavigationCommand::SwitchPack { pack_id, fade } => {
                self.switch_pack(&pack_id, fade).await
            }
            NavigationCommand::Stop { fade } => self.stop(fade).await,
            NavigationCommand::Select(index) => self.select(index),
            NavigationCommand::AdvanceOk => self.advance_ok(),
            NavigationCommand::AdvanceHome => self.advance_home(),
            NavigationCommand::Pause => {
                self.pause();
                Ok(())
            }
            NavigationCommand::Resume => {
                self.resume();
                Ok(())
            }
            NavigationCommand::TogglePlayState => {
                self.toggle_play_state();
                Ok(())
            }
            NavigationCommand::Seek(position_ms) => {
                self.seek(position_ms);
                Ok(())
            }
            NavigationCommand::PlayAudios { files, looping } => self.play_audios(files, looping),
            NavigationCommand::Shutdown => Ok(()),
        }
    }

    /// Stop while still reading commands, returns true on shutdown
    async fn stop_accepting(
        &mut self,
        fade: bool,
        commands: &mut mpsc::UnboundedReceiver<NavigationCommand>,
    ) -> bool {
        let mut shutdown = false;
        if fade && self.resource.is_playing() {
            let mut tween = self.fade_out();
            let mut accepting = true;
            while !shutdown {
                tokio::select! {
                    gain = tween.next_gain() => match gain {
                        Some(gain) => self.resource.set_volume(gain),
                        None => break,
                    },
                    command = commands.recv(), if accepting => match command {
                        Some(NavigationCommand::StartPack(pack_id))
                        | Some(NavigationCommand::SwitchPack { pack_id, .. }) => {
                            debug!(pack = %pack_id, "Queued pack during fade-out");
                            self.pending_next = Some(pack_id);
                        }
                        Some(NavigationCommand::Stop { .. }) => {
                            if let Some(pack_id) = self.pending_next.take() {
                                debug!(pack = %pack_id, "Queued pack cancelled by stop");
                            }
                        }
                        Some(NavigationCommand::Shutdown) => {
                            self.pending_next = None;
                            shutdown = true;
                        }
                        Some(command) => debug!(?command, "Dropped command for fading session"),
                        None => accepting = false,
                    },
                }
            }
        }
        if let Err(err) = self.finish_stop().await {
            warn!(%err, "Queued pack failed to start");
        }
        shutdown
    }

    fn flush(&mut self, events: &mpsc::UnboundedSender<NavigationEvent>) {
        for event in self.drain_events() {
            events.send(event).ok();
        }
    }
}
