//! Conty - Playback and Navigation
//!
//! Live navigation through a pack's stage graph.
//!
//! This crate provides:
//! - The navigation state machine (candidate stage set, selection, ok/home)
//! - Stage-entry with pass-through of audio-less stages and home repair
//! - Autoplay on segment completion, ignoring stale player reports
//! - The audio resource lifecycle (lazy player, sequences, looping)
//! - Fade-out stop and queued pack switching
//!
//! # Architecture
//!
//! `conty-playback` never decodes audio. The host provides a
//! [`PlayerFactory`]; its players report back over a channel that the
//! engine drains on its own task, so navigation state is only ever touched
//! from one place.
//!
//! # Example: Platform Integration
//!
//! ```rust,no_run
//! use conty_core::Pack;
//! use conty_playback::{
//!     AudioPlayer, NavigationConfig, NavigationEngine, PlayerFactory, Result, SegmentToken,
//!     SignalSender,
//! };
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! struct MyPlayer {
//!     signals: SignalSender,
//!     // ... platform-specific decoder
//! }
//!
//! impl AudioPlayer for MyPlayer {
//!     fn play(&mut self, path: &Path, looping: bool, token: SegmentToken) -> Result<()> {
//!         // Start decoding; send PlayerSignal::Completed(token) at the end
//!         Ok(())
//!     }
//!     fn stop(&mut self) {}
//!     fn pause(&mut self) {}
//!     fn resume(&mut self) {}
//!     fn seek(&mut self, _position_ms: u64) {}
//!     fn set_volume(&mut self, _volume: f32) {}
//!     fn dispose(&mut self) {}
//!     fn current_time_ms(&self) -> u64 { 0 }
//!     fn duration_ms(&self) -> u64 { 0 }
//! }
//!
//! struct MyFactory;
//!
//! impl PlayerFactory for MyFactory {
//!     fn create(&self, _pack: &Pack, signals: SignalSender) -> Box<dyn AudioPlayer> {
//!         Box::new(MyPlayer { signals })
//!     }
//! }
//!
//! # async fn demo(repository: Arc<dyn conty_core::PackRepository>) -> Result<()> {
//! let mut engine =
//!     NavigationEngine::new(repository, Arc::new(MyFactory), NavigationConfig::default());
//!
//! engine.start_pack("forest-tales").await?;
//! engine.select(1)?;
//! engine.advance_ok()?;
//!
//! // Apply player reports, then forward events to the UI
//! engine.next_signal().await?;
//! for event in engine.drain_events() {
//!     println!("{event:?}");
//! }
//!
//! engine.stop(true).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod error;
pub mod events;
pub mod fade;
mod navigation;
mod player;
mod resource;
pub mod types;

// Public exports
pub use error::{PlaybackError, Result};
pub use events::NavigationEvent;
pub use fade::{FadeCurve, FadeOut};
pub use navigation::{NavigationCommand, NavigationEngine, NavigationHandle};
pub use player::{AudioPlayer, PlayerFactory, PlayerSignal, SegmentToken, SignalSender};
pub use resource::{PlaybackResource, SegmentEnd, SegmentOutcome};
pub use types::{NavigationConfig, NavigationState, PlayerState, PlayingInfo};
