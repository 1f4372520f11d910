//! Test helpers and fixtures for navigation tests
//!
//! The mock player, factory and repository all append to one shared
//! timeline so tests can assert on the relative order of side effects.

#![allow(dead_code)]

use async_trait::async_trait;
use conty_core::graph::StageGraph;
use conty_core::{ContyError, LoadedPack, Pack, PackKind, PackRepository};
use conty_playback::{
    AudioPlayer, NavigationConfig, NavigationEngine, NavigationEvent, PlaybackError,
    PlayerFactory, PlayerSignal, Result, SegmentToken, SignalSender,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

// ===== Fixtures =====

/// start -> menu[optA, optB]; optA -> storyA -> end; optB -> storyB
///
/// storyA autoplays into `end`; both stories flag home without a home
/// transition, `end` flags home but cannot be repaired.
pub const MENU_PACK: &str = r#"{
    "title": "Forest Tales",
    "description": "Bedtime stories",
    "stageNodes": [
        { "uuid": "start", "squareOne": true, "audio": "start.mp3",
          "okTransition": { "actionNode": "menu", "optionIndex": -1 } },
        { "uuid": "optA", "type": "menu.optionstage", "name": "Choose A", "audio": "optA.mp3",
          "controlSettings": { "wheel": true, "ok": true },
          "okTransition": { "actionNode": "to-a", "optionIndex": 0 } },
        { "uuid": "optB", "type": "menu.optionstage", "name": "Choose B", "audio": "optB.mp3",
          "controlSettings": { "wheel": true, "ok": true },
          "okTransition": { "actionNode": "to-b", "optionIndex": 0 } },
        { "uuid": "storyA", "type": "story", "name": "Story A", "audio": "storyA.mp3",
          "controlSettings": { "home": true, "pause": true, "autoplay": true },
          "okTransition": { "actionNode": "to-end", "optionIndex": 0 } },
        { "uuid": "storyB", "type": "story", "name": "Story B", "audio": "storyB.mp3",
          "controlSettings": { "home": true, "pause": true } },
        { "uuid": "end", "audio": "end.mp3", "controlSettings": { "home": true } }
    ],
    "actionNodes": [
        { "id": "menu", "options": ["optA", "optB"] },
        { "id": "to-a", "options": ["storyA"] },
        { "id": "to-b", "options": ["storyB"] },
        { "id": "to-end", "options": ["end"] }
    ]
}"#;

/// start -> bridge (no audio) -> tale
pub const BRIDGE_PACK: &str = r#"{
    "title": "Bridge",
    "stageNodes": [
        { "uuid": "start", "squareOne": true, "audio": "start.mp3",
          "okTransition": { "actionNode": "a1" } },
        { "uuid": "bridge", "okTransition": { "actionNode": "a2" } },
        { "uuid": "tale", "type": "story", "audio": "tale.mp3" }
    ],
    "actionNodes": [
        { "id": "a1", "options": ["bridge"] },
        { "id": "a2", "options": ["tale"] }
    ]
}"#;

/// Second stage's audio cannot be opened
pub const GLITCH_PACK: &str = r#"{
    "title": "Glitch",
    "stageNodes": [
        { "uuid": "start", "squareOne": true, "audio": "start.mp3",
          "okTransition": { "actionNode": "a1" } },
        { "uuid": "tale", "type": "story", "audio": "broken-tale.mp3",
          "controlSettings": { "autoplay": true },
          "okTransition": { "actionNode": "a2" } },
        { "uuid": "end", "audio": "end.mp3" }
    ],
    "actionNodes": [
        { "id": "a1", "options": ["tale"] },
        { "id": "a2", "options": ["end"] }
    ]
}"#;

/// Start stage points at an option that does not exist
pub const DANGLING_PACK: &str = r#"{
    "stageNodes": [
        { "uuid": "start", "squareOne": true, "audio": "start.mp3",
          "okTransition": { "actionNode": "menu" } }
    ],
    "actionNodes": [ { "id": "menu", "options": ["ghost"] } ]
}"#;

/// Two audio-less stages pointing at each other
pub const LOOP_PACK: &str = r#"{
    "stageNodes": [
        { "uuid": "start", "squareOne": true, "audio": "start.mp3",
          "okTransition": { "actionNode": "x" } },
        { "uuid": "s1", "okTransition": { "actionNode": "y" } },
        { "uuid": "s2", "okTransition": { "actionNode": "x" } }
    ],
    "actionNodes": [
        { "id": "x", "options": ["s1"] },
        { "id": "y", "options": ["s2"] }
    ]
}"#;

/// Single long stage, used as the "other" pack in switch tests
pub const SECOND_PACK: &str = r#"{
    "title": "Second",
    "stageNodes": [
        { "uuid": "start", "squareOne": true, "audio": "start.mp3",
          "okTransition": { "actionNode": "a1" } },
        { "uuid": "tale", "type": "story", "audio": "second.mp3" }
    ],
    "actionNodes": [ { "id": "a1", "options": ["tale"] } ]
}"#;

// ===== Recorder =====

/// Everything the mocks observed
#[derive(Default)]
pub struct Recorder {
    pub timeline: Vec<String>,
    /// Every play request with its token, oldest first
    pub plays: Vec<(String, SegmentToken)>,
    pub volumes: Vec<f32>,
    pub players_created: usize,
    /// Reported by the mock player as the segment length
    pub duration_ms: u64,
    signals: Option<SignalSender>,
}

pub type Shared = Arc<Mutex<Recorder>>;

pub fn timeline(shared: &Shared) -> Vec<String> {
    shared.lock().unwrap().timeline.clone()
}

pub fn position(shared: &Shared, entry: &str) -> usize {
    timeline(shared)
        .iter()
        .position(|e| e == entry)
        .unwrap_or_else(|| panic!("{entry} not in timeline"))
}

pub fn count(shared: &Shared, entry: &str) -> usize {
    timeline(shared).iter().filter(|e| *e == entry).count()
}

/// Token of the latest play request for `file`
pub fn token_of(shared: &Shared, file: &str) -> SegmentToken {
    shared
        .lock()
        .unwrap()
        .plays
        .iter()
        .rev()
        .find(|(f, _)| f == file)
        .map(|(_, token)| *token)
        .unwrap_or_else(|| panic!("{file} never played"))
}

pub fn send(shared: &Shared, signal: PlayerSignal) {
    let recorder = shared.lock().unwrap();
    recorder
        .signals
        .as_ref()
        .expect("no player created")
        .send(signal)
        .unwrap();
}

/// Report the latest play request for `file` as finished
pub fn complete(shared: &Shared, file: &str) {
    let token = token_of(shared, file);
    send(shared, PlayerSignal::Completed(token));
}

// ===== Mock Player =====

pub struct MockPlayer {
    shared: Shared,
}

impl AudioPlayer for MockPlayer {
    fn play(&mut self, path: &Path, _looping: bool, token: SegmentToken) -> Result<()> {
        let file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if file.starts_with("broken") {
            return Err(PlaybackError::player(format!("cannot open {file}")));
        }
        let mut recorder = self.shared.lock().unwrap();
        recorder.timeline.push(format!("play:{file}"));
        recorder.plays.push((file, token));
        Ok(())
    }

    fn stop(&mut self) {
        self.shared.lock().unwrap().timeline.push("stop".into());
    }

    fn pause(&mut self) {
        self.shared.lock().unwrap().timeline.push("pause".into());
    }

    fn resume(&mut self) {
        self.shared.lock().unwrap().timeline.push("resume".into());
    }

    fn seek(&mut self, position_ms: u64) {
        self.shared
            .lock()
            .unwrap()
            .timeline
            .push(format!("seek:{position_ms}"));
    }

    fn set_volume(&mut self, volume: f32) {
        let mut recorder = self.shared.lock().unwrap();
        recorder.volumes.push(volume);
        if volume == 0.0 {
            recorder.timeline.push("silent".into());
        }
    }

    fn dispose(&mut self) {
        self.shared.lock().unwrap().timeline.push("dispose".into());
    }

    fn current_time_ms(&self) -> u64 {
        0
    }

    fn duration_ms(&self) -> u64 {
        self.shared.lock().unwrap().duration_ms
    }
}

pub struct MockFactory {
    shared: Shared,
}

impl PlayerFactory for MockFactory {
    fn create(&self, pack: &Pack, signals: SignalSender) -> Box<dyn AudioPlayer> {
        let mut recorder = self.shared.lock().unwrap();
        recorder.players_created += 1;
        recorder.timeline.push(format!("create:{}", pack.id));
        recorder.signals = Some(signals);
        Box::new(MockPlayer {
            shared: self.shared.clone(),
        })
    }
}

// ===== Mock Repository =====

pub struct MockRepository {
    shared: Shared,
    packs: HashMap<String, &'static str>,
}

impl MockRepository {
    pub fn new(shared: Shared) -> Self {
        let packs = [
            ("menu", MENU_PACK),
            ("bridge", BRIDGE_PACK),
            ("glitch", GLITCH_PACK),
            ("dangling", DANGLING_PACK),
            ("loop", LOOP_PACK),
            ("second", SECOND_PACK),
            ("third", SECOND_PACK),
        ]
        .into_iter()
        .map(|(id, json)| (id.to_string(), json))
        .collect();
        Self { shared, packs }
    }
}

#[async_trait]
impl PackRepository for MockRepository {
    async fn load_pack(&self, pack_id: &str) -> conty_core::Result<LoadedPack> {
        self.shared
            .lock()
            .unwrap()
            .timeline
            .push(format!("load:{pack_id}"));
        let json = self
            .packs
            .get(pack_id)
            .ok_or_else(|| ContyError::not_found("pack", pack_id))?;
        let (metadata, graph) = StageGraph::from_studio_json(json)?;
        Ok(LoadedPack {
            pack: Pack::new(pack_id, PackKind::Studio, format!("/packs/{pack_id}"), metadata),
            graph,
        })
    }

    fn release_pack(&self, pack: &Pack) {
        self.shared
            .lock()
            .unwrap()
            .timeline
            .push(format!("release:{}", pack.id));
    }
}

// ===== Engine =====

pub fn engine_with(config: NavigationConfig) -> (NavigationEngine, Shared) {
    let shared = Shared::default();
    let engine = NavigationEngine::new(
        Arc::new(MockRepository::new(shared.clone())),
        Arc::new(MockFactory {
            shared: shared.clone(),
        }),
        config,
    );
    (engine, shared)
}

pub fn engine() -> (NavigationEngine, Shared) {
    engine_with(NavigationConfig::default())
}

pub fn current_uuid(engine: &NavigationEngine) -> String {
    engine
        .current_stage()
        .map(|stage| stage.uuid.clone())
        .unwrap_or_default()
}

pub fn count_events(events: &[NavigationEvent], wanted: fn(&NavigationEvent) -> bool) -> usize {
    events.iter().filter(|event| wanted(event)).count()
}
