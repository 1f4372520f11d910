//! Integration tests for the CLI commands against pack folders on disk

use conty_cli::commands::{self, HomeRepair};
use conty_cli::ContyConfig;
use conty_core::graph::RepairOutcome;
use conty_core::{PackKind, Transition};
use conty_stories::ExtractOptions;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

// ===== Test Helpers =====

/// start -> menu[optA, optB]; optA -> storyA -> end; optB -> storyB
const MENU_PACK: &str = r#"{
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
          "duration": 65000,
          "controlSettings": { "home": true, "pause": true, "autoplay": true },
          "okTransition": { "actionNode": "to-end", "optionIndex": 0 } },
        { "uuid": "storyB", "type": "story", "name": "Story B", "audio": "storyB.mp3",
          "duration": 30000,
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

const AUDIO: [&str; 6] = [
    "start.mp3",
    "optA.mp3",
    "optB.mp3",
    "storyA.mp3",
    "storyB.mp3",
    "end.mp3",
];

/// Write the menu pack; audio files are empty placeholders
fn write_menu_pack(root: &Path, id: &str, audio: &[&str]) -> PathBuf {
    let folder = root.join(id);
    fs::create_dir_all(folder.join("assets")).unwrap();
    fs::write(folder.join("story.json"), MENU_PACK).unwrap();
    for file in audio {
        fs::write(folder.join("assets").join(file), b"").unwrap();
    }
    folder
}

fn played(report: &commands::WalkReport) -> Vec<&str> {
    report.played.iter().map(|stage| stage.uuid.as_str()).collect()
}

// ===== Inspect =====

#[tokio::test]
async fn test_inspect_reports_structure_and_repairs() {
    let root = TempDir::new().unwrap();
    let folder = write_menu_pack(root.path(), "forest", &AUDIO);

    let report = commands::inspect(&folder).await.unwrap();

    assert_eq!(report.id, "forest");
    assert_eq!(report.kind, PackKind::Studio);
    assert_eq!(report.title, "Forest Tales");
    assert_eq!(report.stages, 6);
    assert_eq!(report.actions, 4);
    assert_eq!(report.start, "start");
    assert_eq!(
        report.home_repairs,
        vec![
            HomeRepair {
                stage: "storyA".into(),
                outcome: RepairOutcome::Repaired(Transition::action("menu", Some(0))),
            },
            HomeRepair {
                stage: "storyB".into(),
                outcome: RepairOutcome::Repaired(Transition::action("menu", Some(1))),
            },
            HomeRepair {
                stage: "end".into(),
                outcome: RepairOutcome::Unavailable,
            },
        ]
    );

    let text = report.to_string();
    assert!(text.contains("storyB: repaired -> menu[1]"));
    assert!(text.contains("end: not repairable"));
}

#[tokio::test]
async fn test_inspect_unknown_folder_fails() {
    let root = TempDir::new().unwrap();
    assert!(commands::inspect(&root.path().join("ghost")).await.is_err());
}

// ===== Stories =====

#[tokio::test]
async fn test_stories_follow_menu_branches() {
    let root = TempDir::new().unwrap();
    let folder = write_menu_pack(root.path(), "forest", &AUDIO);

    let report = commands::stories(&folder, &ExtractOptions::default())
        .await
        .unwrap();

    let names: Vec<&str> = report.stories.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["Story A", "Story B"]);
    assert_eq!(report.stories[0].duration_ms, 65_000);
    assert!(report.to_string().contains("Story A [1:05]"));
}

// ===== List =====

#[tokio::test]
async fn test_list_finds_packs() {
    let root = TempDir::new().unwrap();
    write_menu_pack(root.path(), "b-forest", &[]);
    write_menu_pack(root.path(), "a-forest", &[]);

    let packs = commands::list(root.path()).await.unwrap();
    let ids: Vec<&str> = packs.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["a-forest", "b-forest"]);
}

// ===== Walk =====

#[tokio::test]
async fn test_walk_first_choice_autoplays_to_the_end() {
    let root = TempDir::new().unwrap();
    let folder = write_menu_pack(root.path(), "forest", &AUDIO);

    let report = commands::walk(&folder, &[0], &ContyConfig::default())
        .await
        .unwrap();

    assert_eq!(played(&report), vec!["optA", "storyA", "end"]);
    assert!(report.failures.is_empty());
    assert!(report.aborted.is_none());
    assert!(!report.exhausted);
}

#[tokio::test]
async fn test_walk_second_choice() {
    let root = TempDir::new().unwrap();
    let folder = write_menu_pack(root.path(), "forest", &AUDIO);

    let report = commands::walk(&folder, &[1], &ContyConfig::default())
        .await
        .unwrap();

    assert_eq!(played(&report), vec!["optA", "optB", "storyB"]);
    assert_eq!(report.played[0].name.as_deref(), Some("Choose A"));
}

#[tokio::test]
async fn test_walk_reports_missing_audio() {
    let root = TempDir::new().unwrap();
    let folder = write_menu_pack(
        root.path(),
        "forest",
        &["start.mp3", "optA.mp3", "optB.mp3", "storyB.mp3", "end.mp3"],
    );

    let report = commands::walk(&folder, &[0], &ContyConfig::default())
        .await
        .unwrap();

    assert_eq!(played(&report), vec!["optA"]);
    assert_eq!(report.failures.len(), 1);
    assert!(report.failures[0].contains("storyA.mp3"));
}

#[tokio::test]
async fn test_walk_out_of_range_choice_is_an_error() {
    let root = TempDir::new().unwrap();
    let folder = write_menu_pack(root.path(), "forest", &AUDIO);

    assert!(commands::walk(&folder, &[5], &ContyConfig::default())
        .await
        .is_err());
}

#[tokio::test]
async fn test_walk_of_missing_pack_is_an_error() {
    let root = TempDir::new().unwrap();
    let folder = root.path().join("ghost");
    fs::create_dir_all(&folder).unwrap();

    assert!(commands::walk(&folder, &[0], &ContyConfig::default())
        .await
        .is_err());
}

#[tokio::test]
async fn test_walk_respects_step_budget() {
    let root = TempDir::new().unwrap();
    let folder = write_menu_pack(root.path(), "forest", &AUDIO);
    let mut config = ContyConfig::default();
    config.walk.max_steps = 1;

    let report = commands::walk(&folder, &[0], &config).await.unwrap();

    assert!(report.exhausted);
    assert_eq!(played(&report), vec!["optA"]);
}
