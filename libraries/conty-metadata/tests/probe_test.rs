//! Integration tests for duration probing against real files

use conty_core::{ContyError, DurationProbe};
use conty_metadata::{read_duration_ms, LoftyDurationProbe};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ===== Test Helpers =====

/// Write a silent 8 kHz mono 8-bit PCM wave file
fn write_wav(path: &Path, millis: u32) {
    let sample_rate: u32 = 8_000;
    let data_len = sample_rate * millis / 1000;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&sample_rate.to_le_bytes());
    bytes.extend_from_slice(&sample_rate.to_le_bytes()); // byte rate
    bytes.extend_from_slice(&1u16.to_le_bytes()); // block align
    bytes.extend_from_slice(&8u16.to_le_bytes()); // bits per sample
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0x80);

    fs::write(path, bytes).unwrap();
}

// ===== Probing =====

#[test]
fn test_reads_wave_duration() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("tone.wav");
    write_wav(&path, 1500);

    let millis = read_duration_ms(&path).unwrap();
    assert!((1490..=1510).contains(&millis), "got {millis} ms");
}

#[test]
fn test_probe_resolves_against_audio_dir() {
    let dir = TempDir::new().unwrap();
    let assets = dir.path().join("assets");
    fs::create_dir(&assets).unwrap();
    write_wav(&assets.join("tale.wav"), 2000);

    let probe = LoftyDurationProbe::new(&assets);
    let millis = probe.probe_duration("tale.wav").unwrap();
    assert!((1990..=2010).contains(&millis), "got {millis} ms");
}

#[test]
fn test_missing_asset_maps_to_not_found() {
    let dir = TempDir::new().unwrap();
    let probe = LoftyDurationProbe::new(dir.path());

    let err = probe.probe_duration("missing.mp3").unwrap_err();
    assert!(matches!(err, ContyError::NotFound { .. }));
}

#[test]
fn test_garbage_file_is_metadata_error() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("broken.mp3"), b"definitely not audio").unwrap();
    let probe = LoftyDurationProbe::new(dir.path());

    let err = probe.probe_duration("broken.mp3").unwrap_err();
    assert!(matches!(err, ContyError::Metadata(_)));
}
