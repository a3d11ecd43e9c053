// Unit tests for the finalized audio clip type
//
// These tests verify duration math, WAV encoding for upload, and reading
// clips back from disk (the fixture backend path).

use anyhow::Result;
use hound::WavReader;
use std::io::Cursor;
use su_recorder::audio::AudioClip;
use tempfile::TempDir;

#[test]
fn test_clip_duration_mono() {
    // 2 seconds at 16kHz mono
    let clip = AudioClip::from_samples(vec![0i16; 32000], 16000, 1);

    assert!((clip.duration_seconds() - 2.0).abs() < 0.001);
    assert_eq!(clip.duration_whole_seconds(), 2);
}

#[test]
fn test_clip_duration_stereo_interleaved() {
    // Stereo: samples are interleaved [L, R, L, R, ...], so 32000 samples
    // at 16kHz stereo is 1 second of audio
    let clip = AudioClip::from_samples(vec![0i16; 32000], 16000, 2);

    assert!((clip.duration_seconds() - 1.0).abs() < 0.001);
}

#[test]
fn test_clip_duration_floor_rounded() {
    // 2.9 seconds at 16kHz mono floor-rounds to 2 whole seconds
    let clip = AudioClip::from_samples(vec![0i16; 46400], 16000, 1);

    assert!((clip.duration_seconds() - 2.9).abs() < 0.001);
    assert_eq!(clip.duration_whole_seconds(), 2);
}

#[test]
fn test_empty_clip() {
    let clip = AudioClip::from_samples(Vec::new(), 16000, 1);

    assert!(clip.is_empty());
    assert_eq!(clip.duration_whole_seconds(), 0);
}

#[test]
fn test_clip_with_zero_rate_has_zero_duration() {
    let clip = AudioClip::from_samples(vec![1, 2, 3], 0, 1);

    assert_eq!(clip.duration_seconds(), 0.0);
}

#[test]
fn test_wav_encoding_round_trip() -> Result<()> {
    let samples: Vec<i16> = (0..1600).map(|i| (i % 100) as i16).collect();
    let clip = AudioClip::from_samples(samples.clone(), 16000, 1);

    let bytes = clip.to_wav_bytes()?;
    assert!(!bytes.is_empty());

    let reader = WavReader::new(Cursor::new(bytes))?;
    let spec = reader.spec();
    assert_eq!(spec.sample_rate, 16000);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);

    let decoded: Vec<i16> = reader.into_samples::<i16>().collect::<Result<Vec<_>, _>>()?;
    assert_eq!(decoded, samples);

    Ok(())
}

#[test]
fn test_clip_open_from_disk() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("fixture.wav");

    let clip = AudioClip::from_samples(vec![7i16; 8000], 16000, 1);
    std::fs::write(&path, clip.to_wav_bytes()?)?;

    let loaded = AudioClip::open(&path)?;
    assert_eq!(loaded.sample_rate, 16000);
    assert_eq!(loaded.channels, 1);
    assert_eq!(loaded.samples.len(), 8000);
    assert!((loaded.duration_seconds() - 0.5).abs() < 0.001);

    Ok(())
}

#[test]
fn test_clip_open_missing_file_fails() {
    assert!(AudioClip::open("/nonexistent/clip.wav").is_err());
}
