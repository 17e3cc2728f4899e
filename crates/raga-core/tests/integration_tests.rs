//! End-to-end tests on synthesized recordings

use raga_core::{
    analyze_file, AnalysisConfig, Analyzer, Catalogue, RagaError, SwaraIndex, Tonic,
};
use std::f32::consts::PI;
use std::path::Path;

const SR: u32 = 22050;

/// Cents of Sa, R2, G3, Pa, D2
const MOHANAM: [f32; 5] = [0.0, 203.05, 386.31, 701.96, 1018.0];

fn tone(freq: f32, seconds: f32) -> Vec<f32> {
    let n = (SR as f32 * seconds) as usize;
    (0..n)
        .map(|i| 0.5 * (2.0 * PI * freq * i as f32 / SR as f32).sin())
        .collect()
}

fn silence(seconds: f32) -> Vec<f32> {
    vec![0.0; (SR as f32 * seconds) as usize]
}

/// Long Sa, each swara of the phrase, long Sa; notes separated by rests
fn phrase(tonic_hz: f32, cents: &[f32]) -> Vec<f32> {
    let mut signal = tone(tonic_hz, 1.2);
    for &c in &cents[1..] {
        signal.extend(silence(0.2));
        signal.extend(tone(tonic_hz * 2f32.powf(c / 1200.0), 0.5));
    }
    signal.extend(silence(0.2));
    signal.extend(tone(tonic_hz, 1.2));
    signal
}

fn write_wav(path: &Path, samples: &[f32]) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SR,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    for &s in samples {
        writer.write_sample((s * 32767.0) as i16).unwrap();
    }
    writer.finalize().unwrap();
}

/// Ragas that never contain Mohanam as a subset, with Mohanam first
fn catalogue() -> Catalogue {
    Catalogue::from_json_str(
        r#"{
            "Mohanam": [0, 2, 4, 7, 9],
            "Hamsadhwani": [0, 2, 4, 7, 11],
            "Hindolam": [0, 3, 5, 8, 10],
            "Madhyamavati": [0, 2, 5, 7, 10],
            "Shivaranjani": [0, 2, 3, 7, 9]
        }"#,
    )
    .unwrap()
}

fn contains_all(present: &raga_core::SwaraSet, indices: &[usize]) -> bool {
    indices
        .iter()
        .all(|&i| present.contains(SwaraIndex::new(i).unwrap()))
}

#[test]
fn test_identifies_mohanam_from_samples() {
    let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
    let signal = phrase(220.0, &MOHANAM);

    let analysis = analyzer.analyze_samples(&signal, SR, None, &catalogue()).unwrap();

    assert!((analysis.tonic_hz - 220.0).abs() < 2.0, "tonic {}", analysis.tonic_hz);
    assert!(contains_all(&analysis.present, &[0, 2, 4, 7, 9]), "{:?}", analysis.present);
    assert_eq!(analysis.matches.len(), 3);
    assert_eq!(analysis.matches[0].raga, "Mohanam");
    assert!(analysis
        .matches
        .windows(2)
        .all(|w| w[0].score <= w[1].score));
}

#[test]
fn test_identifies_mohanam_from_wav_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mohanam.wav");
    write_wav(&path, &phrase(196.0, &MOHANAM));

    let report = analyze_file(&path, None, &catalogue()).unwrap();

    assert_eq!(report.status, "success");
    assert!(!report.empty_trajectory);
    assert_eq!(report.matched_ragas[0].raga, "Mohanam");
    for i in [0, 2, 4, 7, 9] {
        assert!(report.swara_indices_present.contains(&i));
    }
    let tonic: f64 = report.tonic_hz_used.parse().unwrap();
    assert!((tonic - 196.0).abs() < 2.0);
}

#[test]
fn test_tonic_override_is_octave_invariant() {
    let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
    // sung an octave above the stated tonic
    let signal = phrase(440.0, &MOHANAM);
    let tonic = Tonic::parse("220").unwrap();

    let analysis = analyzer
        .analyze_samples(&signal, SR, Some(tonic), &catalogue())
        .unwrap();

    assert_eq!(analysis.tonic_hz, 220.0);
    assert!(contains_all(&analysis.present, &[0, 2, 4, 7, 9]));
    assert_eq!(analysis.matches[0].raga, "Mohanam");
}

#[test]
fn test_silent_recording_is_empty_not_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("silence.wav");
    write_wav(&path, &silence(2.0));

    let report = analyze_file(&path, None, &catalogue()).unwrap();

    assert!(report.empty_trajectory);
    assert_eq!(report.tonic_hz_used, "0.00");
    assert!(report.swara_indices_present.is_empty());
    // five-swara ragas all score 5; catalogue order decides
    let names: Vec<_> = report.matched_ragas.iter().map(|m| m.raga.as_str()).collect();
    assert_eq!(names, vec!["Mohanam", "Hamsadhwani", "Hindolam"]);
    assert!(report.matched_ragas.iter().all(|m| m.score == 5));
}

#[test]
fn test_empty_catalogue_still_reports_swaras() {
    let analyzer = Analyzer::new(AnalysisConfig::default()).unwrap();
    let analysis = analyzer
        .analyze_samples(&phrase(220.0, &MOHANAM), SR, None, &Catalogue::empty())
        .unwrap();
    assert!(analysis.matches.is_empty());
    assert!(contains_all(&analysis.present, &[0, 2, 4, 7, 9]));
}

#[test]
fn test_unreadable_audio_is_decode_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.wav");
    std::fs::write(&path, b"RIFF....not a wav").unwrap();

    assert!(matches!(
        analyze_file(&path, None, &catalogue()),
        Err(RagaError::Decode(_))
    ));
}
