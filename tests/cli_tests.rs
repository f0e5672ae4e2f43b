//! End-to-end tests of the `meteor-align` binary.

use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn meteor_align() -> Command {
    Command::cargo_bin("meteor-align").unwrap()
}

fn lines_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_score_text() {
    meteor_align()
        .args([
            "score",
            "Die Katze sitzt auf dem Dach.",
            "Auf dem Dach sitzt die Katze.",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("METEOR score: 0.90"))
        .stdout(predicate::str::contains("Chunks: 4"));
}

#[test]
fn test_score_json() {
    let output = meteor_align()
        .args(["score", "Frau Frauen", "Frau Frau", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["matches"], 2);
    assert_eq!(json["chunks"], 1);
    assert_eq!(json["method"], "exact");
    assert!((json["score"].as_f64().unwrap() - 1.0).abs() < 1e-9);
}

#[test]
fn test_score_tsv() {
    meteor_align()
        .args(["--format", "tsv", "score", "Haus Kind", "Frau Mann"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("score\tmatches"))
        .stdout(predicate::str::contains("0.0000\t0\t2\t2\t0"));
}

#[test]
fn test_align_json() {
    let output = meteor_align()
        .args(["align", "Frau Mann", "Frau Frau", "-f", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let pairs = json["pairs"].as_array().unwrap();
    assert_eq!(pairs.len(), 1);
    assert_eq!(pairs[0]["hypothesis"], 0);
    assert_eq!(pairs[0]["reference"], 0);
    assert_eq!(pairs[0]["hypothesis_text"], "Frau");
}

#[test]
fn test_align_text_unmatched() {
    meteor_align()
        .args(["align", "Frau Mann", "Frau Frau", "--show-unmatched"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 matches in 1 chunks"))
        .stdout(predicate::str::contains("Unmatched hypothesis tokens: Mann"));
}

#[test]
fn test_corpus_macro_average() {
    let hyps = lines_file(&["Frau Frauen", "Haus Kind"]);
    let refs = lines_file(&["Frau Frau", "Frau Mann"]);

    meteor_align()
        .arg("corpus")
        .arg("-H")
        .arg(hyps.path())
        .arg("-r")
        .arg(refs.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("METEOR macro average: 0.500"));
}

#[test]
fn test_corpus_length_mismatch() {
    let hyps = lines_file(&["Frau Frauen", "Haus Kind", "Boot"]);
    let refs = lines_file(&["Frau Frau"]);

    meteor_align()
        .arg("corpus")
        .arg("-H")
        .arg(hyps.path())
        .arg("-r")
        .arg(refs.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("differ in length"));
}

#[test]
fn test_config_file() {
    let mut config = NamedTempFile::new().unwrap();
    write!(
        config,
        r#"{{"locale": "english", "stages": [{{"kind": "identity", "weight": 1.0}}]}}"#
    )
    .unwrap();
    config.flush().unwrap();

    // Without a stemming stage the inflected form no longer matches
    meteor_align()
        .arg("--config")
        .arg(config.path())
        .args(["score", "cats sleep", "cat sleep", "-f", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\t1\t2\t2\t1\t"));
}

#[test]
fn test_invalid_config() {
    let mut config = NamedTempFile::new().unwrap();
    write!(config, r#"{{"stages": [{{"kind": "identity", "weight": 2.0}}]}}"#).unwrap();
    config.flush().unwrap();

    meteor_align()
        .arg("--config")
        .arg(config.path())
        .args(["score", "a", "a"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid stage weight"));
}
