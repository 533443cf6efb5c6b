mod common;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use common::{synthetic_message, HEIGHT, IMAGES};

fn cmd() -> Command {
    cargo_bin_cmd!("seti-decoder")
}

fn warm_cache(dir: &Path) -> PathBuf {
    let cache = dir.join("message.txt");
    fs::write(&cache, synthetic_message()).unwrap();
    cache
}

#[test]
fn inspect_json_reports_height_and_count() {
    let tmp = TempDir::new().unwrap();
    let cache = warm_cache(tmp.path());

    let out = cmd()
        .args(["inspect", "--json", "--cache"])
        .arg(&cache)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(report["image_height"], HEIGHT);
    assert_eq!(report["num_images"], IMAGES);
    assert_eq!(report["dropped_rows"], 0);
    assert_eq!(report["images"][0]["row1Binary"], "1011");
    assert_eq!(report["images"][0]["row1BinaryIdx"], 10);
}

#[test]
fn inspect_text_lists_images() {
    let tmp = TempDir::new().unwrap();
    let cache = warm_cache(tmp.path());

    cmd()
        .args(["inspect", "--cache"])
        .arg(&cache)
        .assert()
        .success()
        .stdout(contains("Image height: 757"))
        .stdout(contains("Image6"))
        .stdout(contains("1011 @10"));
}

#[test]
fn run_writes_one_png_per_image() {
    let tmp = TempDir::new().unwrap();
    let cache = warm_cache(tmp.path());
    let out_dir = tmp.path().join("images");

    cmd()
        .args(["run", "--cache"])
        .arg(&cache)
        .arg("--output-dir")
        .arg(&out_dir)
        .assert()
        .success()
        .stdout(contains("Images: 7"));

    for i in 0..IMAGES {
        assert!(out_dir.join(format!("img{}.png", i)).exists());
    }
    assert!(!out_dir.join(format!("img{}.png", IMAGES)).exists());
}

#[test]
fn run_dumps_matrices_and_stores_records() {
    let tmp = TempDir::new().unwrap();
    let cache = warm_cache(tmp.path());
    let matrices = tmp.path().join("matrices");
    let store = tmp.path().join("images.json");

    cmd()
        .args(["run", "--no-save", "--cache"])
        .arg(&cache)
        .arg("--dump-matrices")
        .arg(&matrices)
        .arg("--store")
        .arg(&store)
        .assert()
        .success()
        .stdout(contains("Stored records: 7"));

    let dump = fs::read_to_string(matrices.join("matrix0.txt")).unwrap();
    assert_eq!(dump.lines().count(), HEIGHT);

    let stored: Value = serde_json::from_str(&fs::read_to_string(&store).unwrap()).unwrap();
    assert_eq!(stored["images"].as_array().unwrap().len(), IMAGES);
}

#[test]
fn bad_shape_fails_cleanly() {
    let tmp = TempDir::new().unwrap();
    let cache = tmp.path().join("message.txt");
    fs::write(&cache, "0101010").unwrap();

    cmd()
        .args(["inspect", "--cache"])
        .arg(&cache)
        .assert()
        .failure()
        .stderr(contains("cannot be reshaped"));
}

#[test]
fn unreachable_source_fails_without_cache() {
    let tmp = TempDir::new().unwrap();
    let cache = tmp.path().join("message.txt");

    cmd()
        .args(["fetch", "--url", "http://127.0.0.1:9/SETI_message.txt", "--cache"])
        .arg(&cache)
        .assert()
        .failure()
        .stderr(contains("Failed to fetch message"));

    assert!(!cache.exists());
}
