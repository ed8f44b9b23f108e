//! End-to-end tests for `resize-and-crop`.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use image::{GenericImageView, Rgb, RgbImage};
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the caller's key and working directory.
fn resize_cmd(cwd: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("resize-and-crop");
    cmd.current_dir(cwd)
        .env_remove("TINYPNG_API_KEY")
        .env_remove("NO_COLOR");
    cmd
}

fn write_image(dir: &Path, name: &str, width: u32, height: u32) {
    RgbImage::from_fn(width, height, |x, y| Rgb([(x % 256) as u8, (y % 256) as u8, 77]))
        .save(dir.join(name))
        .unwrap();
}

/// Config pointing compression at a closed local port.
fn unreachable_endpoint_config(dir: &Path) -> PathBuf {
    let path = dir.join("devkit.toml");
    fs::write(
        &path,
        "[compression]\nendpoint = \"http://127.0.0.1:9/shrink\"\ntimeout_secs = 5\n",
    )
    .unwrap();
    path
}

#[test]
fn test_no_arguments_prints_usage() {
    let temp = TempDir::new().unwrap();
    resize_cmd(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("INPUT_DIR"));
}

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    resize_cmd(temp.path())
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("--tinypng"));
}

#[test]
fn test_missing_output_argument() {
    let temp = TempDir::new().unwrap();
    resize_cmd(temp.path())
        .arg("input")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("OUTPUT_DIR"));
}

#[test]
fn test_missing_input_directory() {
    let temp = TempDir::new().unwrap();
    resize_cmd(temp.path())
        .args(["missing", "out"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Input directory does not exist"));

    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_tinypng_without_key_fails_before_processing() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("in");
    fs::create_dir(&input).unwrap();
    write_image(&input, "shot.png", 10, 10);

    resize_cmd(temp.path())
        .args(["in", "out", "--tinypng"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("TINYPNG_API_KEY"));

    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_empty_input_directory() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("in");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("readme.txt"), "not an image").unwrap();

    resize_cmd(temp.path())
        .args(["in", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No image files found"));

    let out = temp.path().join("out");
    assert!(!out.exists() || fs::read_dir(&out).unwrap().count() == 0);
}

#[test]
fn test_corrupt_file_does_not_stop_batch() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("in");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("broken.png"), b"garbage").unwrap();
    write_image(&input, "wide.PNG", 300, 100);
    write_image(&input, "tall.jpg", 40, 400);

    resize_cmd(temp.path())
        .args(["in", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 image(s), resizing to 1242x2688..."))
        .stdout(predicate::str::contains("failed: broken.png"))
        .stdout(predicate::str::contains("processed: wide.PNG"))
        .stdout(predicate::str::contains("processed: tall.jpg"));

    let out = temp.path().join("out");
    for name in ["wide.PNG", "tall.jpg"] {
        let img = image::open(out.join(name)).unwrap();
        assert_eq!(img.dimensions(), (1242, 2688), "{name}");
    }
    assert!(!out.join("broken.png").exists());
}

#[test]
fn test_compression_failure_falls_back() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("in");
    fs::create_dir(&input).unwrap();
    write_image(&input, "shot.png", 60, 120);
    let config = unreachable_endpoint_config(temp.path());

    resize_cmd(temp.path())
        .env("TINYPNG_API_KEY", "test-key")
        .args(["in", "out", "--tinypng", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("resizing to 1242x2688 and compressing with TinyPNG"))
        .stdout(predicate::str::contains("compression failed for shot.png"))
        .stdout(predicate::str::contains("saved uncompressed"));

    let out = temp.path().join("out");
    assert_eq!(image::open(out.join("shot.png")).unwrap().dimensions(), (1242, 2688));
    assert!(!out.join("shot.png.tmp").exists());
}

#[test]
fn test_json_report() {
    let temp = TempDir::new().unwrap();
    let input = temp.path().join("in");
    fs::create_dir(&input).unwrap();
    write_image(&input, "a.png", 20, 20);
    fs::write(input.join("b.jpeg"), b"nope").unwrap();

    let assert = resize_cmd(temp.path())
        .args(["in", "out", "--output-format", "json"])
        .assert()
        .success();

    let report: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(report["target"]["width"], 1242);
    assert_eq!(report["target"]["height"], 2688);

    let files = report["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    let saved = files.iter().find(|f| f["name"] == "a.png").unwrap();
    assert_eq!(saved["status"], "saved");
    assert_eq!(saved["compression"], "disabled");
    let failed = files.iter().find(|f| f["name"] == "b.jpeg").unwrap();
    assert_eq!(failed["status"], "failed");
}
