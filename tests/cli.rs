use assert_cmd::Command;
use image::{GrayImage, ImageBuffer, Luma};
use predicates::prelude::*;
use tempfile::TempDir;

fn write_input(dir: &TempDir) -> String {
    let img: GrayImage = ImageBuffer::from_fn(48, 40, |x, y| Luma([((x * 5 + y * 3) % 256) as u8]));
    let path = dir.path().join("input.png");
    img.save(&path).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn carves_to_a_file() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir);
    let output = dir.path().join("output.png");

    Command::cargo_bin("seamcarve")
        .unwrap()
        .arg(&input)
        .args(&["--width", "40"])
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let carved = image::open(&output).unwrap();
    assert_eq!((carved.width(), carved.height()), (40, 40));
}

#[test]
fn writes_pgm_to_stdout_by_default() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir);

    let output = Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&[input.as_str(), "--width", "44", "--height", "30", "--energy", "gradient"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(output.stdout.starts_with(b"P5"));
    let carved = image::load_from_memory(&output.stdout).unwrap();
    assert_eq!((carved.width(), carved.height()), (44, 30));
}

#[test]
fn dumps_the_energy_map() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir);
    let energy = dir.path().join("energy.png");

    Command::cargo_bin("seamcarve")
        .unwrap()
        .arg(&input)
        .args(&["--width", "46", "-o"])
        .arg(dir.path().join("out.png"))
        .arg("--energy-map")
        .arg(&energy)
        .assert()
        .success();

    let map = image::open(&energy).unwrap();
    assert_eq!((map.width(), map.height()), (48, 40));
}

#[test]
fn refuses_to_upscale() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir);

    Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&[input.as_str(), "--width", "60"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot upscale"));
}

#[test]
fn reports_a_missing_file() {
    Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&["/nonexistent/picture.png", "--width", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("could not read"));
}

#[test]
fn rejects_a_bad_sigma() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir);

    Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&[input.as_str(), "--width", "40", "--sigma", "-2"])
        .assert()
        .failure();
}

#[test]
fn takes_a_guard_value() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir);
    let output = dir.path().join("output.png");

    Command::cargo_bin("seamcarve")
        .unwrap()
        .arg(&input)
        .args(&["--width", "42", "--guard-value", "5000"])
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let carved = image::open(&output).unwrap();
    assert_eq!((carved.width(), carved.height()), (42, 40));
}

#[test]
fn rejects_an_infinite_guard_value() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir);

    Command::cargo_bin("seamcarve")
        .unwrap()
        .args(&[input.as_str(), "--width", "42", "--guard-value", "inf"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("guard value must be finite"));
}
