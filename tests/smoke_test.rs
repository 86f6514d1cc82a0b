/// Smoke tests driving the built binary
use std::path::Path;
use std::process::{Command, Output};

fn pixelgarden(config_home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pixelgarden"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute pixelgarden")
}

#[test]
fn binary_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = pixelgarden(home.path(), &["--help"]);

    assert!(
        output.status.success(),
        "Binary failed to run --help: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("pixelgarden"),
        "Help output should mention pixelgarden"
    );
}

#[test]
fn binary_shows_version() {
    let home = tempfile::tempdir().unwrap();
    let output = pixelgarden(home.path(), &["--version"]);
    assert!(output.status.success());
}

#[test]
fn invalid_subcommand_fails_gracefully() {
    let home = tempfile::tempdir().unwrap();
    let output = pixelgarden(home.path(), &["nonexistent-command"]);

    assert!(
        !output.status.success(),
        "Invalid subcommand should return error status"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        !stderr.contains("panicked at"),
        "Invalid subcommand should not cause panic"
    );
}

#[test]
fn stage_out_of_range_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    for stage in ["0", "6"] {
        let output = pixelgarden(home.path(), &["render", "--seed", "abc", "--stage", stage, "--json"]);
        assert!(!output.status.success(), "stage {} should fail", stage);
    }
}

#[test]
fn json_dump_of_seedling() {
    let home = tempfile::tempdir().unwrap();
    let output = pixelgarden(
        home.path(),
        &["render", "--seed", "test-seed-1", "--stage", "1", "--json"],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let pixels: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(pixels.len(), 70);
    assert!(pixels
        .iter()
        .any(|p| p["x"] == 16 && p["y"] == 21));
}

#[test]
fn print_mode_is_repeatable() {
    let home = tempfile::tempdir().unwrap();
    let args = ["render", "--seed", "garden", "--stage", "5", "--print"];
    let first = pixelgarden(home.path(), &args);
    let second = pixelgarden(home.path(), &args);
    assert!(first.status.success(), "{}", String::from_utf8_lossy(&first.stderr));
    assert!(!first.stdout.is_empty());
    assert_eq!(first.stdout, second.stdout);
    assert!(String::from_utf8_lossy(&first.stdout).contains("\x1b[38;2;"));
}

#[test]
fn png_export() {
    let home = tempfile::tempdir().unwrap();
    let png = home.path().join("plant.png");
    let output = pixelgarden(
        home.path(),
        &["render", "--seed", "abc", "--stage", "4", "--png", png.to_str().unwrap()],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let bytes = std::fs::read(&png).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

#[test]
fn huge_png_scale_fails_without_panic() {
    let home = tempfile::tempdir().unwrap();
    let png = home.path().join("plant.png");
    let output = pixelgarden(
        home.path(),
        &["render", "--seed", "abc", "--stage", "4", "--png", png.to_str().unwrap(), "--scale", "200000000"],
    );
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("panicked at"), "{}", stderr);
    assert!(!png.exists());
}

#[test]
fn garden_plant_and_water() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("garden.toml");
    let file = file.to_str().unwrap();

    let planted = pixelgarden(home.path(), &["garden", "--file", file, "plant", "fern"]);
    assert!(planted.status.success(), "{}", String::from_utf8_lossy(&planted.stderr));

    for _ in 0..3 {
        let watered = pixelgarden(home.path(), &["garden", "--file", file, "water", "fern"]);
        assert!(watered.status.success(), "{}", String::from_utf8_lossy(&watered.stderr));
    }

    let list = pixelgarden(home.path(), &["garden", "--file", file, "list"]);
    let stdout = String::from_utf8_lossy(&list.stdout);
    assert!(stdout.contains("Points: 70"), "{}", stdout);
    assert!(stdout.contains("sprout (2/5)"), "{}", stdout);

    let missing = pixelgarden(home.path(), &["garden", "--file", file, "water", "ghost"]);
    assert!(!missing.status.success());
}

#[test]
fn unnamed_plants_are_numbered() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("garden.toml");
    let file = file.to_str().unwrap();

    let planted = pixelgarden(home.path(), &["garden", "--file", file, "plant"]);
    assert!(planted.status.success(), "{}", String::from_utf8_lossy(&planted.stderr));
    let stdout = String::from_utf8_lossy(&planted.stdout);
    assert!(stdout.contains("Seed planted: Plant #1 "), "{}", stdout);
    assert!(!stdout.contains("My Plant"), "{}", stdout);
}

#[test]
fn earn_badges_and_redeem() {
    let home = tempfile::tempdir().unwrap();
    let file = home.path().join("garden.toml");
    let file = file.to_str().unwrap();

    let earned = pixelgarden(home.path(), &["garden", "--file", file, "earn", "250", "--reason", "quiz"]);
    let stdout = String::from_utf8_lossy(&earned.stdout);
    assert!(earned.status.success(), "{}", String::from_utf8_lossy(&earned.stderr));
    assert!(stdout.contains("Badge unlocked: Seedling"), "{}", stdout);
    assert!(stdout.contains("Badge unlocked: Sapling"), "{}", stdout);

    // Already unlocked badges are not announced again
    let again = pixelgarden(home.path(), &["garden", "--file", file, "earn", "10"]);
    assert!(!String::from_utf8_lossy(&again.stdout).contains("Badge unlocked"));

    let redeemed = pixelgarden(home.path(), &["garden", "--file", file, "redeem", "300", "Face Serum"]);
    assert!(redeemed.status.success(), "{}", String::from_utf8_lossy(&redeemed.stderr));
    assert!(String::from_utf8_lossy(&redeemed.stdout).contains("60 left"));

    let broke = pixelgarden(home.path(), &["garden", "--file", file, "redeem", "100", "Toner"]);
    assert!(!broke.status.success());
    assert!(!String::from_utf8_lossy(&broke.stderr).contains("panicked at"));

    let history = pixelgarden(home.path(), &["garden", "--file", file, "history"]);
    let stdout = String::from_utf8_lossy(&history.stdout);
    assert!(stdout.contains("Redeemed Face Serum"), "{}", stdout);
    assert!(stdout.contains("quiz"), "{}", stdout);
    assert!(!stdout.contains("Toner"), "{}", stdout);

    let badges = pixelgarden(home.path(), &["garden", "--file", file, "badges"]);
    let stdout = String::from_utf8_lossy(&badges.stdout);
    assert!(stdout.contains("[x] Sapling"), "{}", stdout);
    assert!(stdout.contains("[ ] Growing Tree"), "{}", stdout);
}
