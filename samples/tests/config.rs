// Copyright 2026 The HelloVk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use hellovk_samples::config::{Args, Config, ConfigError, Settings, config_path};
use hellovk_vulkan::swapchain::PresentPreference;

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("hellovk-samples-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
fn command_line_over_file_over_defaults() {
    let dir = scratch("layers");
    let path = dir.join("config.toml");
    fs::write(
        &path,
        "[window]\nwidth = 1280\ntitle = \"from file\"\n\n[vulkan]\npresent_mode = \"vsync\"\n",
    )
    .unwrap();

    let args = Args::try_parse_from([
        "quad",
        "--config",
        path.to_str().unwrap(),
        "--title",
        "from args",
        "--validation",
        "false",
    ])
    .unwrap();
    let settings = Settings::load(&args, "Vertex Buffers").unwrap();

    assert_eq!(settings.window.width, 1280);
    assert_eq!(settings.window.height, 600);
    assert_eq!(settings.window.title, "from args");
    assert!(!settings.context.validation);
    assert_eq!(settings.present, PresentPreference::Vsync);

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn default_file_in_config_dir() {
    let dir = scratch("default");
    assert_eq!(config_path(None, None, Some(dir.clone())), None);

    let file = dir.join("hellovk").join("config.toml");
    fs::create_dir_all(file.parent().unwrap()).unwrap();
    fs::write(&file, "[window]\nheight = 480\n").unwrap();
    let found = config_path(None, None, Some(dir.clone())).unwrap();
    assert_eq!(found, file);
    assert_eq!(Config::load(&found).unwrap().window.height, Some(480));

    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn explicit_missing_file_is_an_error() {
    let dir = scratch("missing");
    let args = Args::try_parse_from(["triangle", "-c", dir.join("nope.toml").to_str().unwrap()])
        .unwrap();
    assert!(matches!(
        Settings::load(&args, "Triangle"),
        Err(ConfigError::Read { .. })
    ));
    fs::remove_dir_all(dir).unwrap();
}

#[test]
fn vsync_flag() {
    let args = Args::try_parse_from(["triangle", "--vsync", "--width", "320"]).unwrap();
    assert!(args.vsync);
    assert_eq!(args.width, Some(320));
    let settings = Settings::resolve(&args, &Config::default(), "Triangle");
    assert_eq!(settings.present, PresentPreference::Vsync);
    assert_eq!(settings.window.width, 320);
}

#[test]
fn rejects_bad_arguments() {
    assert!(Args::try_parse_from(["triangle", "--width", "wide"]).is_err());
    assert!(Args::try_parse_from(["triangle", "--validation", "maybe"]).is_err());
}
