use clap::Parser;
use tempfile::NamedTempFile;

use super::*;

fn cli(args: &[&str]) -> Cli {
    Cli::parse_from(std::iter::once("mirror-sky").chain(args.iter().copied()))
}

#[test]
fn from_cli_defaults_maps_motion_flags() {
    assert_eq!(
        RuntimeSettings::from_cli_defaults(&cli(&[])).motion,
        MotionSetting::Full
    );
    assert_eq!(
        RuntimeSettings::from_cli_defaults(&cli(&["--reduced-motion"])).motion,
        MotionSetting::Reduced
    );
    assert_eq!(
        RuntimeSettings::from_cli_defaults(&cli(&["--no-animation", "--reduced-motion"])).motion,
        MotionSetting::Off
    );
}

#[test]
fn frame_rate_follows_motion_setting() {
    assert_eq!(MotionSetting::Full.frame_rate(45), 45);
    assert_eq!(MotionSetting::Reduced.frame_rate(45), 20);
    assert_eq!(MotionSetting::Reduced.frame_rate(15), 15);
    assert_eq!(MotionSetting::Off.frame_rate(60), 2);
    assert_eq!(MotionSetting::Full.frame_rate(200), 60);
}

#[test]
fn sky_config_reflects_motion_and_density() {
    let settings = RuntimeSettings {
        motion: MotionSetting::Reduced,
        rain_particles: 900,
        ..RuntimeSettings::default()
    };
    let config = settings.sky_config();
    assert!(config.animate);
    assert!(!config.twinkle);
    assert_eq!(config.density.rain, 900);

    let still = RuntimeSettings {
        motion: MotionSetting::Off,
        ..RuntimeSettings::default()
    }
    .sky_config();
    assert!(!still.animate);
}

#[test]
fn clamped_pulls_densities_into_range() {
    let settings = RuntimeSettings {
        rain_particles: 10_000,
        snow_particles: 0,
        star_count: 1,
        fps: 5,
        refresh_interval_secs: 1,
        ..RuntimeSettings::default()
    }
    .clamped();
    assert_eq!(settings.rain_particles, 1200);
    assert_eq!(settings.snow_particles, 200);
    assert_eq!(settings.star_count, 50);
    assert_eq!(settings.fps, 15);
    assert_eq!(settings.refresh_interval_secs, 10);
}

#[test]
fn roundtrip_through_disk() {
    let settings = RuntimeSettings {
        motion: MotionSetting::Reduced,
        arc: ArcDirection::RiseLeft,
        star_count: 120,
        ..RuntimeSettings::default()
    };
    let file = NamedTempFile::new().expect("create temp settings file");
    save_runtime_settings(file.path(), &settings).expect("save settings");

    let loaded = load_runtime_settings_at(&cli(&[]), Some(file.path()));
    assert_eq!(loaded, settings);
}

#[test]
fn explicit_flags_override_saved_file() {
    let saved = RuntimeSettings {
        motion: MotionSetting::Reduced,
        fps: 24,
        refresh_interval_secs: 120,
        ..RuntimeSettings::default()
    };
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("settings.json");
    save_runtime_settings(&path, &saved).expect("save creates parents");

    let loaded = load_runtime_settings_at(
        &cli(&["--no-animation", "--fps", "50", "--arc", "rise-left"]),
        Some(&path),
    );
    assert_eq!(loaded.motion, MotionSetting::Off);
    assert_eq!(loaded.fps, 50);
    assert_eq!(loaded.refresh_interval_secs, 120, "default flag keeps saved");
    assert_eq!(loaded.arc, ArcDirection::RiseLeft);
}

#[test]
fn flag_equal_to_default_still_overrides_saved_file() {
    let saved = RuntimeSettings {
        fps: 45,
        refresh_interval_secs: 120,
        arc: ArcDirection::RiseLeft,
        ..RuntimeSettings::default()
    };
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("settings.json");
    save_runtime_settings(&path, &saved).expect("save");

    let loaded = load_runtime_settings_at(
        &cli(&["--fps", "30", "--refresh-interval", "600", "--arc", "rise-right"]),
        Some(&path),
    );
    assert_eq!(loaded.fps, 30);
    assert_eq!(loaded.refresh_interval_secs, 600);
    assert_eq!(loaded.arc, ArcDirection::RiseRight);

    let untouched = load_runtime_settings_at(&cli(&[]), Some(&path));
    assert_eq!(untouched, saved);
}

#[test]
fn partial_or_corrupt_files_fall_back() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("settings.json");

    std::fs::write(&path, r#"{"star_count": 5000}"#).expect("write partial");
    let loaded = load_runtime_settings_at(&cli(&[]), Some(&path));
    assert_eq!(loaded.star_count, 400);
    assert_eq!(loaded.fps, 30);

    std::fs::write(&path, "{ nope").expect("write corrupt");
    let loaded = load_runtime_settings_at(&cli(&["--fps", "40"]), Some(&path));
    assert_eq!(loaded.fps, 40);
    assert_eq!(loaded.rain_particles, 1200);

    let missing = load_runtime_settings_at(&cli(&[]), Some(&dir.path().join("absent.json")));
    assert_eq!(missing, RuntimeSettings::default());
}

#[test]
fn without_disk_returns_cli_defaults() {
    let (settings, path) = load_runtime_settings(&cli(&["--reduced-motion"]), false);
    assert!(path.is_none());
    assert_eq!(settings.motion, MotionSetting::Reduced);
}

#[test]
fn settings_path_prefers_config_dir_override() {
    let path = settings_path_from(Some("/tmp/sky".into()), Some("/home/me".into()));
    assert_eq!(path, Some(PathBuf::from("/tmp/sky/settings.json")));

    let path = settings_path_from(None, Some("/home/me".into()));
    assert_eq!(
        path,
        Some(PathBuf::from("/home/me/.config/mirror-sky/settings.json"))
    );
    assert_eq!(settings_path_from(None, None), None);
}
