use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{
    cli::Cli,
    sky::{population::Density, renderer::SkyConfig, trajectory::ArcDirection},
};

pub const CONFIG_DIR_ENV: &str = "MIRROR_SKY_CONFIG_DIR";

const RAIN_RANGE: (usize, usize) = (800, 1200);
const SNOW_RANGE: (usize, usize) = (200, 600);
const STAR_RANGE: (usize, usize) = (50, 400);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum MotionSetting {
    #[default]
    Full,
    Reduced,
    Off,
}

impl MotionSetting {
    /// Frame rate for the sky clock. A still sky still redraws so the sun and
    /// moon keep moving.
    #[must_use]
    pub fn frame_rate(self, fps: u8) -> u8 {
        let fps = fps.clamp(15, 60);
        match self {
            Self::Full => fps,
            Self::Reduced => fps.min(20),
            Self::Off => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    pub motion: MotionSetting,
    pub fps: u8,
    pub refresh_interval_secs: u64,
    pub arc: ArcDirection,
    pub rain_particles: usize,
    pub snow_particles: usize,
    pub star_count: usize,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        let density = Density::default();
        Self {
            motion: MotionSetting::Full,
            fps: 30,
            refresh_interval_secs: 600,
            arc: ArcDirection::RiseRight,
            rain_particles: density.rain,
            snow_particles: density.snow,
            star_count: density.stars,
        }
    }
}

impl RuntimeSettings {
    #[must_use]
    pub fn from_cli_defaults(cli: &Cli) -> Self {
        Self::default().with_cli_overrides(cli)
    }

    /// Applies only the flags given on the command line.
    #[must_use]
    pub fn with_cli_overrides(mut self, cli: &Cli) -> Self {
        if let Some(motion) = motion_from_cli(cli) {
            self.motion = motion;
        }
        if let Some(fps) = cli.fps {
            self.fps = fps;
        }
        if let Some(secs) = cli.refresh_interval {
            self.refresh_interval_secs = secs;
        }
        if let Some(arc) = cli.arc {
            self.arc = arc.into();
        }
        self
    }

    /// Pulls hand-edited values back into supported ranges.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            fps: self.fps.clamp(15, 60),
            refresh_interval_secs: self.refresh_interval_secs.max(10),
            rain_particles: self.rain_particles.clamp(RAIN_RANGE.0, RAIN_RANGE.1),
            snow_particles: self.snow_particles.clamp(SNOW_RANGE.0, SNOW_RANGE.1),
            star_count: self.star_count.clamp(STAR_RANGE.0, STAR_RANGE.1),
            ..self
        }
    }

    #[must_use]
    pub fn sky_config(&self) -> SkyConfig {
        SkyConfig {
            density: Density {
                rain: self.rain_particles,
                snow: self.snow_particles,
                stars: self.star_count,
            },
            arc: self.arc,
            twinkle: self.motion == MotionSetting::Full,
            animate: self.motion != MotionSetting::Off,
        }
    }

    #[must_use]
    pub fn frame_rate(&self) -> u8 {
        self.motion.frame_rate(self.fps)
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }
}

fn motion_from_cli(cli: &Cli) -> Option<MotionSetting> {
    if cli.no_animation {
        Some(MotionSetting::Off)
    } else if cli.reduced_motion {
        Some(MotionSetting::Reduced)
    } else {
        None
    }
}

pub fn load_runtime_settings(cli: &Cli, enable_disk: bool) -> (RuntimeSettings, Option<PathBuf>) {
    if !enable_disk {
        return (RuntimeSettings::from_cli_defaults(cli).clamped(), None);
    }
    let path = settings_path();
    let settings = load_runtime_settings_at(cli, path.as_deref());
    (settings, path)
}

/// Saved file first, then any flag the user set explicitly on top.
#[must_use]
pub fn load_runtime_settings_at(cli: &Cli, path: Option<&Path>) -> RuntimeSettings {
    let mut settings = RuntimeSettings::from_cli_defaults(cli);

    if let Some(path) = path
        && let Ok(content) = fs::read_to_string(path)
    {
        match serde_json::from_str::<RuntimeSettings>(&content) {
            Ok(saved) => settings = saved,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable settings");
            }
        }
    }

    settings.with_cli_overrides(cli).clamped()
}

pub fn save_runtime_settings(path: &Path, settings: &RuntimeSettings) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("creating settings directory failed")?;
    }
    let payload =
        serde_json::to_string_pretty(settings).context("serializing settings payload failed")?;
    fs::write(path, payload).context("writing settings file failed")
}

#[must_use]
pub fn settings_path() -> Option<PathBuf> {
    settings_path_from(std::env::var_os(CONFIG_DIR_ENV), std::env::var_os("HOME"))
}

fn settings_path_from(config_dir: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    if let Some(base) = config_dir {
        return Some(PathBuf::from(base).join("settings.json"));
    }
    let home = home?;
    Some(
        PathBuf::from(home)
            .join(".config")
            .join("mirror-sky")
            .join("settings.json"),
    )
}

#[cfg(test)]
mod tests;
