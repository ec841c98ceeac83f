#![allow(clippy::missing_errors_doc)]

use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, ValueEnum};

use crate::{
    domain::sky::parse_datetime,
    host::feed::{FeedSource, ManualSky},
    sky::trajectory::ArcDirection,
};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum ArcArg {
    RiseRight,
    RiseLeft,
}

impl From<ArcArg> for ArcDirection {
    fn from(value: ArcArg) -> Self {
        match value {
            ArcArg::RiseRight => Self::RiseRight,
            ArcArg::RiseLeft => Self::RiseLeft,
        }
    }
}

fn parse_time_arg(value: &str) -> Result<NaiveDateTime, String> {
    parse_datetime(value).ok_or_else(|| format!("expected YYYY-MM-DDTHH:MM, got {value:?}"))
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Parser, Clone)]
#[command(
    name = "mirror-sky",
    version,
    about = "Animated ambient sky for a terminal weather mirror"
)]
pub struct Cli {
    /// WMO weather code for a manual sky
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub code: i32,

    /// Render the manual sky at night
    #[arg(long)]
    pub night: bool,

    /// Local sunrise (YYYY-MM-DDTHH:MM)
    #[arg(long, value_parser = parse_time_arg)]
    pub sunrise: Option<NaiveDateTime>,

    /// Local sunset (YYYY-MM-DDTHH:MM)
    #[arg(long, value_parser = parse_time_arg)]
    pub sunset: Option<NaiveDateTime>,

    /// Precipitation in millimetres
    #[arg(long, default_value_t = 0.0)]
    pub precip: f32,

    /// JSON snapshot file, re-read on every refresh
    #[arg(long, conflicts_with = "demo")]
    pub snapshot: Option<PathBuf>,

    /// Cycle through sample skies
    #[arg(long)]
    pub demo: bool,

    /// Target FPS (15..60, default 30)
    #[arg(long, value_parser = clap::value_parser!(u8).range(15..=60))]
    pub fps: Option<u8>,

    /// Lower motion mode
    #[arg(long)]
    pub reduced_motion: bool,

    /// Draw a still sky
    #[arg(long)]
    pub no_animation: bool,

    /// Refresh interval in seconds (default 600)
    #[arg(long, value_parser = clap::value_parser!(u64).range(10..))]
    pub refresh_interval: Option<u64>,

    /// Edge the sun and moon rise from (default rise-right)
    #[arg(long, value_enum)]
    pub arc: Option<ArcArg>,

    /// Hide the bottom status line
    #[arg(long)]
    pub no_status: bool,

    /// Append logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Persist the effective settings before starting
    #[arg(long)]
    pub save_settings: bool,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.snapshot.is_some() && self.demo {
            anyhow::bail!("--snapshot and --demo cannot be combined");
        }
        if let (Some(sunrise), Some(sunset)) = (self.sunrise, self.sunset)
            && sunset <= sunrise
        {
            anyhow::bail!("--sunset must be later than --sunrise");
        }
        if !self.precip.is_finite() || self.precip < 0.0 {
            anyhow::bail!("--precip must be a non-negative number");
        }
        Ok(())
    }

    #[must_use]
    pub fn feed_source(&self) -> FeedSource {
        if self.demo {
            FeedSource::Demo
        } else if let Some(path) = &self.snapshot {
            FeedSource::File(path.clone())
        } else {
            FeedSource::Manual(ManualSky {
                weather_code: self.code,
                is_day: !self.night,
                sunrise: self.sunrise,
                sunset: self.sunset,
                precipitation_mm: self.precip,
            })
        }
    }
}
