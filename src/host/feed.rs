use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Utc};
use tracing::{debug, warn};

use crate::{
    domain::{
        sky::SkyInput,
        snapshot::{SnapshotError, load_snapshot},
    },
    host::freshness::{FreshnessState, evaluate_freshness},
};

/// Sky described on the command line. A missing sun window falls back to
/// 06:00 to 20:00 on the current day.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualSky {
    pub weather_code: i32,
    pub is_day: bool,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
    pub precipitation_mm: f32,
}

impl ManualSky {
    fn resolve(&self, today: NaiveDate) -> SkyInput {
        let at = |hour| today.and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default());
        SkyInput {
            weather_code: self.weather_code,
            is_day: self.is_day,
            sunrise: Some(self.sunrise.unwrap_or_else(|| at(6))),
            sunset: Some(self.sunset.unwrap_or_else(|| at(20))),
            precipitation_mm: self.precipitation_mm.max(0.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeedSource {
    Manual(ManualSky),
    /// JSON snapshot re-read on every refresh.
    File(PathBuf),
    /// Cycles through [`DEMO_SCENES`].
    Demo,
}

/// `(weather_code, is_day, precipitation_mm)` per demo step.
pub const DEMO_SCENES: [(i32, bool, f32); 5] = [
    (0, true, 0.0),
    (61, true, 2.5),
    (73, true, 0.0),
    (0, false, 0.0),
    (3, false, 0.0),
];

/// Supplies sky inputs and remembers the last good one across failures.
#[derive(Debug)]
pub struct SnapshotFeed {
    source: FeedSource,
    current: Option<SkyInput>,
    demo_step: usize,
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
}

impl SnapshotFeed {
    #[must_use]
    pub fn new(source: FeedSource) -> Self {
        Self {
            source,
            current: None,
            demo_step: 0,
            last_success: None,
            consecutive_failures: 0,
        }
    }

    /// Produces the next input. On failure the previous input stays current.
    ///
    /// # Errors
    ///
    /// Snapshot files that cannot be read or parsed.
    pub fn refresh(&mut self, now: DateTime<Local>) -> Result<SkyInput, SnapshotError> {
        let next = match &self.source {
            FeedSource::Manual(manual) => Ok(manual.resolve(now.date_naive())),
            FeedSource::File(path) => load_snapshot(path),
            FeedSource::Demo => {
                let input = demo_scene(self.demo_step, now.naive_local());
                self.demo_step = (self.demo_step + 1) % DEMO_SCENES.len();
                Ok(input)
            }
        };

        match next {
            Ok(input) => {
                debug!(code = input.weather_code, is_day = input.is_day, "sky input refreshed");
                self.current = Some(input.clone());
                self.last_success = Some(now.with_timezone(&Utc));
                self.consecutive_failures = 0;
                Ok(input)
            }
            Err(err) => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                warn!(
                    error = %err,
                    failures = self.consecutive_failures,
                    "sky input refresh failed, keeping previous input"
                );
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&SkyInput> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    #[must_use]
    pub fn last_success(&self) -> Option<DateTime<Utc>> {
        self.last_success
    }

    #[must_use]
    pub fn freshness(&self, now: DateTime<Utc>, refresh_interval: TimeDelta) -> FreshnessState {
        evaluate_freshness(
            self.last_success,
            self.consecutive_failures,
            now,
            refresh_interval,
        )
    }
}

/// Demo windows are placed around `now` so the body sits a third of the way
/// along its arc: sun by day, moon two hours after sunset by night.
fn demo_scene(step: usize, now: NaiveDateTime) -> SkyInput {
    let (code, is_day, precipitation) = DEMO_SCENES[step % DEMO_SCENES.len()];
    let (sunrise, sunset) = if is_day {
        (now - TimeDelta::hours(4), now + TimeDelta::hours(8))
    } else {
        (now - TimeDelta::hours(16), now - TimeDelta::hours(2))
    };
    SkyInput::new(code, is_day)
        .with_sun_window(sunrise, sunset)
        .with_precipitation(precipitation)
}
