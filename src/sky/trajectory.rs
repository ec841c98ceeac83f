#![allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{domain::sky::SkyInput, render::surface::Point};

/// Night is drawn as a fixed twelve hour arc; the next day's sunrise is not
/// always known.
pub const HALF_DAY_MS: f64 = 12.0 * 60.0 * 60.0 * 1000.0;
pub const HORIZON_FRACTION: f32 = 0.85;
pub const ZENITH_FRACTION: f32 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    Sun,
    Moon,
}

/// Which screen edge the sun and moon rise from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ArcDirection {
    #[default]
    RiseRight,
    RiseLeft,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CelestialBody {
    pub kind: BodyKind,
    pub progress: f32,
    pub position: Point,
}

/// Progress along today's arc, clamped to `[0, 1]`. `None` when the sun
/// window is missing or not strictly increasing.
#[must_use]
pub fn celestial_progress(
    is_day: bool,
    now: NaiveDateTime,
    sunrise: Option<NaiveDateTime>,
    sunset: Option<NaiveDateTime>,
) -> Option<f32> {
    let (sunrise, sunset) = (sunrise?, sunset?);
    if sunset <= sunrise {
        return None;
    }
    let millis = |delta: chrono::TimeDelta| delta.num_milliseconds() as f64;

    let raw = if is_day {
        millis(now - sunrise) / millis(sunset - sunrise)
    } else if now >= sunset {
        millis(now - sunset) / HALF_DAY_MS
    } else {
        1.0 - millis(sunrise - now) / HALF_DAY_MS
    };
    Some(raw.clamp(0.0, 1.0) as f32)
}

/// Parabolic arc: horizon at both ends, zenith at the midpoint.
#[must_use]
pub fn arc_position(progress: f32, (width, height): (u32, u32), direction: ArcDirection) -> Point {
    let p = progress.clamp(0.0, 1.0);
    let (w, h) = (width as f32, height as f32);
    let x = match direction {
        ArcDirection::RiseRight => w * (1.0 - p),
        ArcDirection::RiseLeft => w * p,
    };
    let horizon = h * HORIZON_FRACTION;
    let zenith = h * ZENITH_FRACTION;
    let y = horizon - (p * std::f32::consts::PI).sin() * (horizon - zenith);
    Point::new(x, y)
}

#[must_use]
pub fn celestial_body(
    input: &SkyInput,
    now: NaiveDateTime,
    size: (u32, u32),
    direction: ArcDirection,
) -> Option<CelestialBody> {
    let progress = celestial_progress(input.is_day, now, input.sunrise, input.sunset)?;
    Some(CelestialBody {
        kind: if input.is_day {
            BodyKind::Sun
        } else {
            BodyKind::Moon
        },
        progress,
        position: arc_position(progress, size, direction),
    })
}
