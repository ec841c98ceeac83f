use std::{fs, path::Path};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::sky::{SkyInput, parse_datetime};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("reading snapshot {path} failed")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot payload is not valid JSON for a sky snapshot")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot timestamp {0:?} is not YYYY-MM-DDTHH:MM")]
    Timestamp(String),
}

/// Accepts either the flat snapshot layout or an Open-Meteo forecast payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotDocument {
    Flat(FlatSnapshot),
    Forecast(ForecastPayload),
}

#[derive(Debug, Deserialize)]
struct FlatSnapshot {
    weather_code: i32,
    is_day: DayFlag,
    #[serde(default)]
    sunrise: Option<String>,
    #[serde(default)]
    sunset: Option<String>,
    #[serde(default, alias = "precipitation")]
    precipitation_mm: f32,
}

#[derive(Debug, Deserialize)]
struct ForecastPayload {
    current: CurrentBlock,
    #[serde(default)]
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    weather_code: i32,
    is_day: DayFlag,
    #[serde(default)]
    precipitation: f32,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    sunrise: Vec<String>,
    #[serde(default)]
    sunset: Vec<String>,
}

/// Open-Meteo reports `is_day` as 0/1; hand-written snapshots use a bool.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum DayFlag {
    Bool(bool),
    Number(u8),
}

impl DayFlag {
    fn is_day(self) -> bool {
        match self {
            Self::Bool(value) => value,
            Self::Number(value) => value == 1,
        }
    }
}

pub fn parse_snapshot(payload: &str) -> Result<SkyInput, SnapshotError> {
    let document: SnapshotDocument = serde_json::from_str(payload)?;
    match document {
        SnapshotDocument::Flat(flat) => Ok(SkyInput {
            weather_code: flat.weather_code,
            is_day: flat.is_day.is_day(),
            sunrise: parse_optional_time(flat.sunrise.as_deref())?,
            sunset: parse_optional_time(flat.sunset.as_deref())?,
            precipitation_mm: flat.precipitation_mm.max(0.0),
        }),
        SnapshotDocument::Forecast(forecast) => {
            let daily = forecast.daily.as_ref();
            let sunrise = daily.and_then(|block| block.sunrise.first());
            let sunset = daily.and_then(|block| block.sunset.first());
            Ok(SkyInput {
                weather_code: forecast.current.weather_code,
                is_day: forecast.current.is_day.is_day(),
                sunrise: parse_optional_time(sunrise.map(String::as_str))?,
                sunset: parse_optional_time(sunset.map(String::as_str))?,
                precipitation_mm: forecast.current.precipitation.max(0.0),
            })
        }
    }
}

pub fn load_snapshot(path: &Path) -> Result<SkyInput, SnapshotError> {
    let payload = fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_snapshot(&payload)
}

fn parse_optional_time(
    value: Option<&str>,
) -> Result<Option<chrono::NaiveDateTime>, SnapshotError> {
    value
        .map(|raw| parse_datetime(raw).ok_or_else(|| SnapshotError::Timestamp(raw.to_string())))
        .transpose()
}
