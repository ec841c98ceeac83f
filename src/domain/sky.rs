use chrono::NaiveDateTime;

/// Weather snapshot the sky renderer animates.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyInput {
    pub weather_code: i32,
    pub is_day: bool,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
    pub precipitation_mm: f32,
}

impl SkyInput {
    #[must_use]
    pub fn new(weather_code: i32, is_day: bool) -> Self {
        Self {
            weather_code,
            is_day,
            sunrise: None,
            sunset: None,
            precipitation_mm: 0.0,
        }
    }

    #[must_use]
    pub fn with_sun_window(mut self, sunrise: NaiveDateTime, sunset: NaiveDateTime) -> Self {
        self.sunrise = Some(sunrise);
        self.sunset = Some(sunset);
        self
    }

    #[must_use]
    pub fn with_precipitation(mut self, precipitation_mm: f32) -> Self {
        self.precipitation_mm = precipitation_mm.max(0.0);
        self
    }

    #[must_use]
    pub fn flags(&self) -> CategoryFlags {
        classify(self.weather_code, self.precipitation_mm)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkyCategory {
    Rain,
    Snow,
    Cloudy,
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryFlags {
    pub is_rain: bool,
    pub is_snow: bool,
    pub is_cloudy: bool,
}

impl CategoryFlags {
    #[must_use]
    pub fn category(self) -> SkyCategory {
        if self.is_rain {
            SkyCategory::Rain
        } else if self.is_snow {
            SkyCategory::Snow
        } else if self.is_cloudy {
            SkyCategory::Cloudy
        } else {
            SkyCategory::Clear
        }
    }

    /// Clear skies only: no rain, snow or cloud cover.
    #[must_use]
    pub fn is_clear(self) -> bool {
        !self.is_rain && !self.is_snow && !self.is_cloudy
    }
}

#[must_use]
pub fn is_rain_code(code: i32) -> bool {
    matches!(code, 51..=67 | 80..=82)
}

#[must_use]
pub fn is_snow_code(code: i32) -> bool {
    matches!(code, 71..=77 | 85..=86)
}

#[must_use]
pub fn is_cloudy_code(code: i32) -> bool {
    matches!(code, 2 | 3 | 45)
}

/// Derives the category flags for a WMO weather code. Measured precipitation
/// forces rain for any code below the snow range; snow never overlaps rain.
#[must_use]
pub fn classify(code: i32, precipitation_mm: f32) -> CategoryFlags {
    let is_rain = is_rain_code(code) || (precipitation_mm > 0.0 && code < 70);
    CategoryFlags {
        is_rain,
        is_snow: !is_rain && is_snow_code(code),
        is_cloudy: is_cloudy_code(code),
    }
}

const WEATHER_DESCRIPTIONS: &[(&[i32], &str)] = &[
    (&[0], "Clear Sky"),
    (&[1], "Mainly Clear"),
    (&[2], "Partly Cloudy"),
    (&[3], "Overcast"),
    (&[45, 48], "Foggy"),
    (&[51, 53, 55], "Drizzle"),
    (&[56, 57], "Freezing Drizzle"),
    (&[61, 63], "Rain"),
    (&[65], "Heavy Rain"),
    (&[66, 67], "Freezing Rain"),
    (&[71, 73, 75], "Snow Fall"),
    (&[77], "Snow Grains"),
    (&[80, 81, 82], "Rain Showers"),
    (&[85, 86], "Snow Showers"),
    (&[95], "Thunderstorm"),
    (&[96, 99], "Thunderstorm & Hail"),
];

#[must_use]
pub fn weather_description(code: i32) -> &'static str {
    WEATHER_DESCRIPTIONS
        .iter()
        .find_map(|(codes, label)| codes.contains(&code).then_some(*label))
        .unwrap_or("Unknown")
}

pub fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}
