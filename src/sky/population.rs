#![allow(clippy::cast_precision_loss)]

use rand::Rng;

use crate::domain::sky::CategoryFlags;

/// Height the particle dimensions are tuned for; smaller surfaces scale down.
pub const REFERENCE_HEIGHT: f32 = 1080.0;
/// Rain falls `speed * RAIN_SPEED_FACTOR` pixels per tick.
pub const RAIN_SPEED_FACTOR: f32 = 2.0;
/// Stars stay above the visual horizon.
pub const STAR_BAND: f32 = 0.85;

const SNOW_WRAP_OFFSET: f32 = 5.0;
const SNOW_SWAY_PERIOD: f32 = 50.0;
const SNOW_SWAY_AMPLITUDE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RainParticle {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub trail_length: f32,
    pub opacity: f32,
}

impl RainParticle {
    pub fn advance(&mut self, height: f32) {
        self.y += self.speed * RAIN_SPEED_FACTOR;
        if self.y > height {
            self.y = -self.trail_length;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnowParticle {
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub radius: f32,
    pub opacity: f32,
}

impl SnowParticle {
    pub fn advance(&mut self, width: f32, height: f32, scale: f32) {
        self.y += self.speed / 2.0;
        self.x += (self.y / (SNOW_SWAY_PERIOD * scale)).sin() * SNOW_SWAY_AMPLITUDE * scale;
        if width > 0.0 {
            self.x = self.x.rem_euclid(width);
            // rem_euclid rounds tiny negative values up to exactly `width`
            if self.x >= width {
                self.x = 0.0;
            }
        }
        if self.y > height {
            self.y = -SNOW_WRAP_OFFSET * scale;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub opacity: f32,
    pub twinkle_speed: f32,
}

impl Star {
    /// Drawn opacity at `now_millis`; the x phase keeps stars out of unison.
    #[must_use]
    pub fn twinkle_opacity(&self, now_millis: i64) -> f32 {
        let phase = now_millis as f64 * f64::from(self.twinkle_speed) + f64::from(self.x);
        #[allow(clippy::cast_possible_truncation)]
        let opacity = phase.sin().abs() as f32;
        opacity
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Precipitation {
    #[default]
    None,
    Rain(Vec<RainParticle>),
    Snow(Vec<SnowParticle>),
}

impl Precipitation {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Rain(drops) => drops.len(),
            Self::Snow(flakes) => flakes.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Population sizes per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Density {
    pub rain: usize,
    pub snow: usize,
    pub stars: usize,
}

impl Default for Density {
    fn default() -> Self {
        Self {
            rain: 1200,
            snow: 400,
            stars: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Population {
    pub precipitation: Precipitation,
    pub stars: Vec<Star>,
    scale: f32,
}

impl Default for Population {
    fn default() -> Self {
        Self {
            precipitation: Precipitation::None,
            stars: Vec::new(),
            scale: 1.0,
        }
    }
}

#[must_use]
pub fn surface_scale(height: u32) -> f32 {
    (height as f32 / REFERENCE_HEIGHT).max(0.1)
}

impl Population {
    /// Builds a fresh population for the surface. Rain wins over snow; stars
    /// only appear on clear nights.
    pub fn build<R: Rng>(
        flags: CategoryFlags,
        is_day: bool,
        (width, height): (u32, u32),
        density: Density,
        rng: &mut R,
    ) -> Self {
        if width == 0 || height == 0 {
            return Self::default();
        }
        let (w, h) = (width as f32, height as f32);
        let scale = surface_scale(height);

        let precipitation = if flags.is_rain {
            Precipitation::Rain(
                (0..density.rain)
                    .map(|_| spawn_rain(rng, w, h, scale))
                    .collect(),
            )
        } else if flags.is_snow {
            Precipitation::Snow(
                (0..density.snow)
                    .map(|_| spawn_snow(rng, w, h, scale))
                    .collect(),
            )
        } else {
            Precipitation::None
        };

        let stars = if !is_day && flags.is_clear() {
            (0..density.stars)
                .map(|_| spawn_star(rng, w, h, scale))
                .collect()
        } else {
            Vec::new()
        };

        Self {
            precipitation,
            stars,
            scale,
        }
    }

    /// Steps every particle once, recycling the ones that left the bottom edge.
    pub fn advance(&mut self, width: u32, height: u32) {
        let (w, h) = (width as f32, height as f32);
        match &mut self.precipitation {
            Precipitation::None => {}
            Precipitation::Rain(drops) => {
                for drop in drops {
                    drop.advance(h);
                }
            }
            Precipitation::Snow(flakes) => {
                for flake in flakes {
                    flake.advance(w, h, self.scale);
                }
            }
        }
    }
}

fn spawn_rain<R: Rng>(rng: &mut R, w: f32, h: f32, scale: f32) -> RainParticle {
    RainParticle {
        x: rng.random_range(0.0..w),
        y: rng.random_range(0.0..h),
        speed: rng.random_range(2.0..7.0) * scale,
        trail_length: rng.random_range(15.0..45.0) * scale,
        opacity: rng.random_range(0.1..0.6),
    }
}

fn spawn_snow<R: Rng>(rng: &mut R, w: f32, h: f32, scale: f32) -> SnowParticle {
    SnowParticle {
        x: rng.random_range(0.0..w),
        y: rng.random_range(0.0..h),
        speed: rng.random_range(2.0..7.0) * scale,
        radius: rng.random_range(0.3..3.0) * scale.max(0.35),
        opacity: rng.random_range(0.1..0.6),
    }
}

fn spawn_star<R: Rng>(rng: &mut R, w: f32, h: f32, scale: f32) -> Star {
    Star {
        x: rng.random_range(0.0..w),
        y: rng.random_range(0.0..h * STAR_BAND),
        radius: rng.random_range(0.1..1.3) * scale.max(0.5),
        opacity: rng.random_range(0.1..0.6),
        twinkle_speed: rng.random_range(0.005..0.025),
    }
}
