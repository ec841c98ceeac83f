#![allow(clippy::cast_precision_loss)]

use chrono::NaiveDateTime;

use crate::{
    domain::sky::CategoryFlags,
    render::{
        color::{ColorStop, Rgba},
        surface::{LinearGradient, Paint, Point, RadialGradient, Rect, Surface},
    },
    sky::{
        population::{Precipitation, Star, surface_scale},
        trajectory::{BodyKind, CelestialBody},
    },
};

const SUN_RADIUS: f32 = 70.0;
const SUN_GLOW_FACTOR: f32 = 6.0;
const MOON_RADIUS: f32 = 50.0;
const MOON_GLOW_FACTOR: f32 = 4.0;
const RAIN_STROKE_WIDTH: f32 = 1.5;

const RAIN_COLOR: Rgba = Rgba::rgb(174, 194, 224);

const DAY_CLEAR: [ColorStop; 3] = [
    ColorStop::new(0.0, Rgba::rgb(0x15, 0x65, 0xC0)),
    ColorStop::new(0.5, Rgba::rgb(0x42, 0xA5, 0xF5)),
    ColorStop::new(1.0, Rgba::rgb(0x90, 0xCA, 0xF9)),
];

const DAY_OVERCAST: [ColorStop; 2] = [
    ColorStop::new(0.0, Rgba::rgb(0x3A, 0x4B, 0x5C)),
    ColorStop::new(1.0, Rgba::rgb(0x6A, 0x7B, 0x8C)),
];

const NIGHT: [ColorStop; 3] = [
    ColorStop::new(0.0, Rgba::rgb(0x0D, 0x11, 0x17)),
    ColorStop::new(0.4, Rgba::rgb(0x1A, 0x23, 0x7E)),
    ColorStop::new(1.0, Rgba::rgb(0x31, 0x1B, 0x92)),
];

const SUN_GLOW: [ColorStop; 3] = [
    ColorStop::new(0.0, Rgba::new(255, 200, 50, 0.4)),
    ColorStop::new(0.5, Rgba::new(255, 150, 50, 0.1)),
    ColorStop::new(1.0, Rgba::new(255, 150, 50, 0.0)),
];

const SUN_CORE: [ColorStop; 3] = [
    ColorStop::new(0.0, Rgba::rgb(0xFF, 0xFF, 0xFF)),
    ColorStop::new(0.3, Rgba::rgb(0xFF, 0xFA, 0xCD)),
    ColorStop::new(1.0, Rgba::rgb(0xFF, 0xD7, 0x00)),
];

const MOON_GLOW: [ColorStop; 2] = [
    ColorStop::new(0.0, Rgba::new(200, 220, 255, 0.2)),
    ColorStop::new(1.0, Rgba::new(200, 220, 255, 0.0)),
];

const MOON_CORE: Rgba = Rgba::rgb(0xF0, 0xF4, 0xF8);

/// Background stops for the sky state; pure in `(is_day, is_cloudy, is_rain)`.
#[must_use]
pub fn background_stops(is_day: bool, flags: CategoryFlags) -> &'static [ColorStop] {
    match (is_day, flags.is_cloudy || flags.is_rain) {
        (true, false) => &DAY_CLEAR,
        (true, true) => &DAY_OVERCAST,
        (false, _) => &NIGHT,
    }
}

pub fn draw_background<S: Surface>(surface: &mut S, is_day: bool, flags: CategoryFlags) {
    let (width, height) = surface.size();
    let (w, h) = (width as f32, height as f32);
    let gradient = LinearGradient::vertical(0.0, h, background_stops(is_day, flags));
    surface.fill_rect_gradient(Rect::new(0.0, 0.0, w, h), &gradient);
}

/// Stars twinkle with `|sin(now * speed + x)|`, or hold their base opacity.
pub fn draw_stars<S: Surface>(surface: &mut S, stars: &[Star], now: NaiveDateTime, twinkle: bool) {
    let now_millis = now.and_utc().timestamp_millis();
    for star in stars {
        let opacity = if twinkle {
            star.twinkle_opacity(now_millis)
        } else {
            star.opacity
        };
        surface.fill_circle(
            Point::new(star.x, star.y),
            star.radius,
            &Paint::Solid(Rgba::WHITE.with_alpha(opacity)),
        );
    }
}

pub fn draw_celestial<S: Surface>(surface: &mut S, body: &CelestialBody) {
    let scale = surface_scale(surface.size().1);
    let center = body.position;
    match body.kind {
        BodyKind::Sun => {
            let radius = (SUN_RADIUS * scale).max(1.0);
            let halo = radius * SUN_GLOW_FACTOR;
            surface.fill_circle(
                center,
                halo,
                &Paint::Radial(RadialGradient::new(center, radius, halo, &SUN_GLOW)),
            );
            surface.fill_circle(
                center,
                radius,
                &Paint::Radial(RadialGradient::new(center, 0.0, radius, &SUN_CORE)),
            );
        }
        BodyKind::Moon => {
            let radius = (MOON_RADIUS * scale).max(1.0);
            let halo = radius * MOON_GLOW_FACTOR;
            surface.fill_circle(
                center,
                halo,
                &Paint::Radial(RadialGradient::new(center, radius, halo, &MOON_GLOW)),
            );
            surface.fill_circle(center, radius, &Paint::Solid(MOON_CORE));
        }
    }
}

pub fn draw_precipitation<S: Surface>(surface: &mut S, precipitation: &Precipitation) {
    let scale = surface_scale(surface.size().1);
    match precipitation {
        Precipitation::None => {}
        Precipitation::Rain(drops) => {
            let width = (RAIN_STROKE_WIDTH * scale).max(1.0);
            for drop in drops {
                surface.stroke_line(
                    Point::new(drop.x, drop.y),
                    Point::new(drop.x, drop.y + drop.trail_length),
                    width,
                    RAIN_COLOR.with_alpha(drop.opacity),
                );
            }
        }
        Precipitation::Snow(flakes) => {
            for flake in flakes {
                surface.fill_circle(
                    Point::new(flake.x, flake.y),
                    flake.radius,
                    &Paint::Solid(Rgba::WHITE.with_alpha(flake.opacity)),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::sky::classify,
        render::recording::{DrawOp, RecordingSurface},
        sky::population::{RainParticle, SnowParticle},
    };

    fn noon() -> NaiveDateTime {
        crate::domain::sky::parse_datetime("2026-02-12T12:00").expect("time")
    }

    #[test]
    fn background_palette_depends_on_day_cloud_and_rain() {
        assert_eq!(background_stops(true, classify(0, 0.0)).len(), 3);
        assert_eq!(background_stops(true, classify(3, 0.0)).len(), 2);
        assert_eq!(background_stops(true, classify(61, 0.0)).len(), 2);
        assert_eq!(
            background_stops(false, classify(61, 0.0))[0].color,
            Rgba::rgb(0x0D, 0x11, 0x17)
        );
        assert_eq!(background_stops(true, classify(73, 0.0)).len(), 3);
    }

    #[test]
    fn background_fills_whole_surface() {
        let mut surface = RecordingSurface::new(320, 200);
        draw_background(&mut surface, true, classify(0, 0.0));
        let [DrawOp::FillRectGradient { rect, gradient }] = surface.ops() else {
            panic!("expected one gradient fill, got {:?}", surface.ops());
        };
        assert_eq!(*rect, Rect::new(0.0, 0.0, 320.0, 200.0));
        assert!((gradient.y1 - 200.0).abs() < f32::EPSILON);
    }

    #[test]
    fn stars_draw_base_opacity_without_twinkle() {
        let mut surface = RecordingSurface::new(100, 100);
        let star = Star {
            x: 10.0,
            y: 10.0,
            radius: 1.0,
            opacity: 0.42,
            twinkle_speed: 0.01,
        };
        draw_stars(&mut surface, &[star], noon(), false);
        let [DrawOp::FillCircle { paint: Paint::Solid(color), .. }] = surface.ops() else {
            panic!("expected one star");
        };
        assert!((color.a - 0.42).abs() < f32::EPSILON);
    }

    #[test]
    fn sun_draws_glow_then_core_and_moon_is_smaller() {
        let body = CelestialBody {
            kind: BodyKind::Sun,
            progress: 0.5,
            position: Point::new(540.0, 162.0),
        };
        let mut surface = RecordingSurface::new(1920, 1080);
        draw_celestial(&mut surface, &body);
        let radii: Vec<f32> = surface
            .ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::FillCircle { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![420.0, 70.0]);

        let mut surface = RecordingSurface::new(1920, 1080);
        draw_celestial(
            &mut surface,
            &CelestialBody {
                kind: BodyKind::Moon,
                ..body
            },
        );
        let DrawOp::FillCircle { radius, paint, .. } = &surface.ops()[1] else {
            panic!("expected moon core");
        };
        assert!((radius - 50.0).abs() < f32::EPSILON);
        assert_eq!(*paint, Paint::Solid(MOON_CORE));
    }

    #[test]
    fn rain_draws_trail_below_particle() {
        let mut surface = RecordingSurface::new(1920, 1080);
        let drops = vec![RainParticle {
            x: 5.0,
            y: 10.0,
            speed: 3.0,
            trail_length: 25.0,
            opacity: 0.3,
        }];
        draw_precipitation(&mut surface, &Precipitation::Rain(drops));
        let [DrawOp::StrokeLine { from, to, .. }] = surface.ops() else {
            panic!("expected a rain stroke");
        };
        assert_eq!(*from, Point::new(5.0, 10.0));
        assert_eq!(*to, Point::new(5.0, 35.0));
    }

    #[test]
    fn snow_draws_circles_and_clear_draws_nothing() {
        let mut surface = RecordingSurface::new(100, 100);
        let flakes = vec![
            SnowParticle {
                x: 1.0,
                y: 2.0,
                speed: 1.0,
                radius: 2.0,
                opacity: 0.5,
            };
            3
        ];
        draw_precipitation(&mut surface, &Precipitation::Snow(flakes));
        assert_eq!(surface.draw_calls(), 3);

        let mut surface = RecordingSurface::new(100, 100);
        draw_precipitation(&mut surface, &Precipitation::None);
        assert_eq!(surface.draw_calls(), 0);
    }
}
