#![allow(dead_code)]

use chrono::NaiveDateTime;
use mirror_sky::{
    domain::sky::{SkyInput, parse_datetime},
    render::{DrawOp, RecordingSurface},
    sky::{SkyConfig, SkyRenderer},
};

pub fn at(value: &str) -> NaiveDateTime {
    parse_datetime(value).expect("valid time fixture")
}

/// Sun window from the reference scenarios: 06:00 to 20:00.
pub fn sky(code: i32, is_day: bool, precipitation_mm: f32) -> SkyInput {
    SkyInput::new(code, is_day)
        .with_sun_window(at("2026-02-12T06:00"), at("2026-02-12T20:00"))
        .with_precipitation(precipitation_mm)
}

pub fn mounted(input: SkyInput, width: u32, height: u32) -> SkyRenderer<RecordingSurface> {
    let mut renderer = SkyRenderer::with_seed(SkyConfig::default(), 2026);
    renderer
        .mount(RecordingSurface::new(width, height), input)
        .expect("mount recording surface");
    renderer
}

pub fn last_frame(renderer: &SkyRenderer<RecordingSurface>) -> Vec<DrawOp> {
    renderer
        .surface()
        .expect("renderer is running")
        .last_frame()
        .to_vec()
}

pub fn count(ops: &[DrawOp], pred: impl Fn(&DrawOp) -> bool) -> usize {
    ops.iter().filter(|op| pred(op)).count()
}
