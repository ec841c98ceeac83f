use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use clap::Parser;
use mirror_sky::{
    cli::Cli,
    host::{
        events::HostEvent, feed::DEMO_SCENES, freshness::FreshnessState, state::AppState,
        viewport::ViewportSize,
    },
    settings::RuntimeSettings,
};
use tokio::{sync::mpsc, time::timeout};

fn local_noon() -> DateTime<Local> {
    Local
        .with_ymd_and_hms(2026, 2, 12, 12, 0, 0)
        .single()
        .expect("unambiguous local time")
}

fn app(args: &[&str]) -> AppState {
    let cli = Cli::parse_from(std::iter::once("mirror-sky").chain(args.iter().copied()));
    cli.validate().expect("valid arguments");
    let settings = RuntimeSettings::from_cli_defaults(&cli).clamped();
    AppState::new(&cli, settings, ViewportSize::from_cells(40, 12))
}

#[tokio::test]
async fn demo_feed_walks_every_scene_without_remounting() {
    let (tx, _rx) = mpsc::channel(256);
    let mut app = app(&["--demo"]);
    app.handle_event_at(HostEvent::Bootstrap, &tx, local_noon())
        .await
        .expect("bootstrap");

    let mut seen = Vec::new();
    for _ in 0..DEMO_SCENES.len() {
        assert!(app.sky.is_mounted());
        let input = app.sky.renderer().input().expect("mounted input").clone();
        seen.push((input.weather_code, input.is_day));

        app.handle_event_at(HostEvent::TickFrame, &tx, local_noon())
            .await
            .expect("frame");
        app.handle_event_at(HostEvent::TickRefresh, &tx, local_noon())
            .await
            .expect("refresh");
    }

    let expected: Vec<_> = DEMO_SCENES
        .iter()
        .map(|(code, is_day, _)| (*code, *is_day))
        .collect();
    assert_eq!(seen, expected);
    assert_eq!(app.freshness, FreshnessState::Fresh);
    assert_eq!(app.sky.renderer().frames_drawn(), DEMO_SCENES.len() as u64);
}

#[tokio::test]
async fn mounted_sky_feeds_frame_ticks_back_into_the_loop() {
    let (tx, mut rx) = mpsc::channel(256);
    let mut app = app(&["--code", "71", "--fps", "60"]);
    app.handle_event_at(HostEvent::Bootstrap, &tx, local_noon())
        .await
        .expect("bootstrap");

    for _ in 0..3 {
        let event = timeout(Duration::from_secs(2), async {
            loop {
                match rx.recv().await {
                    Some(HostEvent::TickFrame) => break HostEvent::TickFrame,
                    Some(_) => {}
                    None => panic!("channel closed"),
                }
            }
        })
        .await
        .expect("frame tick arrives");
        app.handle_event_at(event, &tx, local_noon())
            .await
            .expect("frame");
    }
    assert_eq!(app.sky.renderer().frames_drawn(), 3);

    app.handle_event_at(HostEvent::Quit, &tx, local_noon())
        .await
        .expect("quit");
    assert!(!app.running);
    assert!(app.sky.renderer().surface().is_none());
}
