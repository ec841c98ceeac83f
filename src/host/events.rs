#![allow(clippy::cast_precision_loss)]

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use rand::Rng;
use tokio::{
    sync::mpsc::Sender,
    task::JoinHandle,
    time::{MissedTickBehavior, interval, sleep},
};

#[derive(Debug)]
pub enum HostEvent {
    Bootstrap,
    TickFrame,
    TickRefresh,
    Input(Event),
    Quit,
}

pub fn spawn_input_task() -> impl futures::Stream<Item = Event> {
    EventStream::new().filter_map(|event| async move { event.ok() })
}

/// Owned handle to the animation clock. Dropping it stops the ticks.
#[derive(Debug)]
pub struct FrameTask {
    handle: JoinHandle<()>,
    fps: u8,
}

impl FrameTask {
    #[must_use]
    pub fn fps(&self) -> u8 {
        self.fps
    }

    #[cfg(test)]
    fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for FrameTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[must_use]
pub fn start_frame_task(tx: Sender<HostEvent>, fps: u8) -> FrameTask {
    let fps = fps.clamp(1, 60);
    let handle = tokio::spawn(async move {
        let mut ticker = interval(Duration::from_millis(1000_u64 / u64::from(fps)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if tx.send(HostEvent::TickFrame).await.is_err() {
                break;
            }
        }
    });
    FrameTask { handle, fps }
}

/// Turns SIGINT into a quit request, for when the terminal is not in raw mode.
pub fn spawn_shutdown_task(tx: Sender<HostEvent>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = tx.send(HostEvent::Quit).await;
        }
    });
}

pub fn start_refresh_task(tx: Sender<HostEvent>, refresh: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let base = refresh.as_secs_f32().max(1.0);
        loop {
            let wait_secs = {
                let mut rng = rand::rng();
                let jitter = rng.random_range(-0.1f32..0.1f32);
                (base * (1.0 + jitter)).max(1.0)
            };
            sleep(Duration::from_secs_f32(wait_secs)).await;
            if tx.send(HostEvent::TickRefresh).await.is_err() {
                break;
            }
        }
    })
}
