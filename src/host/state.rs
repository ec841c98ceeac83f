use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Local, TimeDelta, Utc};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};

use crate::{
    cli::Cli,
    domain::sky::SkyInput,
    host::{
        events::{HostEvent, start_refresh_task},
        feed::{FeedSource, SnapshotFeed},
        freshness::FreshnessState,
        session::SkySession,
        viewport::{ViewportHub, ViewportSize},
    },
    render::framebuffer::Framebuffer,
    settings::RuntimeSettings,
};

/// Demo skies change quickly enough to watch.
pub const DEMO_REFRESH: Duration = Duration::from_secs(8);

#[derive(Debug)]
pub struct AppState {
    pub running: bool,
    pub settings: RuntimeSettings,
    pub feed: SnapshotFeed,
    pub sky: SkySession<Framebuffer>,
    pub viewport: ViewportHub,
    pub freshness: FreshnessState,
    pub last_error: Option<String>,
    pub show_status: bool,
    refresh_interval: Duration,
    refresh_task: Option<JoinHandle<()>>,
}

impl AppState {
    #[must_use]
    pub fn new(cli: &Cli, settings: RuntimeSettings, viewport: ViewportSize) -> Self {
        let source = cli.feed_source();
        let refresh_interval = if matches!(source, FeedSource::Demo) {
            DEMO_REFRESH
        } else {
            settings.refresh_interval()
        };

        Self {
            running: true,
            settings,
            feed: SnapshotFeed::new(source),
            sky: SkySession::with_config(settings.sky_config()),
            viewport: ViewportHub::new(viewport),
            freshness: FreshnessState::Stale,
            last_error: None,
            show_status: !cli.no_status,
            refresh_interval,
            refresh_task: None,
        }
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    #[must_use]
    pub fn current_input(&self) -> Option<&SkyInput> {
        self.feed.current()
    }

    pub async fn handle_event(&mut self, event: HostEvent, tx: &mpsc::Sender<HostEvent>) -> Result<()> {
        self.handle_event_at(event, tx, Local::now()).await
    }

    /// Event handling against an explicit clock.
    pub async fn handle_event_at(
        &mut self,
        event: HostEvent,
        tx: &mpsc::Sender<HostEvent>,
        now: DateTime<Local>,
    ) -> Result<()> {
        match event {
            HostEvent::Bootstrap => {
                info!(
                    refresh_secs = self.refresh_interval.as_secs(),
                    fps = self.settings.frame_rate(),
                    "bootstrapping sky host"
                );
                self.refresh_task = Some(start_refresh_task(tx.clone(), self.refresh_interval));
                self.refresh(tx, now);
            }
            HostEvent::TickFrame => {
                self.reconcile(tx, now);
                self.sky.on_frame(now.naive_local());
            }
            HostEvent::TickRefresh => self.refresh(tx, now),
            HostEvent::Input(event) => self.handle_input(event, tx, now).await?,
            HostEvent::Quit => {
                self.running = false;
                self.sky.unmount();
                if let Some(task) = self.refresh_task.take() {
                    task.abort();
                }
            }
        }

        Ok(())
    }

    async fn handle_input(
        &mut self,
        event: Event,
        tx: &mpsc::Sender<HostEvent>,
        now: DateTime<Local>,
    ) -> Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Esc | KeyCode::Char('q') => {
                    tx.send(HostEvent::Quit).await?;
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    tx.send(HostEvent::Quit).await?;
                }
                KeyCode::Char('r') => self.refresh(tx, now),
                _ => {}
            },
            Event::Resize(columns, rows) => {
                let size = ViewportSize::from_cells(columns, rows);
                if self.viewport.publish(size) {
                    debug!(width = size.width, height = size.height, "viewport changed");
                }
                if self.sky.is_mounted() {
                    self.sky.sync_viewport();
                } else {
                    self.reconcile(tx, now);
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn refresh(&mut self, tx: &mpsc::Sender<HostEvent>, now: DateTime<Local>) {
        match self.feed.refresh(now) {
            Ok(input) => {
                self.last_error = None;
                self.sky.update(input);
            }
            Err(err) => self.last_error = Some(err.to_string()),
        }
        self.reconcile(tx, now);
    }

    /// Keeps the sky mounted exactly while the feed is not offline and there
    /// is something to draw into.
    fn reconcile(&mut self, tx: &mpsc::Sender<HostEvent>, now: DateTime<Local>) {
        let interval = TimeDelta::from_std(self.refresh_interval).unwrap_or(TimeDelta::minutes(10));
        let freshness = self.feed.freshness(now.with_timezone(&Utc), interval);
        if freshness != self.freshness {
            debug!(from = ?self.freshness, to = ?freshness, "feed freshness changed");
            self.freshness = freshness;
        }

        if freshness == FreshnessState::Offline {
            if self.sky.is_mounted() {
                warn!(
                    failures = self.feed.consecutive_failures(),
                    "sky input offline, unmounting sky"
                );
                self.sky.unmount();
            }
            return;
        }

        if self.sky.is_mounted() || self.viewport.current().is_empty() {
            return;
        }
        let Some(input) = self.feed.current().cloned() else {
            return;
        };
        let size = self.viewport.current();
        let surface = Framebuffer::new(size.width, size.height);
        if let Err(err) = self.sky.mount(
            surface,
            input,
            &self.viewport,
            tx.clone(),
            self.settings.frame_rate(),
        ) {
            warn!(error = %err, "sky mount failed");
        }
    }
}
