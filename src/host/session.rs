use chrono::NaiveDateTime;
use tokio::sync::mpsc::Sender;
use tracing::debug;

use crate::{
    domain::sky::SkyInput,
    host::{
        events::{FrameTask, HostEvent, start_frame_task},
        viewport::{ResizeSubscription, ViewportHub},
    },
    render::surface::Surface,
    sky::renderer::{SkyConfig, SkyError, SkyRenderer},
};

/// Resources held only while the sky is on screen.
#[derive(Debug)]
struct Attachment {
    frames: FrameTask,
    resize: ResizeSubscription,
}

/// The sky renderer plus the frame clock and resize listener it runs on.
///
/// Mounting acquires both; unmounting (or dropping the session) releases
/// both, so no tick or resize reaches a stopped sky.
#[derive(Debug)]
pub struct SkySession<S: Surface> {
    renderer: SkyRenderer<S>,
    attachment: Option<Attachment>,
}

impl<S: Surface> SkySession<S> {
    #[must_use]
    pub fn new(renderer: SkyRenderer<S>) -> Self {
        Self {
            renderer,
            attachment: None,
        }
    }

    #[must_use]
    pub fn with_config(config: SkyConfig) -> Self {
        Self::new(SkyRenderer::new(config))
    }

    /// Mounts the sky and starts its frame clock. The surface is first
    /// fitted to the hub's current viewport.
    ///
    /// # Errors
    ///
    /// Whatever [`SkyRenderer::mount`] rejects; nothing is left running.
    pub fn mount(
        &mut self,
        mut surface: S,
        input: SkyInput,
        viewport: &ViewportHub,
        tx: Sender<HostEvent>,
        fps: u8,
    ) -> Result<(), SkyError> {
        let size = viewport.current();
        if surface.size() != (size.width, size.height) {
            surface.resize(size.width, size.height);
        }
        let resize = viewport.subscribe();
        self.renderer.mount(surface, input)?;
        debug!(fps, listeners = viewport.listener_count(), "sky attached to viewport");
        self.attachment = Some(Attachment {
            frames: start_frame_task(tx, fps),
            resize,
        });
        Ok(())
    }

    /// Applies a pending viewport change, if any.
    pub fn sync_viewport(&mut self) -> bool {
        let Some(attachment) = self.attachment.as_mut() else {
            return false;
        };
        let Some(size) = attachment.resize.take() else {
            return false;
        };
        self.renderer.resize(size.width, size.height);
        true
    }

    /// One animation frame; picks up resizes first so the draw uses the
    /// latest bounds.
    pub fn on_frame(&mut self, now: NaiveDateTime) -> bool {
        if self.attachment.is_none() {
            return false;
        }
        self.sync_viewport();
        self.renderer.tick(now)
    }

    pub fn update(&mut self, input: SkyInput) -> bool {
        self.renderer.update(input)
    }

    /// Stops the frame clock, drops the resize listener and returns the
    /// surface. Idempotent.
    pub fn unmount(&mut self) -> Option<S> {
        if let Some(attachment) = self.attachment.take() {
            debug!(fps = attachment.frames.fps(), "stopping sky frame task");
            attachment.frames.stop();
        }
        self.renderer.unmount()
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.attachment.is_some() && self.renderer.is_running()
    }

    #[must_use]
    pub fn renderer(&self) -> &SkyRenderer<S> {
        &self.renderer
    }

    #[must_use]
    pub fn fps(&self) -> Option<u8> {
        self.attachment.as_ref().map(|a| a.frames.fps())
    }
}
