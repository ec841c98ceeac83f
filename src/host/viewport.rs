use tokio::sync::watch;

/// Drawable area in sky pixels. One terminal cell holds two stacked pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewportSize {
    pub width: u32,
    pub height: u32,
}

impl ViewportSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn from_cells(columns: u16, rows: u16) -> Self {
        Self {
            width: u32::from(columns),
            height: u32::from(rows) * 2,
        }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Publishes viewport changes to whoever is currently listening.
#[derive(Debug)]
pub struct ViewportHub {
    tx: watch::Sender<ViewportSize>,
}

impl ViewportHub {
    #[must_use]
    pub fn new(initial: ViewportSize) -> Self {
        Self {
            tx: watch::Sender::new(initial),
        }
    }

    /// Returns `true` when the size actually changed.
    pub fn publish(&self, size: ViewportSize) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == size {
                false
            } else {
                *current = size;
                true
            }
        })
    }

    #[must_use]
    pub fn current(&self) -> ViewportSize {
        *self.tx.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> ResizeSubscription {
        ResizeSubscription {
            rx: self.tx.subscribe(),
        }
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

/// A live resize listener. Dropping it unsubscribes.
#[derive(Debug)]
pub struct ResizeSubscription {
    rx: watch::Receiver<ViewportSize>,
}

impl ResizeSubscription {
    /// The newest size published since the last call, if any.
    pub fn take(&mut self) -> Option<ViewportSize> {
        if self.rx.has_changed().unwrap_or(false) {
            Some(*self.rx.borrow_and_update())
        } else {
            None
        }
    }

    #[must_use]
    pub fn current(&self) -> ViewportSize {
        *self.rx.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_map_to_half_block_pixels() {
        assert_eq!(ViewportSize::from_cells(80, 24), ViewportSize::new(80, 48));
        assert!(ViewportSize::from_cells(0, 24).is_empty());
    }

    #[test]
    fn subscription_sees_only_new_sizes() {
        let hub = ViewportHub::new(ViewportSize::new(80, 48));
        let mut sub = hub.subscribe();
        assert_eq!(sub.take(), None);

        assert!(hub.publish(ViewportSize::new(100, 60)));
        assert!(!hub.publish(ViewportSize::new(100, 60)));
        assert_eq!(sub.take(), Some(ViewportSize::new(100, 60)));
        assert_eq!(sub.take(), None);
        assert_eq!(sub.current(), hub.current());
    }

    #[test]
    fn coalesces_bursts_to_latest_size() {
        let hub = ViewportHub::new(ViewportSize::new(10, 10));
        let mut sub = hub.subscribe();
        hub.publish(ViewportSize::new(20, 20));
        hub.publish(ViewportSize::new(30, 30));
        assert_eq!(sub.take(), Some(ViewportSize::new(30, 30)));
    }

    #[test]
    fn dropping_subscription_removes_listener() {
        let hub = ViewportHub::new(ViewportSize::default());
        assert_eq!(hub.listener_count(), 0);
        let sub = hub.subscribe();
        assert_eq!(hub.listener_count(), 1);
        drop(sub);
        assert_eq!(hub.listener_count(), 0);
        assert!(hub.publish(ViewportSize::new(5, 5)));
    }
}
