use chrono::{DateTime, TimeDelta, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreshnessState {
    Fresh,
    Stale,
    Offline,
}

impl FreshnessState {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Fresh => "live",
            Self::Stale => "stale",
            Self::Offline => "offline",
        }
    }
}

/// Consecutive failures after which the feed counts as offline.
pub const OFFLINE_FAILURES: u32 = 3;

/// Classifies feed health. Thresholds scale with the refresh interval:
/// stale after two missed refreshes, offline after four.
#[must_use]
pub fn evaluate_freshness(
    last_success: Option<DateTime<Utc>>,
    consecutive_failures: u32,
    now: DateTime<Utc>,
    refresh_interval: TimeDelta,
) -> FreshnessState {
    let Some(last_success) = last_success else {
        return if consecutive_failures >= OFFLINE_FAILURES {
            FreshnessState::Offline
        } else {
            FreshnessState::Stale
        };
    };

    let age = now - last_success;

    if age > refresh_interval * 4 || consecutive_failures >= OFFLINE_FAILURES {
        FreshnessState::Offline
    } else if age > refresh_interval * 2 || consecutive_failures >= 1 {
        FreshnessState::Stale
    } else {
        FreshnessState::Fresh
    }
}
