use std::time::Duration;
use tokio::time::Instant;

/// Durations governing a room's background housekeeping. Per-action
/// decision clocks ("time banks") are an explicit non-goal; what's tracked
/// here is purely how long dirty state may go unpersisted and how long a
/// room may sit untouched before the registry purges it.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub persist_interval: Duration,
    pub idle_window: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            persist_interval: Duration::from_secs(30),
            idle_window: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Tracks a room's last-persisted and last-activity instants against its
/// configured durations.
#[derive(Debug)]
pub struct Timer {
    config: TimerConfig,
    last_persisted: Instant,
    last_active: Instant,
}

impl Timer {
    pub fn new(config: TimerConfig) -> Self {
        let now = Instant::now();
        Self {
            config,
            last_persisted: now,
            last_active: now,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(TimerConfig::default())
    }

    /// Marks the room as just having persisted its state.
    pub fn mark_persisted(&mut self) {
        self.last_persisted = Instant::now();
    }

    /// Marks the room as having just received activity (a join, an action,
    /// a chat message).
    pub fn mark_active(&mut self) {
        self.last_active = Instant::now();
    }

    /// True once dirty state has gone unpersisted longer than the
    /// configured persist interval.
    pub fn needs_persist(&self) -> bool {
        self.last_persisted.elapsed() >= self.config.persist_interval
    }

    /// True once the room has sat untouched longer than the configured
    /// idle window; the registry sweeper purges rooms in this state.
    pub fn is_idle(&self) -> bool {
        self.last_active.elapsed() >= self.config.idle_window
    }

    pub fn persist_interval(&self) -> Duration {
        self.config.persist_interval
    }

    pub fn idle_window(&self) -> Duration {
        self.config.idle_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_documented_defaults() {
        let config = TimerConfig::default();
        assert_eq!(config.persist_interval, Duration::from_secs(30));
        assert_eq!(config.idle_window, Duration::from_secs(24 * 60 * 60));
    }

    #[test]
    fn fresh_timer_does_not_need_persist_or_purge() {
        let timer = Timer::with_defaults();
        assert!(!timer.needs_persist());
        assert!(!timer.is_idle());
    }

    #[test]
    fn zero_interval_always_needs_persist() {
        let timer = Timer::new(TimerConfig {
            persist_interval: Duration::from_secs(0),
            idle_window: Duration::from_secs(60),
        });
        assert!(timer.needs_persist());
    }

    #[test]
    fn mark_active_resets_idle_clock() {
        let mut timer = Timer::new(TimerConfig {
            persist_interval: Duration::from_secs(60),
            idle_window: Duration::from_secs(0),
        });
        assert!(timer.is_idle());
        timer.mark_active();
        assert!(timer.is_idle());
    }
}
