use std::time::{Duration, Instant};

/// Default lifetime of a validation message.
pub const DEFAULT_FLASH_DURATION: Duration = Duration::from_secs(3);

/// A transient, auto-clearing validation message.
///
/// Only one message is shown at a time: a newer message replaces the current
/// one and restarts its deadline.
#[derive(Debug, Clone)]
pub struct Flash {
    message: Option<String>,
    expires_at: Option<Instant>,
    duration: Duration,
}

impl Flash {
    /// Create an empty flash with the default duration.
    pub fn new() -> Self {
        Self::with_duration(DEFAULT_FLASH_DURATION)
    }

    /// Create an empty flash whose messages live for `duration`.
    pub fn with_duration(duration: Duration) -> Self {
        Self {
            message: None,
            expires_at: None,
            duration,
        }
    }

    /// Show a message starting now.
    pub fn show(&mut self, message: impl Into<String>) {
        self.show_at(message, Instant::now());
    }

    /// Show a message starting at `now`.
    pub fn show_at(&mut self, message: impl Into<String>, now: Instant) {
        self.message = Some(message.into());
        self.expires_at = Some(now + self.duration);
    }

    /// Show a message that stays until cleared.
    pub fn pin(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.expires_at = None;
    }

    pub fn clear(&mut self) {
        self.message = None;
        self.expires_at = None;
    }

    /// Expire the message if its deadline has passed. Returns whether it was
    /// cleared.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) if now >= deadline => {
                self.clear();
                true
            }
            _ => false,
        }
    }

    /// The message currently shown, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn is_shown(&self) -> bool {
        self.message.is_some()
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for Flash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_expires_after_duration() {
        let start = Instant::now();
        let mut flash = Flash::new();
        flash.show_at("Tag already exists", start);

        assert!(!flash.tick(start + Duration::from_secs(2)));
        assert_eq!(flash.message(), Some("Tag already exists"));

        assert!(flash.tick(start + DEFAULT_FLASH_DURATION));
        assert_eq!(flash.message(), None);
    }

    #[test]
    fn test_newer_message_replaces_deadline() {
        let start = Instant::now();
        let mut flash = Flash::with_duration(Duration::from_secs(3));
        flash.show_at("first", start);
        flash.show_at("second", start + Duration::from_secs(2));

        // The first deadline has passed but the replacement is still live.
        assert!(!flash.tick(start + Duration::from_secs(3)));
        assert_eq!(flash.message(), Some("second"));
        assert!(flash.tick(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_pinned_message_never_expires() {
        let mut flash = Flash::new();
        flash.pin("Minimum of 1 row(s) required.");
        assert!(!flash.tick(Instant::now() + Duration::from_secs(3600)));
        assert!(flash.is_shown());
    }
}
