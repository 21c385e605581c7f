//! Per-user cooldown limiter for AI fallback traffic.

use crate::ports::RateLimiter;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// Fixed-window cooldown: one AI call per user per `window_secs`.
pub struct Cooldown {
    window_secs: i64,
    last_call: Mutex<HashMap<i64, i64>>,
}

impl Cooldown {
    pub fn new(window_secs: i64) -> Self {
        Self {
            window_secs,
            last_call: Mutex::new(HashMap::new()),
        }
    }
}

impl RateLimiter for Cooldown {
    fn try_acquire(&self, user_id: i64, now: i64) -> bool {
        let mut map = match self.last_call.lock() {
            Ok(guard) => guard,
            // A poisoned lock means another caller panicked mid-update;
            // the map is still just timestamps, so take it anyway.
            Err(poisoned) => poisoned.into_inner(),
        };

        match map.get(&user_id) {
            Some(&last) if now - last < self.window_secs => {
                debug!(user_id, remaining = self.window_secs - (now - last), "cooldown active");
                false
            }
            _ => {
                map.insert(user_id, now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_call_passes() {
        let limiter = Cooldown::new(10);
        assert!(limiter.try_acquire(1, 100));
    }

    #[test]
    fn test_second_call_within_window_blocked() {
        let limiter = Cooldown::new(10);
        assert!(limiter.try_acquire(1, 100));
        assert!(!limiter.try_acquire(1, 105));
    }

    #[test]
    fn test_call_after_window_passes() {
        let limiter = Cooldown::new(10);
        assert!(limiter.try_acquire(1, 100));
        assert!(limiter.try_acquire(1, 110));
    }

    #[test]
    fn test_users_tracked_independently() {
        let limiter = Cooldown::new(10);
        assert!(limiter.try_acquire(1, 100));
        assert!(limiter.try_acquire(2, 100));
        assert!(!limiter.try_acquire(1, 101));
    }

    #[test]
    fn test_denied_call_does_not_reset_window() {
        let limiter = Cooldown::new(10);
        assert!(limiter.try_acquire(1, 100));
        assert!(!limiter.try_acquire(1, 109));
        // Window is anchored at the last granted call, not the last attempt.
        assert!(limiter.try_acquire(1, 110));
    }
}
