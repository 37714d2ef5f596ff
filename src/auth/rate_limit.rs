use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Failed sign-ins allowed per client address within `window`.
#[derive(Clone)]
pub struct RateLimiter {
    attempts: Arc<Mutex<HashMap<IpAddr, Vec<Instant>>>>,
    max_attempts: usize,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(15 * 60))
    }
}

impl RateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        RateLimiter {
            attempts: Arc::new(Mutex::new(HashMap::new())),
            max_attempts,
            window,
        }
    }

    /// True once `ip` has used up its attempts. Stale entries are pruned here.
    pub fn is_blocked(&self, ip: IpAddr) -> bool {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        match map.get_mut(&ip) {
            Some(timestamps) => {
                timestamps.retain(|t| now.duration_since(*t) < self.window);
                let blocked = timestamps.len() >= self.max_attempts;
                if timestamps.is_empty() {
                    map.remove(&ip);
                }
                blocked
            }
            None => false,
        }
    }

    pub fn record_failure(&self, ip: IpAddr) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.entry(ip).or_default().push(Instant::now());
    }

    /// Forget `ip` after a successful sign-in.
    pub fn clear(&self, ip: IpAddr) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&ip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    const IP: IpAddr = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7));

    #[test]
    fn blocks_after_max_failures_and_clears() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        assert!(!limiter.is_blocked(IP));
        limiter.record_failure(IP);
        assert!(!limiter.is_blocked(IP));
        limiter.record_failure(IP);
        assert!(limiter.is_blocked(IP));
        limiter.clear(IP);
        assert!(!limiter.is_blocked(IP));
    }

    #[test]
    fn failures_outside_window_do_not_count() {
        let limiter = RateLimiter::new(1, Duration::ZERO);
        limiter.record_failure(IP);
        assert!(!limiter.is_blocked(IP));
    }
}
