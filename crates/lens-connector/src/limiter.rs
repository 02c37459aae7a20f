//! Ingest flood guard — token bucket per caller key.

use std::collections::HashMap;
use std::time::Instant;

/// Token-bucket limiter guarding the ingest routes.
///
/// One bucket per key (the task id for record batches). Buckets refill
/// continuously up to the burst capacity; an empty bucket rejects the call.
#[derive(Debug)]
pub struct RateLimiter {
    buckets: HashMap<String, Bucket>,
    burst: u32,
    refill_per_sec: f64,
}

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    touched: Instant,
}

impl RateLimiter {
    /// Create a limiter.
    /// - `burst`: max tokens a bucket holds
    /// - `refill_per_sec`: steady-state refill rate
    pub fn new(burst: u32, refill_per_sec: f64) -> Self {
        Self { buckets: HashMap::new(), burst, refill_per_sec }
    }

    /// Take one token for `key`. Returns false when the caller must back off.
    pub fn allow(&mut self, key: &str) -> bool {
        let now = Instant::now();
        let burst = self.burst as f64;
        let bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert_with(|| Bucket { tokens: burst, touched: now });
        let elapsed = now.duration_since(bucket.touched).as_secs_f64();
        bucket.tokens = (bucket.tokens + elapsed * self.refill_per_sec).min(burst);
        bucket.touched = now;
        if bucket.tokens >= 1.0 {
            bucket.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Drop buckets that have refilled back to burst (idle callers), keeping
    /// the map bounded on a long-running sidecar.
    pub fn prune_idle(&mut self, now: Instant) {
        let burst = self.burst as f64;
        let refill = self.refill_per_sec;
        self.buckets.retain(|_, bucket| {
            let elapsed = now.duration_since(bucket.touched).as_secs_f64();
            bucket.tokens + elapsed * refill < burst
        });
    }
}
