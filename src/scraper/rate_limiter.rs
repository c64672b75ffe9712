//! Global request pacing shared by all fetch workers.
//!
//! Token bucket for the per-minute ceiling, plus a fixed minimum gap
//! between any two grants regardless of which worker asked.

use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};

/// Token bucket rate limiter with a minimum spacing between grants
#[derive(Clone)]
pub struct RateLimiter {
    state: Arc<Mutex<RateLimiterState>>,
}

struct RateLimiterState {
    tokens: f64,
    last_refill: Instant,
    max_tokens: f64,
    refill_rate: f64, // tokens per second
    min_delay: Duration,
    next_slot: Option<Instant>,
}

impl RateLimiter {
    /// # Arguments
    /// * `requests_per_minute` - Ceiling across every holder of this limiter
    /// * `min_delay` - Minimum gap between two consecutive grants
    pub fn new(requests_per_minute: u32, min_delay: Duration) -> Self {
        let max_tokens = requests_per_minute.max(1) as f64;
        Self {
            state: Arc::new(Mutex::new(RateLimiterState {
                tokens: max_tokens,
                last_refill: Instant::now(),
                max_tokens,
                refill_rate: max_tokens / 60.0,
                min_delay,
                next_slot: None,
            })),
        }
    }

    /// Wait until a request may be issued.
    ///
    /// The slot is reserved while the lock is held, so concurrent callers
    /// queue up behind each other instead of firing together.
    pub async fn acquire(&self) {
        let ready_at = {
            let mut state = self.state.lock().await;
            let now = Instant::now();

            // last_refill can sit in the future while a token is owed
            let base = state.last_refill.max(now);
            let elapsed = now.saturating_duration_since(state.last_refill).as_secs_f64();
            state.tokens = (state.tokens + elapsed * state.refill_rate).min(state.max_tokens);
            state.last_refill = base;

            let mut ready_at = state.next_slot.map_or(now, |slot| slot.max(now));
            if state.tokens >= 1.0 {
                state.tokens -= 1.0;
            } else {
                let wait = (1.0 - state.tokens) / state.refill_rate;
                state.tokens = 0.0;
                // Tokens accrued while waiting are spent by this grant
                state.last_refill = base + Duration::from_secs_f64(wait);
                ready_at = ready_at.max(state.last_refill);
            }

            state.next_slot = Some(ready_at + state.min_delay);
            ready_at
        };

        tokio::time::sleep_until(ready_at).await;
    }
}
