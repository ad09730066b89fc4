//! Per-client token bucket admission control.
//!
//! Each client key owns an independent GCRA bucket from `governor`, created
//! full on first sight. A background sweeper evicts clients that have been idle
//! longer than the configured threshold.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use governor::clock::{Clock, DefaultClock, Reference};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

type Bucket<C> = RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

/// Limiter settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RateLimiterConfig {
    /// When false, [`ClientRateLimiter::allow`] admits everything and never
    /// touches the registry.
    pub enabled: bool,
    /// Refill rate.
    pub requests_per_second: f64,
    /// Bucket capacity.
    pub burst: NonZeroU32,
    pub sweep_interval: Duration,
    /// Entries idle for longer than this are evicted. Kept above
    /// `sweep_interval` so a client is never dropped mid-burst.
    pub idle_timeout: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            requests_per_second: 2.0,
            burst: NonZeroU32::new(4).unwrap_or(NonZeroU32::MIN),
            sweep_interval: Duration::from_secs(60),
            idle_timeout: Duration::from_secs(180),
        }
    }
}

impl RateLimiterConfig {
    fn quota(&self) -> Quota {
        let rps = self.requests_per_second;
        let period = if rps.is_finite() && rps > 0.0 {
            Duration::from_secs_f64(1.0 / rps)
        } else {
            Duration::from_secs(1)
        };

        Quota::with_period(period)
            .unwrap_or_else(|| Quota::per_second(NonZeroU32::MAX))
            .allow_burst(self.burst)
    }
}

struct ClientEntry<C: Clock> {
    bucket: Bucket<C>,
    last_seen: C::Instant,
}

/// Registry of per-client buckets.
///
/// Every registry access, including the sweep, runs under one mutex held only
/// for the lookup or scan itself.
pub struct ClientRateLimiter<C: Clock = DefaultClock> {
    config: RateLimiterConfig,
    quota: Quota,
    clock: C,
    clients: Mutex<HashMap<String, ClientEntry<C>>>,
}

impl ClientRateLimiter<DefaultClock> {
    pub fn new(config: RateLimiterConfig) -> Self {
        Self::with_clock(config, DefaultClock::default())
    }
}

impl<C: Clock + Clone> ClientRateLimiter<C> {
    pub fn with_clock(config: RateLimiterConfig, clock: C) -> Self {
        Self {
            quota: config.quota(),
            config,
            clock,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }

    fn clients(&self) -> MutexGuard<'_, HashMap<String, ClientEntry<C>>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Withdraws one token from the client's bucket. `false` means the request
    /// must be rejected.
    pub fn allow(&self, client_key: &str) -> bool {
        if !self.config.enabled {
            return true;
        }

        let now = self.clock.now();
        let mut clients = self.clients();
        let entry = clients
            .entry(client_key.to_owned())
            .or_insert_with(|| ClientEntry {
                bucket: RateLimiter::direct_with_clock(self.quota, self.clock.clone()),
                last_seen: now,
            });
        entry.last_seen = now;

        entry.bucket.check().is_ok()
    }

    /// Evicts entries idle for longer than the idle timeout. Returns how many
    /// were removed.
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let idle_timeout = self.config.idle_timeout;

        let mut clients = self.clients();
        let before = clients.len();
        clients.retain(|_, entry| Duration::from(now.duration_since(entry.last_seen)) <= idle_timeout);

        before - clients.len()
    }

    /// Number of tracked clients.
    pub fn len(&self) -> usize {
        self.clients().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, client_key: &str) -> bool {
        self.clients().contains_key(client_key)
    }
}

impl<C> ClientRateLimiter<C>
where
    C: Clock + Clone + Send + Sync + 'static,
    C::Instant: Send + Sync,
{
    /// Starts the periodic sweep on the current tokio runtime.
    ///
    /// The first sweep happens one interval after the call.
    pub fn spawn_sweeper(self: &Arc<Self>) -> SweeperHandle {
        let limiter = Arc::clone(self);
        let period = self.config.sweep_interval;
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = ticker.tick() => {
                        let removed = limiter.sweep();
                        if removed > 0 {
                            debug!(removed, remaining = limiter.len(), "Evicted idle rate limiter clients");
                        }
                    }
                }
            }
        });

        SweeperHandle {
            stop: Some(stop_tx),
            task,
        }
    }
}

/// Owner of a running sweeper task.
pub struct SweeperHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweeper and waits for it to exit.
    pub async fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Err(e) = (&mut self.task).await {
            warn!(error = %e, "Rate limiter sweeper ended abnormally");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use governor::clock::FakeRelativeClock;

    fn config(rps: f64, burst: u32) -> RateLimiterConfig {
        RateLimiterConfig {
            enabled: true,
            requests_per_second: rps,
            burst: NonZeroU32::new(burst).unwrap(),
            sweep_interval: Duration::from_secs(60),
            idle_timeout: Duration::from_secs(180),
        }
    }

    fn limiter(config: RateLimiterConfig) -> (ClientRateLimiter<FakeRelativeClock>, FakeRelativeClock) {
        let clock = FakeRelativeClock::default();
        (ClientRateLimiter::with_clock(config, clock.clone()), clock)
    }

    #[test]
    fn test_burst_then_reject() {
        let (limiter, _clock) = limiter(config(2.0, 4));

        for i in 0..4 {
            assert!(limiter.allow("10.0.0.1"), "request {i} should pass");
        }
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_refill_after_one_second() {
        let (limiter, clock) = limiter(config(2.0, 4));

        for _ in 0..4 {
            assert!(limiter.allow("10.0.0.1"));
        }
        assert!(!limiter.allow("10.0.0.1"));

        clock.advance(Duration::from_secs(1));

        assert!(limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_clients_have_independent_buckets() {
        let (limiter, _clock) = limiter(config(1.0, 1));

        assert!(limiter.allow("a"));
        assert!(!limiter.allow("a"));
        assert!(limiter.allow("b"));
    }

    #[test]
    fn test_disabled_limiter_admits_everything_without_tracking() {
        let (limiter, _clock) = limiter(RateLimiterConfig {
            enabled: false,
            ..config(1.0, 1)
        });

        for _ in 0..100 {
            assert!(limiter.allow("10.0.0.1"));
        }
        assert!(limiter.is_empty());
    }

    #[test]
    fn test_sweep_evicts_idle_and_keeps_recent() {
        let (limiter, clock) = limiter(config(2.0, 4));

        limiter.allow("idle");
        clock.advance(Duration::from_secs(120));
        limiter.allow("recent");
        clock.advance(Duration::from_secs(61));

        assert_eq!(limiter.sweep(), 1);
        assert!(!limiter.contains("idle"));
        assert!(limiter.contains("recent"));
    }

    #[test]
    fn test_evicted_client_starts_with_full_bucket() {
        let (limiter, clock) = limiter(config(0.001, 2));

        assert!(limiter.allow("c"));
        assert!(limiter.allow("c"));
        assert!(!limiter.allow("c"));

        clock.advance(Duration::from_secs(181));
        limiter.sweep();

        assert!(limiter.allow("c"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_task_runs_and_stops() {
        let clock = FakeRelativeClock::default();
        let limiter = Arc::new(ClientRateLimiter::with_clock(
            RateLimiterConfig {
                sweep_interval: Duration::from_secs(1),
                idle_timeout: Duration::from_secs(2),
                ..config(2.0, 4)
            },
            clock.clone(),
        ));

        limiter.allow("10.0.0.1");
        clock.advance(Duration::from_secs(5));

        let handle = limiter.spawn_sweeper();
        tokio::time::sleep(Duration::from_millis(2500)).await;

        assert!(limiter.is_empty());
        handle.stop().await;
    }
}
