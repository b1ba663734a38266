//! Polling scheduler
//!
//! Runs one [`PollJob`] on a fixed interval and on demand, publishing each
//! completed cycle through a `watch` channel. Readers always see the last
//! complete result; a cycle in flight only flips the `loading` flag.
//!
//! # Cycle rules
//! - A tick or refresh arriving while a cycle is in flight is skipped.
//! - Cycle ids increase monotonically; a result is published only if its id
//!   is newer than the last published one.
//! - A failed cycle keeps the previous data and records the error.
//! - After `shutdown()` no further result is published.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::{watch, Notify};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::Result;

/// A unit of work run once per polling cycle.
#[async_trait]
pub trait PollJob: Send + Sync + 'static {
    type Output: Clone + Send + Sync + 'static;

    /// Name used in logs
    fn name(&self) -> &str;

    async fn run(&self) -> Result<Self::Output>;
}

/// Published state of one scheduler.
#[derive(Debug, Clone, Serialize)]
pub struct Published<T> {
    /// A cycle is in flight
    pub loading: bool,
    /// Error of the last completed cycle, if it failed
    pub error: Option<String>,
    /// Id of the last completed cycle (0 = none yet)
    pub cycle: u64,
    /// Completion time of the last successful cycle
    pub updated_at: Option<DateTime<Utc>>,
    pub data: Option<Arc<T>>,
}

impl<T> Default for Published<T> {
    fn default() -> Self {
        Self {
            loading: false,
            error: None,
            cycle: 0,
            updated_at: None,
            data: None,
        }
    }
}

pub struct PollingScheduler<J: PollJob> {
    job: J,
    interval: Duration,
}

impl<J: PollJob> PollingScheduler<J> {
    pub fn new(job: J, interval: Duration) -> Self {
        Self { job, interval }
    }

    /// Spawn the polling loop. The first cycle starts immediately.
    pub fn start(self) -> SchedulerHandle<J::Output> {
        let (tx, rx) = watch::channel(Published::default());
        let refresh = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let shared = Arc::new(Shared {
            job: self.job,
            tx,
            refresh: Arc::clone(&refresh),
            cancel: cancel.clone(),
            in_flight: AtomicBool::new(false),
            last_cycle: AtomicU64::new(0),
        });

        tokio::spawn(run_loop(shared, self.interval));

        SchedulerHandle {
            state: rx,
            refresh,
            cancel,
        }
    }
}

/// Cloneable reader/controller for a running scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerHandle<T> {
    state: watch::Receiver<Published<T>>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
}

impl<T: Clone> SchedulerHandle<T> {
    /// Last published state.
    pub fn current(&self) -> Published<T> {
        self.state.borrow().clone()
    }

    /// Request an immediate cycle. Ignored if one is already in flight.
    pub fn refresh(&self) {
        self.refresh.notify_one();
    }

    /// Stop the timer and discard any in-flight result.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled()
    }

    /// Wait until cycle `cycle` (or a later one) has been published.
    ///
    /// Returns the current state if the scheduler goes away first.
    pub async fn wait_for_cycle(&self, cycle: u64) -> Published<T> {
        let mut rx = self.state.clone();
        let state = match rx.wait_for(|s| s.cycle >= cycle).await {
            Ok(state) => state.clone(),
            Err(_) => self.current(),
        };
        state
    }
}

struct Shared<J: PollJob> {
    job: J,
    tx: watch::Sender<Published<J::Output>>,
    refresh: Arc<Notify>,
    cancel: CancellationToken,
    in_flight: AtomicBool,
    last_cycle: AtomicU64,
}

/// Clears the in-flight flag when a cycle task ends, even on panic.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

async fn run_loop<J: PollJob>(shared: Arc<Shared<J>>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(
        job = shared.job.name(),
        interval_ms = period.as_millis() as u64,
        "Scheduler started"
    );

    loop {
        tokio::select! {
            biased;
            _ = shared.cancel.cancelled() => break,
            _ = ticker.tick() => start_cycle(&shared, "tick"),
            _ = shared.refresh.notified() => start_cycle(&shared, "refresh"),
        }
    }

    info!(job = shared.job.name(), "Scheduler stopped");
}

fn start_cycle<J: PollJob>(shared: &Arc<Shared<J>>, trigger: &'static str) {
    if shared
        .in_flight
        .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
        .is_err()
    {
        debug!(job = shared.job.name(), trigger, "Cycle still in flight, skipping");
        return;
    }

    let cycle = shared.last_cycle.fetch_add(1, Ordering::Relaxed) + 1;
    shared.tx.send_modify(|state| state.loading = true);

    let shared = Arc::clone(shared);
    tokio::spawn(async move {
        let _guard = InFlightGuard(&shared.in_flight);
        let started = Instant::now();
        let result = shared.job.run().await;
        publish(&shared, cycle, result, started);
    });
}

fn publish<J: PollJob>(
    shared: &Shared<J>,
    cycle: u64,
    result: Result<J::Output>,
    started: Instant,
) {
    let job = shared.job.name();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if shared.cancel.is_cancelled() {
        debug!(job, cycle, "Scheduler stopped, discarding result");
        shared.tx.send_modify(|state| state.loading = false);
        return;
    }

    let update = match result {
        Ok(data) => {
            debug!(job, cycle, elapsed_ms, "Cycle complete");
            Ok(data)
        }
        Err(e) => {
            warn!(job, cycle, elapsed_ms, error = %e, "Cycle failed, keeping previous data");
            Err(e.to_string())
        }
    };

    shared.tx.send_modify(|state| {
        if cycle <= state.cycle {
            return;
        }
        state.cycle = cycle;
        state.loading = false;
        match update {
            Ok(data) => {
                state.data = Some(Arc::new(data));
                state.error = None;
                state.updated_at = Some(Utc::now());
            }
            Err(message) => state.error = Some(message),
        }
    });
}
