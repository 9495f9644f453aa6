//! Polling session: the table's refresh timers, scoped to the session

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::table::{Connectivity, IndexTable};

/// Refresh cadences for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    pub configs: Duration,
    pub running: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            configs: Duration::from_secs(10),
            running: Duration::from_secs(1),
        }
    }
}

/// A live index table with its two refresh timers.
///
/// The config timer runs for the whole session. The running-status timer
/// runs only while the table is online and is started afresh on every
/// reconnect. Dropping the session cancels both.
pub struct TableSession {
    table: Arc<IndexTable>,
    cancel: CancellationToken,
    running_timer_starts: Arc<AtomicUsize>,
    tasks: Vec<JoinHandle<()>>,
    _guard: DropGuard,
}

impl TableSession {
    /// Load the table once, then start both timers
    pub async fn start(table: Arc<IndexTable>, intervals: PollIntervals) -> Self {
        table.start().await;

        let cancel = CancellationToken::new();
        let running_timer_starts = Arc::new(AtomicUsize::new(0));

        let tasks = vec![
            tokio::spawn(configs_loop(
                Arc::clone(&table),
                intervals.configs,
                cancel.child_token(),
            )),
            tokio::spawn(running_loop(
                Arc::clone(&table),
                intervals.running,
                Arc::clone(&running_timer_starts),
                cancel.child_token(),
            )),
        ];

        tracing::info!(
            "Polling configs every {:?}, running status every {:?}",
            intervals.configs,
            intervals.running
        );

        Self {
            table,
            _guard: cancel.clone().drop_guard(),
            cancel,
            running_timer_starts,
            tasks,
        }
    }

    pub fn table(&self) -> &Arc<IndexTable> {
        &self.table
    }

    /// How many times the running-status timer has been (re)started
    pub fn running_timer_starts(&self) -> usize {
        self.running_timer_starts.load(Ordering::SeqCst)
    }

    /// Stop both timers and wait for them to finish
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        for task in self.tasks.drain(..) {
            let _ = task.await;
        }
        tracing::debug!("Table session stopped");
    }
}

fn ticker(period: Duration) -> tokio::time::Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn configs_loop(table: Arc<IndexTable>, period: Duration, cancel: CancellationToken) {
    let mut ticker = ticker(period);
    loop {
        tokio::select! {
            _ = ticker.tick() => table.load_indexes().await,
            _ = cancel.cancelled() => {
                tracing::debug!("Config polling cancelled");
                return;
            }
        }
    }
}

async fn running_loop(
    table: Arc<IndexTable>,
    period: Duration,
    starts: Arc<AtomicUsize>,
    cancel: CancellationToken,
) {
    let mut connectivity = table.subscribe();
    loop {
        // Offline: wait for the config poll to reconnect
        while *connectivity.borrow_and_update() == Connectivity::Offline {
            tokio::select! {
                changed = connectivity.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = cancel.cancelled() => {
                    tracing::debug!("Running-status polling cancelled");
                    return;
                }
            }
        }

        starts.fetch_add(1, Ordering::SeqCst);
        tracing::debug!("Running-status timer started");
        let mut ticker = ticker(period);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    table.load_running().await;
                }
                changed = connectivity.changed() => {
                    if changed.is_err() {
                        return;
                    }
                    if *connectivity.borrow() == Connectivity::Offline {
                        tracing::debug!("Running-status timer stopped");
                        break;
                    }
                }
                _ = cancel.cancelled() => {
                    tracing::debug!("Running-status polling cancelled");
                    return;
                }
            }
        }
    }
}
