//! Countdown-driven token refresh.
//!
//! The scheduler fetches the full token set, then drives a fixed
//! 1-second tick recomputing the remaining lifetime of every code.
//! When the soonest-expiring code crosses zero it abandons the tick
//! loop and refetches immediately, so a stale code is never shown for
//! more than one tick period.
//!
//! Exactly one refresh task is live per scheduler: the task handle
//! lives in a slot of one, and every restart aborts the previous
//! handle before spawning. Countdown math runs on the tokio clock so
//! it stays testable under paused time.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, Instant};

use crate::commands::StoreClient;
use crate::directory::ServiceDirectory;
use crate::error::TokenError;
use crate::models::{TokenSet, TotpToken};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// The published token view: current codes, their remaining seconds,
/// and the last fetch error if the most recent cycle failed.
///
/// Every id in `tokens` is present in the directory at publish time;
/// a freshly added service may briefly be missing here until the next
/// fetch completes.
#[derive(Debug, Clone, Default)]
pub struct TokenView {
    pub tokens: TokenSet,
    pub remaining: HashMap<String, i64>,
    pub last_error: Option<String>,
}

/// Owns the refresh task and the watch channel its view is published
/// on.
pub struct TokenRefreshScheduler {
    client: StoreClient,
    directory: ServiceDirectory,
    view_tx: watch::Sender<TokenView>,
    handle: Option<JoinHandle<()>>,
}

impl TokenRefreshScheduler {
    pub fn new(client: StoreClient, directory: ServiceDirectory) -> Self {
        let (view_tx, _) = watch::channel(TokenView::default());
        Self {
            client,
            directory,
            view_tx,
            handle: None,
        }
    }

    /// Start (or restart) the refresh cycle. Any previous task is
    /// stopped first; two live tick loops would race redundant fetches.
    pub fn start(&mut self) {
        self.abort_task();
        tracing::debug!("starting token refresh cycle");
        let client = self.client.clone();
        let directory = self.directory.clone();
        let view_tx = self.view_tx.clone();
        self.handle = Some(tokio::spawn(run_refresh_loop(client, directory, view_tx)));
    }

    /// Stop the refresh cycle and clear the published view.
    pub fn stop(&mut self) {
        self.abort_task();
        self.view_tx.send_replace(TokenView::default());
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Watch the published view. The receiver always holds the latest
    /// value, so late subscribers are not a problem on this channel.
    pub fn subscribe(&self) -> watch::Receiver<TokenView> {
        self.view_tx.subscribe()
    }

    /// The current view.
    pub fn view(&self) -> TokenView {
        self.view_tx.borrow().clone()
    }

    /// Drop view entries whose service no longer exists in the
    /// directory. Called on optimistic delete so the invariant holds
    /// at the instant of removal, before the restarted cycle catches
    /// up.
    pub fn prune_missing(&self) {
        let directory = self.directory.clone();
        self.view_tx.send_modify(|view| {
            view.tokens.retain(|id, _| directory.contains(id));
            view.remaining.retain(|id, _| directory.contains(id));
        });
    }

    fn abort_task(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for TokenRefreshScheduler {
    fn drop(&mut self) {
        self.abort_task();
    }
}

async fn run_refresh_loop(
    client: StoreClient,
    directory: ServiceDirectory,
    view_tx: watch::Sender<TokenView>,
) {
    loop {
        match client.get_services_tokens().await {
            Ok(mut tokens) => {
                let dir = directory.snapshot();
                tokens.retain(|id, _| dir.contains_key(id));
                let mut deadlines = compute_deadlines(&tokens);
                tracing::debug!(count = tokens.len(), "fetched token set");

                publish(&view_tx, &directory, &mut tokens, &mut deadlines);

                let mut ticker = interval(TICK_PERIOD);
                // The first interval tick completes immediately.
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let min = publish(&view_tx, &directory, &mut tokens, &mut deadlines);
                    if min < 0 {
                        // The soonest code just went stale; refetch now
                        // instead of waiting out the natural period.
                        tracing::debug!("token expired, refetching");
                        break;
                    }
                }
            }
            Err(err) => {
                let err = TokenError::FetchFailed {
                    message: err.to_string(),
                };
                tracing::warn!(code = err.error_code(), error = %err, "token fetch failed, retrying after one tick");
                view_tx.send_modify(|view| view.last_error = Some(err.to_string()));
                sleep(TICK_PERIOD).await;
            }
        }
    }
}

/// Anchor each token's wall-clock expiry to the tokio clock at fetch
/// time, so ticking math is monotonic and pausable.
fn compute_deadlines(tokens: &TokenSet) -> HashMap<String, Instant> {
    let now_wall = Utc::now();
    let now_mono = Instant::now();
    tokens
        .iter()
        .map(|(id, token)| (id.clone(), deadline_for(token, now_wall, now_mono)))
        .collect()
}

fn deadline_for(
    token: &TotpToken,
    now_wall: chrono::DateTime<Utc>,
    now_mono: Instant,
) -> Instant {
    let millis = (token.next_step_time - now_wall).num_milliseconds();
    if millis >= 0 {
        now_mono + Duration::from_millis(millis as u64)
    } else {
        now_mono
            .checked_sub(Duration::from_millis(millis.unsigned_abs()))
            .unwrap_or(now_mono)
    }
}

/// Recompute remaining seconds, drop entries for services that left
/// the directory, publish, and return the minimum remaining value
/// (`i64::MAX` when the set is empty).
fn publish(
    view_tx: &watch::Sender<TokenView>,
    directory: &ServiceDirectory,
    tokens: &mut TokenSet,
    deadlines: &mut HashMap<String, Instant>,
) -> i64 {
    let dir = directory.snapshot();
    tokens.retain(|id, _| dir.contains_key(id));
    deadlines.retain(|id, _| tokens.contains_key(id));

    let now = Instant::now();
    let mut min = i64::MAX;
    let remaining: HashMap<String, i64> = deadlines
        .iter()
        .map(|(id, deadline)| {
            let secs = rounded_remaining(*deadline, now);
            min = min.min(secs);
            (id.clone(), secs)
        })
        .collect();

    view_tx.send_replace(TokenView {
        tokens: tokens.clone(),
        remaining,
        last_error: None,
    });
    min
}

fn rounded_remaining(deadline: Instant, now: Instant) -> i64 {
    match deadline.checked_duration_since(now) {
        Some(left) => (left.as_millis() as f64 / 1000.0).round() as i64,
        None => -((now.duration_since(deadline).as_millis() as f64 / 1000.0).round() as i64),
    }
}
