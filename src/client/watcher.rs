//! Background polling for listings that appear after a search was loaded.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;

use crate::client::ListingSource;
use crate::domain::listing::Listing;
use crate::domain::types::ListingId;

#[derive(Clone, Copy, Debug)]
pub struct WatcherConfig {
    pub interval: Duration,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(30),
        }
    }
}

/// Identifies one poll request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ticket {
    pub query: String,
    pub generation: u64,
    pub seq: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PollOutcome {
    /// The response belongs to a superseded query or an older request.
    Stale,
    /// First response for the current query; nothing to compare against.
    Baseline,
    Unchanged,
    /// Ids not seen in the previous response, in response order.
    New(Vec<ListingId>),
}

/// Bookkeeping shared by the polling task and its in-flight requests.
///
/// Only the newest request for the current query may update the known id
/// set. Changing the query starts a new generation and drops the baseline.
#[derive(Debug, Default)]
pub struct PollState {
    query: String,
    generation: u64,
    next_seq: u64,
    applied_seq: u64,
    known: Option<HashSet<ListingId>>,
}

impl PollState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Returns whether the query changed.
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if query == self.query {
            return false;
        }
        self.query = query;
        self.generation += 1;
        self.known = None;
        true
    }

    pub fn begin(&mut self) -> Ticket {
        self.next_seq += 1;
        Ticket {
            query: self.query.clone(),
            generation: self.generation,
            seq: self.next_seq,
        }
    }

    pub fn complete(&mut self, ticket: &Ticket, listings: &[Listing]) -> PollOutcome {
        if ticket.generation != self.generation
            || ticket.query != self.query
            || ticket.seq <= self.applied_seq
        {
            return PollOutcome::Stale;
        }
        self.applied_seq = ticket.seq;

        let ids: HashSet<ListingId> = listings.iter().map(|listing| listing.id).collect();
        let Some(previous) = self.known.replace(ids) else {
            return PollOutcome::Baseline;
        };

        let new: Vec<ListingId> = listings
            .iter()
            .map(|listing| listing.id)
            .filter(|id| !previous.contains(id))
            .collect();
        if new.is_empty() {
            PollOutcome::Unchanged
        } else {
            PollOutcome::New(new)
        }
    }
}

fn lock(state: &Mutex<PollState>) -> std::sync::MutexGuard<'_, PollState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Periodically re-runs a query and publishes ids of newly appeared listings.
///
/// Nothing is fetched until [`NewListingsWatcher::start`]. Each tick issues
/// its own request; when responses overtake each other only the newest one
/// counts. Stopping (or dropping) the watcher aborts in-flight requests.
pub struct NewListingsWatcher<S> {
    source: Arc<S>,
    state: Arc<Mutex<PollState>>,
    config: WatcherConfig,
    sender: mpsc::UnboundedSender<Vec<ListingId>>,
    task: Option<JoinHandle<()>>,
}

impl<S: ListingSource + 'static> NewListingsWatcher<S> {
    pub fn new(
        source: S,
        query: impl Into<String>,
        config: WatcherConfig,
    ) -> (Self, mpsc::UnboundedReceiver<Vec<ListingId>>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let watcher = Self {
            source: Arc::new(source),
            state: Arc::new(Mutex::new(PollState::new(query))),
            config,
            sender,
            task: None,
        };
        (watcher, receiver)
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Starts polling unless already running. Must be called within a tokio
    /// runtime.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.task = Some(tokio::spawn(poll_loop(
            Arc::clone(&self.source),
            Arc::clone(&self.state),
            self.config.interval,
            self.sender.clone(),
        )));
    }

    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    /// Stops the current task and starts a fresh one; the first poll
    /// happens immediately.
    pub fn restart(&mut self) {
        self.stop();
        self.start();
    }

    /// Switches to another query. Responses for the previous query that are
    /// still in flight are discarded; the next poll sets a new baseline.
    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if lock(&self.state).set_query(query.as_str()) {
            log::debug!("Watching listings for `{query}`");
        }
    }
}

impl<S> Drop for NewListingsWatcher<S> {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn poll_loop<S: ListingSource + 'static>(
    source: Arc<S>,
    state: Arc<Mutex<PollState>>,
    period: Duration,
    sender: mpsc::UnboundedSender<Vec<ListingId>>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // Dropping the set aborts requests still in flight.
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let ticket = lock(&state).begin();
                in_flight.spawn(poll_once(
                    Arc::clone(&source),
                    Arc::clone(&state),
                    ticket,
                    sender.clone(),
                ));
            }
            Some(_) = in_flight.join_next(), if !in_flight.is_empty() => {}
        }
        if sender.is_closed() {
            log::debug!("Listings watcher receiver dropped, stopping");
            break;
        }
    }
}

async fn poll_once<S: ListingSource>(
    source: Arc<S>,
    state: Arc<Mutex<PollState>>,
    ticket: Ticket,
    sender: mpsc::UnboundedSender<Vec<ListingId>>,
) {
    let listings = match source.fetch_page(&ticket.query).await {
        Ok(listings) => listings,
        Err(err) => {
            log::warn!("Failed to poll listings for `{}`: {err}", ticket.query);
            return;
        }
    };

    let outcome = lock(&state).complete(&ticket, &listings);
    match outcome {
        PollOutcome::New(ids) => {
            log::info!("{} new listing(s) for `{}`", ids.len(), ticket.query);
            let _ = sender.send(ids);
        }
        PollOutcome::Stale => log::debug!("Discarded stale poll #{}", ticket.seq),
        PollOutcome::Baseline | PollOutcome::Unchanged => {}
    }
}
