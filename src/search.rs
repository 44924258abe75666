//! Search session: owns the query and the single in-flight lookup for it.
//!
//! Every query change aborts the previous task and drops its receiver before
//! spawning the next one, so a slow stale response has nowhere to land.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::constants::constants;
use crate::omdb::{MovieApi, SearchOutcome, SearchResultItem};

/// What a call to [`SearchSession::set_query`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryChange {
  /// Same query as before; nothing happened.
  Unchanged,
  /// Query is empty; results and error were reset without a request.
  Cleared,
  /// A new lookup was started. Callers close any open detail view.
  Searching,
}

struct PendingSearch {
  query: String,
  rx: oneshot::Receiver<Result<SearchOutcome>>,
  handle: JoinHandle<()>,
}

pub struct SearchSession {
  api: Arc<dyn MovieApi>,
  query: String,
  pub results: Vec<SearchResultItem>,
  pub loading: bool,
  pub error: Option<String>,
  pending: Option<PendingSearch>,
}

impl SearchSession {
  pub fn new(api: Arc<dyn MovieApi>) -> Self {
    Self { api, query: String::new(), results: Vec::new(), loading: false, error: None, pending: None }
  }

  pub fn query(&self) -> &str {
    &self.query
  }

  /// Whether a lookup is outstanding.
  pub fn in_flight(&self) -> bool {
    self.pending.is_some()
  }

  pub fn set_query(&mut self, query: &str) -> QueryChange {
    if query == self.query {
      return QueryChange::Unchanged;
    }
    self.query = query.to_string();
    self.cancel();

    let trimmed = query.trim();
    if trimmed.is_empty() {
      self.results.clear();
      self.error = None;
      self.loading = false;
      return QueryChange::Cleared;
    }

    info!(query = %trimmed, "search triggered");
    self.loading = true;
    self.error = None;

    let (tx, rx) = oneshot::channel();
    let lookup = self.api.search(trimmed);
    let handle = tokio::spawn(async move {
      let _ = tx.send(lookup.await);
    });
    self.pending = Some(PendingSearch { query: trimmed.to_string(), rx, handle });
    QueryChange::Searching
  }

  /// Abort the outstanding lookup, if any. Its result can no longer reach this session.
  fn cancel(&mut self) {
    if let Some(pending) = self.pending.take() {
      debug!(query = %pending.query, "search superseded");
      pending.handle.abort();
    }
  }

  /// Apply a finished lookup. Returns `true` when state changed.
  pub fn poll(&mut self) -> bool {
    let Some(mut pending) = self.pending.take() else { return false };
    match pending.rx.try_recv() {
      Ok(Ok(SearchOutcome::Found(items))) => {
        debug!(query = %pending.query, count = items.len(), "search results");
        self.results = items;
        self.error = None;
      }
      Ok(Ok(SearchOutcome::NotFound)) => {
        debug!(query = %pending.query, "search found nothing");
        self.results.clear();
        self.error = Some(constants().not_found_message.clone());
      }
      Ok(Err(e)) => {
        warn!(query = %pending.query, err = %format!("{:#}", e), "search failed");
        self.results.clear();
        self.error = Some(constants().search_failed_message.clone());
      }
      Err(oneshot::error::TryRecvError::Empty) => {
        self.pending = Some(pending);
        return false;
      }
      Err(oneshot::error::TryRecvError::Closed) => {
        warn!(query = %pending.query, "search task ended without a result");
        self.results.clear();
        self.error = Some(constants().search_failed_message.clone());
      }
    }
    self.loading = false;
    true
  }
}

impl Drop for SearchSession {
  fn drop(&mut self) {
    self.cancel();
  }
}
