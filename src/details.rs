//! Loads the full record for the selected title.
//!
//! Independent of the search session. A selection change aborts the previous
//! fetch the same way a query change does.

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::constants::constants;
use crate::omdb::{MovieApi, MovieDetail};

struct PendingDetails {
  rx: oneshot::Receiver<Result<MovieDetail>>,
  handle: JoinHandle<()>,
}

pub struct DetailsLoader {
  api: Arc<dyn MovieApi>,
  /// Id of the loaded or loading record.
  current_id: Option<String>,
  pub movie: Option<MovieDetail>,
  pub loading: bool,
  pub error: Option<String>,
  pending: Option<PendingDetails>,
}

impl DetailsLoader {
  pub fn new(api: Arc<dyn MovieApi>) -> Self {
    Self { api, current_id: None, movie: None, loading: false, error: None, pending: None }
  }

  pub fn current_id(&self) -> Option<&str> {
    self.current_id.as_deref()
  }

  /// Bring the loader in line with the selection: load a new id, or clear when nothing is selected.
  /// Returns `true` when a fetch was started.
  pub fn sync(&mut self, selected: Option<&str>) -> bool {
    match selected {
      Some(id) if self.current_id.as_deref() != Some(id) => {
        self.load(id);
        true
      }
      Some(_) => false,
      None => {
        if self.current_id.is_some() {
          self.clear();
        }
        false
      }
    }
  }

  pub fn load(&mut self, id: &str) {
    self.cancel();
    debug!(id = %id, "loading movie details");
    self.current_id = Some(id.to_string());
    self.movie = None;
    self.error = None;
    self.loading = true;

    let (tx, rx) = oneshot::channel();
    let lookup = self.api.details(id);
    let handle = tokio::spawn(async move {
      let _ = tx.send(lookup.await);
    });
    self.pending = Some(PendingDetails { rx, handle });
  }

  pub fn clear(&mut self) {
    self.cancel();
    self.current_id = None;
    self.movie = None;
    self.error = None;
    self.loading = false;
  }

  fn cancel(&mut self) {
    if let Some(pending) = self.pending.take() {
      pending.handle.abort();
    }
  }

  /// Apply a finished fetch. Returns `true` when state changed.
  pub fn poll(&mut self) -> bool {
    let Some(mut pending) = self.pending.take() else { return false };
    match pending.rx.try_recv() {
      Ok(Ok(movie)) => {
        debug!(id = %movie.id, title = %movie.title, "movie details loaded");
        self.movie = Some(movie);
      }
      Ok(Err(e)) => {
        warn!(id = ?self.current_id, err = %format!("{:#}", e), "movie details failed");
        self.error = Some(constants().details_failed_message.clone());
      }
      Err(oneshot::error::TryRecvError::Empty) => {
        self.pending = Some(pending);
        return false;
      }
      Err(oneshot::error::TryRecvError::Closed) => {
        warn!(id = ?self.current_id, "details task ended without a result");
        self.error = Some(constants().details_failed_message.clone());
      }
    }
    self.loading = false;
    true
  }
}

impl Drop for DetailsLoader {
  fn drop(&mut self) {
    self.cancel();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::omdb::mock::{MockApi, Scripted, detail};
  use std::time::Duration;

  fn loader(api: &Arc<MockApi>) -> DetailsLoader {
    DetailsLoader::new(Arc::clone(api) as Arc<dyn MovieApi>)
  }

  async fn settle(loader: &mut DetailsLoader) {
    for _ in 0..100 {
      loader.poll();
      if !loader.loading {
        return;
      }
      tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("details did not settle");
  }

  #[tokio::test]
  async fn loads_selected_record() {
    let api = MockApi::new();
    api.on_details("tt1375666", 0, Scripted::Ok(detail("tt1375666", "Inception")));
    let mut l = loader(&api);

    assert!(l.sync(Some("tt1375666")));
    assert!(l.loading);
    settle(&mut l).await;

    let movie = l.movie.as_ref().unwrap();
    assert_eq!(movie.title, "Inception");
    assert_eq!(l.current_id(), Some("tt1375666"));
  }

  #[tokio::test]
  async fn same_selection_does_not_refetch() {
    let api = MockApi::new();
    api.on_details("tt1", 0, Scripted::Ok(detail("tt1", "One")));
    let mut l = loader(&api);

    l.sync(Some("tt1"));
    settle(&mut l).await;
    assert!(!l.sync(Some("tt1")));
    assert_eq!(api.started(), 1);
  }

  #[tokio::test]
  async fn stale_fetch_is_cancelled() {
    let api = MockApi::new();
    api.on_details("tt-slow", 150, Scripted::Ok(detail("tt-slow", "Slow")));
    api.on_details("tt-fast", 0, Scripted::Ok(detail("tt-fast", "Fast")));
    let mut l = loader(&api);

    l.sync(Some("tt-slow"));
    l.sync(Some("tt-fast"));
    settle(&mut l).await;
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert!(!l.poll());

    assert_eq!(l.movie.as_ref().map(|m| m.title.as_str()), Some("Fast"));
    assert_eq!(api.completed("tt-slow"), 0);
  }

  #[tokio::test]
  async fn deselect_clears() {
    let api = MockApi::new();
    api.on_details("tt1", 0, Scripted::Ok(detail("tt1", "One")));
    let mut l = loader(&api);

    l.sync(Some("tt1"));
    settle(&mut l).await;
    l.sync(None);

    assert!(l.movie.is_none());
    assert!(l.current_id().is_none());
    assert!(!l.loading);
  }

  #[tokio::test]
  async fn failure_sets_error() {
    let api = MockApi::new();
    api.on_details("tt-bad", 0, Scripted::Fail("Incorrect IMDb ID.".into()));
    let mut l = loader(&api);

    l.sync(Some("tt-bad"));
    settle(&mut l).await;

    assert!(l.movie.is_none());
    assert_eq!(l.error.as_deref(), Some(constants().details_failed_message.as_str()));
  }

  #[tokio::test]
  async fn dead_task_reports_failure() {
    let api = MockApi::new();
    api.on_details("tt0113277", 5_000, Scripted::Ok(detail("tt0113277", "Heat")));
    let mut l = loader(&api);

    l.sync(Some("tt0113277"));
    if let Some(pending) = &l.pending {
      pending.handle.abort();
    }
    settle(&mut l).await;

    assert!(!l.loading);
    assert!(l.movie.is_none());
    assert_eq!(l.error.as_deref(), Some(constants().details_failed_message.as_str()));
  }
}
