//! Session-scoped list of rated movies and its summary statistics.

use tracing::debug;

use crate::omdb::MovieDetail;

#[derive(Debug, Clone, PartialEq)]
pub struct WatchedMovie {
  pub id: String,
  pub title: String,
  pub year: String,
  pub poster: Option<String>,
  pub critic_rating: Option<f64>,
  pub runtime_minutes: Option<u32>,
  /// Always at least 1.
  pub user_rating: u8,
}

impl WatchedMovie {
  /// Build an entry from a loaded record. Returns `None` for an uncommitted (zero) rating.
  pub fn rated(detail: &MovieDetail, user_rating: u8) -> Option<Self> {
    if user_rating == 0 {
      return None;
    }
    Some(Self {
      id: detail.id.clone(),
      title: detail.title.clone(),
      year: detail.year.clone(),
      poster: detail.poster.clone(),
      critic_rating: detail.critic_rating,
      runtime_minutes: detail.runtime_minutes,
      user_rating,
    })
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WatchedSummary {
  pub count: usize,
  pub avg_critic_rating: f64,
  pub avg_user_rating: f64,
  pub avg_runtime: f64,
}

/// Mean of the values, 0.0 for an empty input.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
  let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
  if n == 0 { 0.0 } else { sum / n as f64 }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct WatchedList {
  movies: Vec<WatchedMovie>,
}

impl WatchedList {
  /// Append a movie. An id that is already present is rejected and `false` returned.
  pub fn add(&mut self, movie: WatchedMovie) -> bool {
    if self.contains(&movie.id) {
      debug!(id = %movie.id, "watched: duplicate add rejected");
      return false;
    }
    debug!(id = %movie.id, rating = movie.user_rating, "watched: added");
    self.movies.push(movie);
    true
  }

  /// Remove the entry with `id`. Returns `true` if something was removed.
  pub fn remove(&mut self, id: &str) -> bool {
    let before = self.movies.len();
    self.movies.retain(|m| m.id != id);
    before != self.movies.len()
  }

  pub fn contains(&self, id: &str) -> bool {
    self.movies.iter().any(|m| m.id == id)
  }

  pub fn user_rating(&self, id: &str) -> Option<u8> {
    self.movies.iter().find(|m| m.id == id).map(|m| m.user_rating)
  }

  pub fn get(&self, index: usize) -> Option<&WatchedMovie> {
    self.movies.get(index)
  }

  pub fn iter(&self) -> impl Iterator<Item = &WatchedMovie> {
    self.movies.iter()
  }

  pub fn len(&self) -> usize {
    self.movies.len()
  }

  pub fn is_empty(&self) -> bool {
    self.movies.is_empty()
  }

  /// Computed on every call. Critic rating and runtime are averaged over the movies that have them.
  pub fn summary(&self) -> WatchedSummary {
    WatchedSummary {
      count: self.movies.len(),
      avg_critic_rating: mean(self.movies.iter().filter_map(|m| m.critic_rating)),
      avg_user_rating: mean(self.movies.iter().map(|m| f64::from(m.user_rating))),
      avg_runtime: mean(self.movies.iter().filter_map(|m| m.runtime_minutes.map(f64::from))),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn movie(id: &str, critic: Option<f64>, runtime: Option<u32>, user: u8) -> WatchedMovie {
    WatchedMovie {
      id: id.to_string(),
      title: format!("Movie {}", id),
      year: "1999".to_string(),
      poster: None,
      critic_rating: critic,
      runtime_minutes: runtime,
      user_rating: user,
    }
  }

  #[test]
  fn empty_summary_is_zero() {
    let summary = WatchedList::default().summary();
    assert_eq!(summary, WatchedSummary::default());
    assert!(summary.avg_critic_rating.is_finite());
  }

  #[test]
  fn add_then_remove_round_trips() {
    let mut list = WatchedList::default();
    list.add(movie("tt1", Some(7.0), Some(100), 6));
    let before = list.clone();

    assert!(list.add(movie("tt2", Some(8.0), Some(120), 9)));
    assert!(list.remove("tt2"));
    assert_eq!(list, before);
  }

  #[test]
  fn duplicate_add_is_rejected() {
    let mut list = WatchedList::default();
    assert!(list.add(movie("tt1", Some(7.0), Some(100), 6)));
    assert!(!list.add(movie("tt1", Some(7.0), Some(100), 2)));
    assert_eq!(list.len(), 1);
    assert_eq!(list.user_rating("tt1"), Some(6));
  }

  #[test]
  fn remove_missing_is_noop() {
    let mut list = WatchedList::default();
    list.add(movie("tt1", None, None, 3));
    assert!(!list.remove("tt9"));
    assert_eq!(list.len(), 1);
  }

  #[test]
  fn summary_means() {
    let mut list = WatchedList::default();
    list.add(movie("tt1", Some(8.0), Some(100), 10));
    list.add(movie("tt2", Some(6.0), Some(140), 5));
    list.add(movie("tt3", None, None, 6));

    let summary = list.summary();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.avg_critic_rating, 7.0);
    assert_eq!(summary.avg_user_rating, 7.0);
    assert_eq!(summary.avg_runtime, 120.0);
  }

  #[test]
  fn keeps_insertion_order() {
    let mut list = WatchedList::default();
    list.add(movie("b", None, None, 1));
    list.add(movie("a", None, None, 1));
    let ids: Vec<_> = list.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, ["b", "a"]);
  }

  #[test]
  fn rated_requires_nonzero_rating() {
    let detail = crate::omdb::mock::detail("tt1375666", "Inception");
    assert!(WatchedMovie::rated(&detail, 0).is_none());
    let watched = WatchedMovie::rated(&detail, 9).unwrap();
    assert_eq!(watched.id, "tt1375666");
    assert_eq!(watched.runtime_minutes, Some(148));
    assert_eq!(watched.critic_rating, Some(8.8));
    assert_eq!(watched.user_rating, 9);
  }
}
