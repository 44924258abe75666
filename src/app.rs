use ratatui::{layout::Rect, widgets::ListState};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::config::Config;
use crate::constants::constants;
use crate::details::DetailsLoader;
use crate::omdb::{MovieApi, MovieDetail, SearchResultItem};
use crate::rating::StarRating;
use crate::search::{QueryChange, SearchSession};
use crate::selection::Selection;
use crate::theme::{THEMES, Theme};
use crate::title::desired_title;
use crate::watched::{WatchedList, WatchedMovie};

/// Which part of the screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
  Input,
  Results,
  /// Detail pane for the selected movie (rating, add to list).
  Details,
  /// Watched list in the right pane.
  Watched,
}

/// Collapsible pane flags. Both panes start open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Panes {
  pub results_open: bool,
  pub side_open: bool,
}

impl Default for Panes {
  fn default() -> Self {
    Self { results_open: true, side_open: true }
  }
}

/// Screen areas recorded during the last draw, used for mouse hit-testing.
#[derive(Debug, Default)]
pub struct HitAreas {
  pub stars: Option<Rect>,
}

pub struct App {
  pub input: String,
  pub cursor_position: usize,
  pub input_scroll: usize,
  pub mode: AppMode,
  pub theme_index: usize,
  pub search: SearchSession,
  pub list_state: ListState,
  pub selection: Selection,
  pub details: DetailsLoader,
  /// Rating control for the open detail view; rebuilt on every new selection.
  pub rating: StarRating,
  pub watched: WatchedList,
  pub watched_state: ListState,
  pub panes: Panes,
  pub last_error: Option<String>,
  /// Informational message, lower priority than errors.
  pub info_message: Option<String>,
  pub should_quit: bool,
  pub areas: HitAreas,
  /// When the last error was set, for auto-dismiss.
  error_time: Option<Instant>,
}

impl App {
  pub fn new(api: Arc<dyn MovieApi>, theme_index: usize) -> Self {
    Self {
      input: String::new(),
      cursor_position: 0,
      input_scroll: 0,
      mode: AppMode::Input,
      theme_index: theme_index.min(THEMES.len() - 1),
      search: SearchSession::new(Arc::clone(&api)),
      list_state: ListState::default(),
      selection: Selection::default(),
      details: DetailsLoader::new(api),
      rating: StarRating::default(),
      watched: WatchedList::default(),
      watched_state: ListState::default(),
      panes: Panes::default(),
      last_error: None,
      info_message: None,
      should_quit: false,
      areas: HitAreas::default(),
      error_time: None,
    }
  }

  pub fn theme(&self) -> &'static Theme {
    // theme_index is clamped in new() and advanced modulo THEMES.len().
    &THEMES[self.theme_index]
  }

  pub fn next_theme(&mut self) {
    self.theme_index = (self.theme_index + 1) % THEMES.len();
    self.rating.color = self.theme().star;
    self.save_config();
  }

  fn save_config(&self) {
    let config = Config { theme_name: Some(self.theme().name.to_string()), ..Config::load() };
    config.save();
  }

  /// Set an error message with auto-dismiss tracking.
  pub fn set_error(&mut self, msg: String) {
    self.last_error = Some(msg);
    self.error_time = Some(Instant::now());
  }

  pub fn clear_error(&mut self) {
    self.last_error = None;
    self.error_time = None;
  }

  /// Clear stale error messages after the configured expiry.
  pub fn expire_error(&mut self) {
    if let Some(t) = self.error_time
      && t.elapsed() >= Duration::from_secs(constants().error_expiry_secs)
    {
      self.last_error = None;
      self.error_time = None;
    }
  }

  // --- Search ---

  /// Feed the current input to the search session. Called after every edit.
  pub fn on_input_changed(&mut self) {
    match self.search.set_query(&self.input) {
      QueryChange::Searching => {
        self.close_movie();
        self.list_state.select(None);
        self.info_message = None;
      }
      QueryChange::Cleared => {
        self.list_state.select(None);
      }
      QueryChange::Unchanged => {}
    }
  }

  pub fn results(&self) -> &[SearchResultItem] {
    &self.search.results
  }

  pub fn check_pending(&mut self) {
    if self.search.poll() && !self.search.results.is_empty() {
      self.list_state.select(Some(0));
    }
    self.details.poll();
  }

  // --- Selection / details ---

  pub fn selected_movie(&self) -> Option<&MovieDetail> {
    let id = self.selection.selected()?;
    self.details.movie.as_ref().filter(|_| self.details.current_id() == Some(id))
  }

  /// Toggle selection of `id` and load or drop its details.
  pub fn select_movie(&mut self, id: &str) {
    self.selection.select(id);
    if self.details.sync(self.selection.selected()) {
      let previous = self.watched.user_rating(id).unwrap_or(0);
      self.rating = StarRating::new(constants().detail_max_rating)
        .with_default(previous)
        .with_messages(constants().rating_messages.clone())
        .with_color(self.theme().star)
        .with_size(constants().star_size)
        .on_rate(|rating| debug!(rating, "rating committed"));
    }
    if self.selection.selected().is_some() {
      self.mode = AppMode::Details;
    } else if self.mode == AppMode::Details {
      self.mode = AppMode::Results;
    }
  }

  pub fn select_highlighted(&mut self) {
    let Some(index) = self.list_state.selected() else { return };
    let Some(id) = self.search.results.get(index).map(|r| r.id.clone()) else { return };
    self.select_movie(&id);
  }

  pub fn close_movie(&mut self) {
    self.selection.close();
    self.details.sync(None);
    self.areas.stars = None;
    if self.mode == AppMode::Details {
      self.mode = AppMode::Results;
    }
  }

  /// Whether the selected movie is already on the watched list.
  pub fn selected_is_watched(&self) -> bool {
    self.selection.selected().is_some_and(|id| self.watched.contains(id))
  }

  /// Whether "add to list" is currently possible.
  pub fn can_add(&self) -> bool {
    self.selected_movie().is_some() && self.rating.rating() > 0 && !self.selected_is_watched()
  }

  /// Add the open movie with its committed rating, then close the detail view.
  pub fn add_watched(&mut self) -> bool {
    if !self.can_add() {
      return false;
    }
    let Some(movie) = self.selected_movie().and_then(|d| WatchedMovie::rated(d, self.rating.rating())) else {
      return false;
    };
    let title = movie.title.clone();
    if !self.watched.add(movie) {
      return false;
    }
    info!(title = %title, "added to watched list");
    self.info_message = Some(format!("Added '{}' to your list", title));
    self.close_movie();
    true
  }

  pub fn delete_highlighted_watched(&mut self) {
    let Some(index) = self.watched_state.selected() else { return };
    let Some(id) = self.watched.get(index).map(|m| m.id.clone()) else { return };
    if self.watched.remove(&id) {
      debug!(id = %id, "removed from watched list");
    }
    if self.watched.is_empty() {
      self.watched_state.select(None);
    } else if index >= self.watched.len() {
      self.watched_state.select(Some(self.watched.len() - 1));
    }
  }

  // --- Rating (mouse) ---

  fn star_under(&self, column: u16, row: u16) -> Option<u8> {
    let area = self.areas.stars?;
    if row != area.y {
      return None;
    }
    self.rating.star_at(area, column)
  }

  pub fn hover_star_at(&mut self, column: u16, row: u16) {
    match self.star_under(column, row) {
      Some(star) => self.rating.hover(star),
      None => self.rating.clear_hover(),
    }
  }

  pub fn click_star_at(&mut self, column: u16, row: u16) {
    if let Some(star) = self.star_under(column, row) {
      self.rating.commit(star);
    }
  }

  // --- Layout ---

  pub fn toggle_results_pane(&mut self) {
    self.panes.results_open = !self.panes.results_open;
  }

  pub fn toggle_side_pane(&mut self) {
    self.panes.side_open = !self.panes.side_open;
  }

  /// Focus the right pane: the detail view when one is open, else the watched list.
  pub fn focus_side(&mut self) {
    if self.selection.selected().is_some() {
      self.mode = AppMode::Details;
    } else {
      self.mode = AppMode::Watched;
      if self.watched_state.selected().is_none() && !self.watched.is_empty() {
        self.watched_state.select(Some(0));
      }
    }
  }

  pub fn cycle_focus(&mut self) {
    match self.mode {
      AppMode::Input => self.mode = AppMode::Results,
      AppMode::Results => self.focus_side(),
      AppMode::Details | AppMode::Watched => self.mode = AppMode::Input,
    }
  }

  pub fn window_title(&self) -> String {
    desired_title(self.selected_movie())
  }
}
