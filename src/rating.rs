//! Star rating control.
//!
//! A controlled selector over `1..=max_rating`. Hovering (mouse move or the
//! arrow keys) only previews a value; the committed rating changes on commit
//! (click, Enter, or a digit key).

use ratatui::{
  buffer::Buffer,
  layout::Rect,
  style::{Color, Style},
  text::Span,
  widgets::Widget,
};

pub const DEFAULT_MAX_RATING: u8 = 5;

const FULL_STAR: &str = "★";
const EMPTY_STAR: &str = "☆";

type OnRate = Box<dyn FnMut(u8) + Send>;

pub struct StarRating {
  max_rating: u8,
  /// 0 until the first commit.
  committed: u8,
  hover: Option<u8>,
  messages: Option<Vec<String>>,
  pub color: Color,
  /// Columns per star, glyph included.
  pub size: u16,
  on_rate: Option<OnRate>,
}

impl Default for StarRating {
  fn default() -> Self {
    Self::new(DEFAULT_MAX_RATING)
  }
}

impl std::fmt::Debug for StarRating {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StarRating")
      .field("max_rating", &self.max_rating)
      .field("committed", &self.committed)
      .field("hover", &self.hover)
      .finish_non_exhaustive()
  }
}

impl StarRating {
  pub fn new(max_rating: u8) -> Self {
    Self {
      max_rating: max_rating.max(1),
      committed: 0,
      hover: None,
      messages: None,
      color: Color::Rgb(252, 196, 25),
      size: 2,
      on_rate: None,
    }
  }

  /// Start with a pre-committed rating. Values outside the range are clamped.
  pub fn with_default(mut self, rating: u8) -> Self {
    if rating > 0 {
      self.committed = rating.min(self.max_rating);
    }
    self
  }

  /// Labels indexed by `rating - 1`. Used only when there is one label per star.
  pub fn with_messages(mut self, messages: Vec<String>) -> Self {
    self.messages = Some(messages);
    self
  }

  pub fn with_color(mut self, color: Color) -> Self {
    self.color = color;
    self
  }

  pub fn with_size(mut self, size: u16) -> Self {
    self.size = size.max(1);
    self
  }

  pub fn on_rate(mut self, callback: impl FnMut(u8) + Send + 'static) -> Self {
    self.on_rate = Some(Box::new(callback));
    self
  }

  pub fn max_rating(&self) -> u8 {
    self.max_rating
  }

  /// The committed rating, 0 when nothing has been committed yet.
  pub fn rating(&self) -> u8 {
    self.committed
  }

  pub fn hovered(&self) -> Option<u8> {
    self.hover
  }

  /// The value the stars currently show: hover preview first, then the committed rating.
  pub fn displayed(&self) -> u8 {
    self.hover.unwrap_or(self.committed)
  }

  pub fn hover(&mut self, rating: u8) {
    self.hover = Some(rating.clamp(1, self.max_rating));
  }

  pub fn clear_hover(&mut self) {
    self.hover = None;
  }

  pub fn hover_next(&mut self) {
    let next = self.displayed().saturating_add(1);
    self.hover(next);
  }

  pub fn hover_prev(&mut self) {
    let prev = self.displayed().saturating_sub(1);
    self.hover(prev);
  }

  /// Commit a rating, clamped into `1..=max_rating`, and notify the callback.
  pub fn commit(&mut self, rating: u8) -> u8 {
    self.committed = rating.clamp(1, self.max_rating);
    self.hover = None;
    if let Some(callback) = self.on_rate.as_mut() {
      callback(self.committed);
    }
    self.committed
  }

  /// Commit the current hover preview, if any.
  pub fn commit_hover(&mut self) -> Option<u8> {
    let rating = self.hover?;
    Some(self.commit(rating))
  }

  pub fn label(&self) -> String {
    let shown = self.displayed();
    if shown == 0 {
      return String::new();
    }
    match &self.messages {
      Some(messages) if messages.len() == self.max_rating as usize => messages[shown as usize - 1].clone(),
      _ => shown.to_string(),
    }
  }

  /// Width in columns of the stars alone.
  pub fn stars_width(&self) -> u16 {
    self.size.saturating_mul(self.max_rating as u16)
  }

  /// Map a terminal column inside `area` to the star under it.
  pub fn star_at(&self, area: Rect, column: u16) -> Option<u8> {
    if column < area.x || column >= area.x.saturating_add(self.stars_width().min(area.width)) {
      return None;
    }
    let star = (column - area.x) / self.size + 1;
    u8::try_from(star).ok().filter(|s| *s <= self.max_rating)
  }
}

/// Renders the stars followed by the label.
pub struct StarRatingWidget<'a> {
  pub rating: &'a StarRating,
  pub label_style: Style,
}

impl Widget for StarRatingWidget<'_> {
  fn render(self, area: Rect, buf: &mut Buffer) {
    if area.height == 0 {
      return;
    }
    let shown = self.rating.displayed();
    let style = Style::default().fg(self.rating.color);
    let mut x = area.x;
    let right = area.x.saturating_add(area.width);
    for star in 1..=self.rating.max_rating {
      if x >= right {
        return;
      }
      let glyph = if star <= shown { FULL_STAR } else { EMPTY_STAR };
      buf.set_string(x, area.y, glyph, style);
      x = x.saturating_add(self.rating.size);
    }
    let label = self.rating.label();
    if !label.is_empty() && x < right {
      Span::styled(format!(" {}", label), self.label_style).render(Rect::new(x, area.y, right - x, 1), buf);
    }
  }
}
