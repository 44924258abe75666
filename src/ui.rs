use ratatui::{
  Frame,
  layout::{Alignment, Constraint, Layout, Rect},
  style::{Modifier, Style, Stylize},
  text::{Line, Span},
  widgets::{Block, BorderType, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::app::{App, AppMode};
use crate::constants::constants;
use crate::omdb::MovieDetail;
use crate::rating::StarRatingWidget;
use crate::theme::Theme;
use crate::watched::WatchedMovie;

// --- Helpers ---

/// Compute the display width of the first `n` chars (accounting for double-width CJK).
pub fn display_width(s: &str, n: usize) -> usize {
  use unicode_width::UnicodeWidthChar;
  s.chars().take(n).map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate a string to `max_width` characters, appending "…" if truncated.
fn truncate_str(s: &str, max_width: usize) -> String {
  if s.chars().count() <= max_width {
    s.to_string()
  } else {
    let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    format!("{}…", truncated)
  }
}

fn or_na(s: &str) -> &str {
  if s.trim().is_empty() { "N/A" } else { s }
}

pub fn format_rating(rating: Option<f64>) -> String {
  rating.map_or_else(|| "N/A".to_string(), |r| format!("{:.1}", r))
}

pub fn format_runtime(minutes: Option<u32>) -> String {
  minutes.map_or_else(|| "N/A".to_string(), |m| format!("{} min", m))
}

/// One-line statistics for the watched summary.
pub fn summary_line(app: &App) -> String {
  let s = app.watched.summary();
  format!(
    "#️⃣ {} movies   ⭐️ {:.2}   🌟 {:.2}   ⏳ {:.0} min",
    s.count, s.avg_critic_rating, s.avg_user_rating, s.avg_runtime
  )
}

fn pane_block<'a>(theme: &Theme, title: &'a str, open: bool, focused: bool) -> Block<'a> {
  let border_color = if focused { theme.accent } else { theme.border };
  let marker = if open { "[–]" } else { "[+]" };
  Block::bordered()
    .title(Line::from(vec![
      Span::styled(format!(" {} ", title), Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
      Span::styled(format!("{} ", marker), Style::default().fg(theme.muted)),
    ]))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
}

fn render_message(frame: &mut Frame, text: String, style: Style, area: Rect) {
  let lines = vec![Line::from(""), Line::from(Span::styled(text, style))];
  frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center).wrap(Wrap { trim: true }), area);
}

// --- UI Rendering ---

pub fn ui(frame: &mut Frame, app: &mut App) {
  let theme = app.theme();
  app.areas.stars = None;

  frame.render_widget(Block::default().style(Style::default().bg(theme.bg)), frame.area());

  let [header_area, input_area, main_area, status_area, footer_area] = Layout::vertical([
    Constraint::Length(1),
    Constraint::Length(3),
    Constraint::Min(6),
    Constraint::Length(1),
    Constraint::Length(1),
  ])
  .areas(frame.area());

  render_header(frame, theme, header_area);
  render_input(frame, app, input_area);

  let [results_area, side_area] =
    Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(main_area);
  render_results(frame, app, results_area);
  render_side(frame, app, side_area);

  render_status(frame, app, status_area);
  render_footer(frame, app, footer_area);
}

fn render_header(frame: &mut Frame, theme: &Theme, area: Rect) {
  let left = Line::from(Span::styled(
    format!(" 🍿 {} ", constants().app_name),
    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
  ));
  frame.render_widget(left, area);

  let version = format!("v{} ", env!("CARGO_PKG_VERSION"));
  let right = Line::from(Span::styled(&version, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(version.len() as u16), width: version.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let border_color = if app.mode == AppMode::Input { theme.accent } else { theme.border };
  let found = Line::from(vec![
    Span::styled(" Found ", Style::default().fg(theme.muted)),
    Span::styled(app.results().len().to_string(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD)),
    Span::styled(" results ", Style::default().fg(theme.muted)),
  ])
  .right_aligned();
  let input_block = Block::bordered()
    .title(" Search movies... ")
    .title(found)
    .title_style(Style::default().fg(border_color))
    .border_type(BorderType::Rounded)
    .border_style(Style::default().fg(border_color))
    .padding(Padding::horizontal(1));

  let inner_w = area.width.saturating_sub(4) as usize;
  let cursor_col = display_width(&app.input, app.cursor_position);

  if cursor_col < app.input_scroll {
    app.input_scroll = cursor_col;
  } else if cursor_col >= app.input_scroll + inner_w {
    app.input_scroll = cursor_col.saturating_sub(inner_w) + 1;
  }

  let visible: String = app
    .input
    .chars()
    .scan(0usize, |col, c| {
      let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
      let start = *col;
      *col += w;
      Some((start, *col, c))
    })
    .skip_while(|(_, end, _)| *end <= app.input_scroll)
    .take_while(|(start, _, _)| *start < app.input_scroll + inner_w)
    .map(|(_, _, c)| c)
    .collect();

  let paragraph = Paragraph::new(visible).style(Style::default().fg(theme.fg)).block(input_block);
  frame.render_widget(paragraph, area);

  // No room for a cursor inside the borders.
  if app.mode == AppMode::Input && inner_w > 0 {
    let cursor_x = area.x + 2 + cursor_col.saturating_sub(app.input_scroll) as u16;
    frame.set_cursor_position((cursor_x, area.y + 1));
  }
}

fn render_results(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let block = pane_block(theme, "Results", app.panes.results_open, app.mode == AppMode::Results);
  if !app.panes.results_open {
    frame.render_widget(block, area);
    return;
  }

  let inner = block.inner(area);
  frame.render_widget(block, area);

  if app.search.loading {
    render_message(frame, "Loading...".to_string(), Style::default().fg(theme.status), inner);
    return;
  }
  if let Some(err) = &app.search.error {
    render_message(frame, format!("⚠️ {}", err), Style::default().fg(theme.error), inner);
    return;
  }

  // Inner width minus 2 chars for the highlight symbol ("▶ ")
  let inner_w = inner.width.saturating_sub(2) as usize;
  let items: Vec<ListItem> = app
    .results()
    .iter()
    .enumerate()
    .map(|(i, movie)| {
      let is_open = app.selection.selected() == Some(movie.id.as_str());
      let fg = if is_open { theme.accent } else { theme.fg };
      let bg = if i % 2 == 1 { theme.stripe_bg } else { theme.bg };
      let right = format!("🗓 {}", movie.year);
      let right_w = display_width(&right, right.chars().count());
      let title = truncate_str(&movie.title, inner_w.saturating_sub(right_w + 2));
      let gap = inner_w.saturating_sub(title.chars().count() + right_w);
      ListItem::new(Line::from(vec![
        Span::styled(title, Style::default().fg(fg)),
        Span::raw(" ".repeat(gap)),
        Span::styled(right, Style::default().fg(theme.muted)),
      ]))
      .bg(bg)
    })
    .collect();

  let list = List::new(items)
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg).add_modifier(Modifier::BOLD));
  frame.render_stateful_widget(list, inner, &mut app.list_state);
}

fn render_side(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let has_selection = app.selection.selected().is_some();
  let title = if has_selection { "Details" } else { "Watched" };
  let focused = matches!(app.mode, AppMode::Details | AppMode::Watched);
  let block = pane_block(theme, title, app.panes.side_open, focused).padding(Padding::horizontal(1));
  if !app.panes.side_open {
    frame.render_widget(block, area);
    return;
  }

  let inner = block.inner(area);
  frame.render_widget(block, area);

  if has_selection {
    render_details(frame, app, inner);
  } else {
    render_watched(frame, app, inner);
  }
}

fn render_details(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  if app.details.loading {
    render_message(frame, "Loading...".to_string(), Style::default().fg(theme.status), area);
    return;
  }
  if let Some(err) = &app.details.error {
    render_message(frame, format!("⚠️ {}", err), Style::default().fg(theme.error), area);
    return;
  }
  let Some(movie) = app.details.movie.clone() else { return };

  let [overview_area, rating_area, body_area] =
    Layout::vertical([Constraint::Length(5), Constraint::Length(3), Constraint::Min(0)]).areas(area);

  frame.render_widget(Paragraph::new(overview_lines(&movie, theme)), overview_area);

  let [stars_area, rating_hint_area, _] = Layout::vertical([Constraint::Length(1); 3]).areas(rating_area);
  if let Some(user_rating) = app.watched.user_rating(&movie.id) {
    let text = format!("You rated this movie with {} 🌟", user_rating);
    frame.render_widget(Paragraph::new(text).style(Style::default().fg(theme.fg)), stars_area);
  } else {
    let widget = StarRatingWidget { rating: &app.rating, label_style: Style::default().fg(theme.star) };
    frame.render_widget(widget, stars_area);
    app.areas.stars = Some(stars_area);
    if app.can_add() {
      let hint = Line::from(vec![
        Span::styled(" a ", Style::default().fg(theme.key_fg).bg(theme.accent)),
        Span::styled(" + Add to list", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)),
      ]);
      frame.render_widget(hint, rating_hint_area);
    }
  }

  let body = vec![
    Line::from(Span::styled(movie.plot.clone(), Style::default().fg(theme.fg).add_modifier(Modifier::ITALIC))),
    Line::from(""),
    Line::from(Span::styled(format!("Starring {}", or_na(&movie.actors)), Style::default().fg(theme.fg))),
    Line::from(Span::styled(format!("Directed by {}", or_na(&movie.director)), Style::default().fg(theme.fg))),
  ];
  frame.render_widget(Paragraph::new(body).wrap(Wrap { trim: true }), body_area);
}

fn overview_lines<'a>(movie: &MovieDetail, theme: &Theme) -> Vec<Line<'a>> {
  let released = movie.released.map_or_else(|| "N/A".to_string(), |d| d.format("%d %b %Y").to_string());
  vec![
    Line::from(Span::styled(movie.title.clone(), Style::default().fg(theme.fg).add_modifier(Modifier::BOLD))),
    Line::from(Span::styled(
      format!("{} • {}", released, format_runtime(movie.runtime_minutes)),
      Style::default().fg(theme.muted),
    )),
    Line::from(Span::styled(or_na(&movie.genre).to_string(), Style::default().fg(theme.muted))),
    Line::from(vec![
      Span::styled("⭐ ", Style::default().fg(theme.star)),
      Span::styled(format!("{} IMDb rating", format_rating(movie.critic_rating)), Style::default().fg(theme.fg)),
    ]),
  ]
}

fn watched_line<'a>(movie: &WatchedMovie, theme: &Theme, width: usize) -> Line<'a> {
  let stats = format!(
    "⭐️ {}  🌟 {}  ⏳ {}",
    format_rating(movie.critic_rating),
    movie.user_rating,
    format_runtime(movie.runtime_minutes)
  );
  let stats_w = display_width(&stats, stats.chars().count());
  let title = truncate_str(&movie.title, width.saturating_sub(stats_w + 2));
  let gap = width.saturating_sub(title.chars().count() + stats_w);
  Line::from(vec![
    Span::styled(title, Style::default().fg(theme.fg)),
    Span::raw(" ".repeat(gap)),
    Span::styled(stats, Style::default().fg(theme.muted)),
  ])
}

fn render_watched(frame: &mut Frame, app: &mut App, area: Rect) {
  let theme = app.theme();
  let [summary_area, list_area] = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

  let summary = vec![
    Line::from(Span::styled("Movies you watched", Style::default().fg(theme.accent).add_modifier(Modifier::BOLD))),
    Line::from(Span::styled(summary_line(app), Style::default().fg(theme.fg))),
  ];
  frame.render_widget(Paragraph::new(summary), summary_area);

  if app.watched.is_empty() {
    let hint = "Rate a movie and add it to your list.";
    frame.render_widget(Paragraph::new(hint).style(Style::default().fg(theme.muted)), list_area);
    return;
  }

  let width = list_area.width.saturating_sub(2) as usize;
  let items: Vec<ListItem> = app.watched.iter().map(|m| ListItem::new(watched_line(m, theme, width))).collect();
  let list = List::new(items)
    .highlight_symbol("▶ ")
    .highlight_style(Style::default().fg(theme.highlight_fg).bg(theme.highlight_bg));
  frame.render_stateful_widget(list, list_area, &mut app.watched_state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let (text, style) = if let Some(err) = &app.last_error {
    (format!(" ⚠  {}", err), Style::default().fg(theme.error))
  } else if app.search.in_flight() {
    (format!(" ⏳ Searching '{}'…", app.search.query().trim()), Style::default().fg(theme.status))
  } else if let Some(info) = &app.info_message {
    (format!(" ℹ  {}", info), Style::default().fg(theme.status))
  } else {
    (" Ready".to_string(), Style::default().fg(theme.muted))
  };
  frame.render_widget(Paragraph::new(text).style(style), area);
}

fn footer_keys(app: &App) -> Vec<(&'static str, &'static str)> {
  let mut keys = match app.mode {
    AppMode::Input => {
      let mut k = vec![("Type", "Search")];
      if !app.results().is_empty() {
        k.push(("↓", "Results"));
      }
      k.push(("Esc", if app.input.is_empty() { "Quit" } else { "Clear" }));
      k
    }
    AppMode::Results => vec![("Enter", "Open"), ("j/k", "Navigate"), ("→", "Watched"), ("Esc", "Search")],
    AppMode::Details if app.selected_is_watched() => vec![("Esc", "Close")],
    AppMode::Details => {
      let mut k = vec![("←/→", "Preview"), ("Enter/1-0", "Rate")];
      if app.can_add() {
        k.push(("a", "Add"));
      }
      k.push(("Esc", "Close"));
      k
    }
    AppMode::Watched => vec![("j/k", "Navigate"), ("d", "Delete"), ("Esc", "Search")],
  };
  keys.extend([("Tab", "Focus"), ("^t", "Theme")]);
  keys
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
  let theme = app.theme();
  let keys = footer_keys(app);

  let spans: Vec<Span> = keys
    .iter()
    .enumerate()
    .flat_map(|(i, (key, action))| {
      let mut s = vec![
        Span::styled(format!(" {} ", key), Style::default().fg(theme.key_fg).bg(theme.key_bg)),
        Span::styled(format!(" {} ", action), Style::default().fg(theme.muted)),
      ];
      if i < keys.len() - 1 {
        s.push(Span::raw("  "));
      }
      s
    })
    .collect();

  frame.render_widget(Line::from(spans), area);

  let theme_label = format!("{} ", theme.name);
  let right = Line::from(Span::styled(&theme_label, Style::default().fg(theme.muted)));
  let right_area =
    Rect { x: area.x + area.width.saturating_sub(theme_label.len() as u16), width: theme_label.len() as u16, ..area };
  frame.render_widget(right, right_area);
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::omdb::MovieApi;
  use crate::omdb::mock::{MockApi, detail};
  use crate::watched::WatchedMovie;
  use ratatui::{Terminal, backend::TestBackend};
  use std::sync::Arc;

  fn new_app() -> App {
    App::new(MockApi::new() as Arc<dyn MovieApi>, 0)
  }

  fn screen_text(terminal: &Terminal<TestBackend>) -> String {
    let buffer = terminal.backend().buffer();
    let area = buffer.area;
    (area.top()..area.bottom())
      .map(|y| (area.left()..area.right()).map(|x| buffer[(x, y)].symbol()).collect::<String>())
      .collect::<Vec<_>>()
      .join("\n")
  }

  #[test]
  fn truncate_adds_ellipsis() {
    assert_eq!(truncate_str("Inception", 20), "Inception");
    assert_eq!(truncate_str("Inception", 5), "Ince…");
  }

  #[test]
  fn formats_missing_values() {
    assert_eq!(format_rating(None), "N/A");
    assert_eq!(format_rating(Some(8.75)), "8.8");
    assert_eq!(format_runtime(Some(90)), "90 min");
    assert_eq!(or_na(""), "N/A");
  }

  #[tokio::test]
  async fn summary_line_on_empty_list_is_zero() {
    let app = new_app();
    let line = summary_line(&app);
    assert!(line.contains("0 movies"));
    assert!(line.contains("0.00"));
    assert!(line.contains("0 min"));
    assert!(!line.contains("NaN"));
  }

  #[tokio::test]
  async fn draws_empty_layout() {
    let mut app = new_app();
    let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
    terminal.draw(|frame| ui(frame, &mut app)).unwrap();

    let text = screen_text(&terminal);
    assert!(text.contains("usePopcorn"));
    assert!(text.contains("Search movies..."));
    assert!(text.contains("Movies you watched"));
    assert!(app.areas.stars.is_none());
  }

  #[tokio::test]
  async fn draws_on_narrow_terminals() {
    let mut app = new_app();
    app.input = "abc".to_string();
    app.cursor_position = 3;
    for width in 1..=6 {
      let mut terminal = Terminal::new(TestBackend::new(width, 20)).unwrap();
      terminal.draw(|frame| ui(frame, &mut app)).unwrap();
    }
  }

  #[tokio::test]
  async fn status_shows_running_search() {
    let api = MockApi::new();
    api.on_search("heat", 5_000, crate::omdb::mock::Scripted::Ok(crate::omdb::SearchOutcome::NotFound));
    let mut app = App::new(Arc::clone(&api) as Arc<dyn MovieApi>, 0);
    app.input = "heat".to_string();
    app.on_input_changed();

    let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
    terminal.draw(|frame| ui(frame, &mut app)).unwrap();
    assert!(screen_text(&terminal).contains("Searching 'heat'"));
  }

  #[tokio::test]
  async fn draws_watched_entries() {
    let mut app = new_app();
    app.watched.add(WatchedMovie::rated(&detail("tt1", "Heat"), 8).unwrap());
    let mut terminal = Terminal::new(TestBackend::new(120, 20)).unwrap();
    terminal.draw(|frame| ui(frame, &mut app)).unwrap();

    let text = screen_text(&terminal);
    assert!(text.contains("Heat"));
    assert!(text.contains("1 movies"));
  }

  #[tokio::test]
  async fn collapsed_results_pane_hides_content() {
    let mut app = new_app();
    app.search.error = Some("Movie not Found".to_string());
    app.toggle_results_pane();
    let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
    terminal.draw(|frame| ui(frame, &mut app)).unwrap();

    let text = screen_text(&terminal);
    assert!(!text.contains("Movie not Found"));
    assert!(text.contains("[+]"));
  }
}
