use ratatui::crossterm::event::{self, KeyCode, KeyModifiers, MouseButton, MouseEventKind};

use crate::app::{App, AppMode};

// --- Helpers ---

/// Convert a char index to a byte offset within the string.
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
  s.char_indices().nth(char_idx).map_or(s.len(), |(i, _)| i)
}

fn next_index(current: Option<usize>, count: usize) -> usize {
  current.map_or(0, |i| (i + 1) % count)
}

fn prev_index(current: Option<usize>, count: usize) -> usize {
  current.map_or(0, |i| if i == 0 { count.saturating_sub(1) } else { i - 1 })
}

// --- Event Handling ---

pub fn handle_key_event(app: &mut App, key: event::KeyEvent) {
  if key.modifiers.contains(KeyModifiers::CONTROL) {
    match key.code {
      KeyCode::Char('c') => {
        app.should_quit = true;
        return;
      }
      KeyCode::Char('t') => {
        app.next_theme();
        return;
      }
      KeyCode::Char('r') => {
        app.toggle_results_pane();
        return;
      }
      KeyCode::Char('w') => {
        app.toggle_side_pane();
        return;
      }
      _ => {}
    }
  }

  // Escape closes an open detail view from anywhere.
  if key.code == KeyCode::Esc && app.selection.selected().is_some() {
    app.close_movie();
    return;
  }

  if key.code == KeyCode::Tab {
    app.cycle_focus();
    return;
  }

  match app.mode {
    AppMode::Input => handle_input_key(app, key),
    AppMode::Results => handle_results_key(app, key),
    AppMode::Details => handle_details_key(app, key),
    AppMode::Watched => handle_watched_key(app, key),
  }
}

fn handle_input_key(app: &mut App, key: event::KeyEvent) {
  app.clear_error();
  match key.code {
    KeyCode::Enter | KeyCode::Down => {
      if !app.results().is_empty() {
        app.mode = AppMode::Results;
      }
    }
    KeyCode::Char(c) => {
      let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
      app.input.insert(byte_idx, c);
      app.cursor_position += 1;
      app.on_input_changed();
    }
    KeyCode::Backspace => {
      if app.cursor_position > 0 {
        app.cursor_position -= 1;
        let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
        app.input.remove(byte_idx);
        app.on_input_changed();
      }
    }
    KeyCode::Delete => {
      if app.cursor_position < app.input.chars().count() {
        let byte_idx = char_to_byte_index(&app.input, app.cursor_position);
        app.input.remove(byte_idx);
        app.on_input_changed();
      }
    }
    KeyCode::Left => {
      app.cursor_position = app.cursor_position.saturating_sub(1);
    }
    KeyCode::Right => {
      if app.cursor_position < app.input.chars().count() {
        app.cursor_position += 1;
      }
    }
    KeyCode::Home => {
      app.cursor_position = 0;
    }
    KeyCode::End => {
      app.cursor_position = app.input.chars().count();
    }
    KeyCode::Esc => {
      if !app.input.is_empty() {
        app.input.clear();
        app.cursor_position = 0;
        app.input_scroll = 0;
        app.on_input_changed();
      } else {
        app.should_quit = true;
      }
    }
    _ => {}
  }
}

fn handle_results_key(app: &mut App, key: event::KeyEvent) {
  let count = app.results().len();
  match key.code {
    KeyCode::Enter => {
      app.select_highlighted();
    }
    KeyCode::Down | KeyCode::Char('j') => {
      if count > 0 {
        app.list_state.select(Some(next_index(app.list_state.selected(), count)));
      }
    }
    KeyCode::Up | KeyCode::Char('k') => {
      if count > 0 {
        app.list_state.select(Some(prev_index(app.list_state.selected(), count)));
      }
    }
    KeyCode::Right | KeyCode::Char('l') => {
      app.focus_side();
    }
    KeyCode::Char('/') | KeyCode::Esc => {
      app.mode = AppMode::Input;
    }
    _ => {}
  }
}

fn handle_details_key(app: &mut App, key: event::KeyEvent) {
  if app.selected_is_watched() {
    if matches!(key.code, KeyCode::Backspace | KeyCode::Char('q')) {
      app.close_movie();
    }
    return;
  }
  match key.code {
    KeyCode::Left | KeyCode::Char('h') => app.rating.hover_prev(),
    KeyCode::Right | KeyCode::Char('l') => app.rating.hover_next(),
    KeyCode::Enter => {
      if app.rating.hovered().is_some() {
        app.rating.commit_hover();
      } else {
        app.add_watched();
      }
    }
    KeyCode::Char(c @ '0'..='9') => {
      // '0' stands for 10 on a ten-star scale.
      let value = match c.to_digit(10) {
        Some(0) => 10,
        Some(d) => d as u8,
        None => return,
      };
      if value <= app.rating.max_rating() {
        app.rating.commit(value);
      }
    }
    KeyCode::Char('a') => {
      if !app.add_watched() && app.rating.rating() == 0 {
        app.set_error("Rate the movie before adding it.".to_string());
      }
    }
    KeyCode::Backspace | KeyCode::Char('q') => app.close_movie(),
    _ => {}
  }
}

fn handle_watched_key(app: &mut App, key: event::KeyEvent) {
  let count = app.watched.len();
  match key.code {
    KeyCode::Down | KeyCode::Char('j') => {
      if count > 0 {
        app.watched_state.select(Some(next_index(app.watched_state.selected(), count)));
      }
    }
    KeyCode::Up | KeyCode::Char('k') => {
      if count > 0 {
        app.watched_state.select(Some(prev_index(app.watched_state.selected(), count)));
      }
    }
    KeyCode::Char('d') | KeyCode::Delete => {
      app.delete_highlighted_watched();
    }
    KeyCode::Left | KeyCode::Char('h') => {
      app.mode = AppMode::Results;
    }
    KeyCode::Esc => {
      app.mode = AppMode::Input;
    }
    _ => {}
  }
}

pub fn handle_mouse_event(app: &mut App, mouse: event::MouseEvent) {
  if app.mode != AppMode::Details || app.selected_is_watched() {
    return;
  }
  match mouse.kind {
    MouseEventKind::Moved => app.hover_star_at(mouse.column, mouse.row),
    MouseEventKind::Down(MouseButton::Left) => app.click_star_at(mouse.column, mouse.row),
    _ => {}
  }
}
