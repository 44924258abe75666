//! Terminal window title, scoped to the open detail view.

use anyhow::{Context, Result};
use ratatui::crossterm::{execute, terminal::SetTitle};
use std::io::Write;

use crate::constants::constants;
use crate::omdb::MovieDetail;

/// The title the window should carry for the current detail state.
pub fn desired_title(detail: Option<&MovieDetail>) -> String {
  match detail {
    Some(movie) if !movie.title.is_empty() => format!("{}{}", constants().detail_title_prefix, movie.title),
    _ => constants().app_name.clone(),
  }
}

/// Writes the title only when it changes and puts the base title back on restore.
#[derive(Debug, Default)]
pub struct WindowTitle {
  applied: Option<String>,
}

impl WindowTitle {
  /// Returns the title that was written, if any.
  pub fn sync(&mut self, out: &mut impl Write, desired: String) -> Result<Option<String>> {
    if self.applied.as_deref() == Some(desired.as_str()) {
      return Ok(None);
    }
    execute!(out, SetTitle(&desired)).context("Failed to set window title")?;
    self.applied = Some(desired.clone());
    Ok(Some(desired))
  }

  pub fn restore(&mut self, out: &mut impl Write) -> Result<()> {
    self.sync(out, constants().app_name.clone()).map(|_| ())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::omdb::mock::detail;

  #[test]
  fn title_follows_loaded_detail() {
    let movie = detail("tt1375666", "Inception");
    assert_eq!(desired_title(Some(&movie)), "Movie | Inception");
  }

  #[test]
  fn title_reverts_without_detail() {
    assert_eq!(desired_title(None), "usePopcorn");
  }

  #[test]
  fn untitled_detail_keeps_base_title() {
    let movie = detail("tt1", "");
    assert_eq!(desired_title(Some(&movie)), "usePopcorn");
  }

  #[test]
  fn sync_writes_only_on_change() {
    let mut out = Vec::new();
    let mut title = WindowTitle::default();
    assert_eq!(title.sync(&mut out, "usePopcorn".to_string()).unwrap().as_deref(), Some("usePopcorn"));
    let written = out.len();
    assert_eq!(title.sync(&mut out, "usePopcorn".to_string()).unwrap(), None);
    assert_eq!(out.len(), written);
    assert_eq!(title.sync(&mut out, "Movie | Alien".to_string()).unwrap().as_deref(), Some("Movie | Alien"));
    assert!(String::from_utf8_lossy(&out).contains("Movie | Alien"));
  }

  #[test]
  fn restore_writes_base_title() {
    let mut out = Vec::new();
    let mut title = WindowTitle::default();
    title.sync(&mut out, "Movie | Alien".to_string()).unwrap();
    out.clear();
    title.restore(&mut out).unwrap();
    assert!(String::from_utf8_lossy(&out).contains("usePopcorn"));
  }
}
