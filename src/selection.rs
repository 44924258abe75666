/// Which movie, if any, the detail pane shows.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
  selected: Option<String>,
}

impl Selection {
  pub fn selected(&self) -> Option<&str> {
    self.selected.as_deref()
  }

  /// Select `id`, or close the detail view when `id` is already selected.
  pub fn select(&mut self, id: &str) {
    if self.selected.as_deref() == Some(id) {
      self.selected = None;
    } else {
      self.selected = Some(id.to_string());
    }
  }

  pub fn close(&mut self) {
    self.selected = None;
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn select_sets_id() {
    let mut s = Selection::default();
    s.select("tt1");
    assert_eq!(s.selected(), Some("tt1"));
  }

  #[test]
  fn select_twice_toggles_off() {
    let mut s = Selection::default();
    s.select("tt1");
    s.select("tt1");
    assert_eq!(s.selected(), None);
  }

  #[test]
  fn select_other_replaces() {
    let mut s = Selection::default();
    s.select("tt1");
    s.select("tt2");
    assert_eq!(s.selected(), Some("tt2"));
  }

  #[test]
  fn close_is_unconditional() {
    let mut s = Selection::default();
    s.close();
    assert_eq!(s.selected(), None);
    s.select("tt1");
    s.close();
    assert_eq!(s.selected(), None);
  }
}
