use ratatui::style::Color;

pub struct Theme {
  pub name: &'static str,
  pub bg: Color,
  pub fg: Color,
  pub accent: Color,
  pub muted: Color,
  pub border: Color,
  pub highlight_fg: Color,
  pub highlight_bg: Color,
  pub stripe_bg: Color,
  pub star: Color,
  pub status: Color,
  pub error: Color,
  pub key_fg: Color,
  pub key_bg: Color,
}

pub const THEMES: [Theme; 3] = [
  Theme {
    name: "Cinema",
    bg: Color::Rgb(33, 37, 41),
    fg: Color::Rgb(222, 226, 230),
    accent: Color::Rgb(103, 65, 217),
    muted: Color::Rgb(134, 142, 150),
    border: Color::Rgb(73, 80, 87),
    highlight_fg: Color::Rgb(248, 249, 250),
    highlight_bg: Color::Rgb(52, 58, 64),
    stripe_bg: Color::Rgb(43, 48, 53),
    star: Color::Rgb(252, 196, 25),
    status: Color::Rgb(151, 117, 250),
    error: Color::Rgb(250, 82, 82),
    key_fg: Color::Rgb(33, 37, 41),
    key_bg: Color::Rgb(134, 142, 150),
  },
  Theme {
    name: "Butter",
    bg: Color::Rgb(255, 249, 219),
    fg: Color::Rgb(73, 56, 28),
    accent: Color::Rgb(214, 120, 0),
    muted: Color::Rgb(150, 128, 90),
    border: Color::Rgb(220, 196, 140),
    highlight_fg: Color::Rgb(255, 255, 255),
    highlight_bg: Color::Rgb(214, 120, 0),
    stripe_bg: Color::Rgb(250, 240, 200),
    star: Color::Rgb(230, 150, 0),
    status: Color::Rgb(168, 96, 0),
    error: Color::Rgb(201, 42, 42),
    key_fg: Color::Rgb(255, 249, 219),
    key_bg: Color::Rgb(150, 128, 90),
  },
  Theme {
    name: "Terminal",
    bg: Color::Reset,
    fg: Color::Reset,
    accent: Color::Cyan,
    muted: Color::DarkGray,
    border: Color::Gray,
    highlight_fg: Color::Black,
    highlight_bg: Color::Cyan,
    stripe_bg: Color::Reset,
    star: Color::Yellow,
    status: Color::Cyan,
    error: Color::Red,
    key_fg: Color::Black,
    key_bg: Color::Gray,
  },
];

/// Index of the theme called `name`, or the first theme.
pub fn theme_index(name: Option<&str>) -> usize {
  name.and_then(|n| THEMES.iter().position(|t| t.name.eq_ignore_ascii_case(n))).unwrap_or(0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn theme_lookup_is_case_insensitive() {
    assert_eq!(theme_index(Some("butter")), 1);
    assert_eq!(theme_index(Some("TERMINAL")), 2);
  }

  #[test]
  fn unknown_theme_defaults_to_first() {
    assert_eq!(theme_index(Some("neon")), 0);
    assert_eq!(theme_index(None), 0);
  }
}
