//! Application constants loaded from `constants.ron` at compile time.
//!
//! The RON file is embedded via `include_str!` so it's always available,
//! with no runtime file I/O. Parsed once on first access via `LazyLock`.

use serde::Deserialize;
use std::sync::LazyLock;

/// All tuneable application constants.
#[derive(Debug, Deserialize)]
pub struct Constants {
  /// Base window title, also shown in the header.
  pub app_name: String,
  pub detail_title_prefix: String,

  // OMDb
  pub omdb_base_url: String,
  pub default_api_key: String,

  // Messages
  pub not_found_message: String,
  pub search_failed_message: String,
  pub details_failed_message: String,

  // Rating
  pub detail_max_rating: u8,
  /// One label per star of the detail rating, indexed by `rating - 1`.
  pub rating_messages: Vec<String>,
  pub star_size: u16,

  // Status line
  pub error_expiry_secs: u64,
}

static CONSTANTS: LazyLock<Constants> = LazyLock::new(|| {
  // Safety: the RON file is embedded at compile time; if it's malformed this is a build-time error.
  ron::from_str(include_str!("../constants.ron")).expect("constants.ron must be valid RON (embedded at compile time)")
});

/// Returns a reference to the parsed application constants.
pub fn constants() -> &'static Constants {
  &CONSTANTS
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn embedded_constants_parse() {
    let c = constants();
    assert_eq!(c.app_name, "usePopcorn");
    assert_eq!(c.not_found_message, "Movie not Found");
    assert_eq!(c.detail_max_rating, 10);
    assert_eq!(c.rating_messages.len(), c.detail_max_rating as usize);
    assert!(c.omdb_base_url.starts_with("http"));
  }
}
