//! OMDb client and the provider-facing data model.
//!
//! The raw provider payloads (`Title`, `imdbID`, `"N/A"` placeholders) are
//! decoded into private serde structs and converted into the domain types the
//! rest of the app works with.

use anyhow::{Context, Result, anyhow, bail};
use chrono::NaiveDate;
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::{Client, Url};
use serde::Deserialize;
use tracing::debug;

use crate::config::ApiSettings;

/// Date format OMDb uses for `Released`, e.g. `16 Jul 2010`.
const RELEASE_DATE_FORMAT: &str = "%d %b %Y";

/// A single row of a search response.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResultItem {
  pub id: String,
  pub title: String,
  pub year: String,
  pub poster: Option<String>,
}

/// Full record for one title.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
  pub id: String,
  pub title: String,
  pub year: String,
  pub poster: Option<String>,
  pub runtime_minutes: Option<u32>,
  /// IMDb rating on a 0-10 scale.
  pub critic_rating: Option<f64>,
  pub plot: String,
  pub released: Option<NaiveDate>,
  pub actors: String,
  pub director: String,
  pub genre: String,
}

/// Outcome of a search that reached the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
  Found(Vec<SearchResultItem>),
  NotFound,
}

/// The two lookups the app needs from a movie provider.
///
/// Futures are `'static` so they can be handed straight to `tokio::spawn`.
pub trait MovieApi: Send + Sync {
  fn search(&self, query: &str) -> BoxFuture<'static, Result<SearchOutcome>>;
  fn details(&self, id: &str) -> BoxFuture<'static, Result<MovieDetail>>;
}

// --- Provider payloads ---

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
  #[serde(rename = "Response")]
  response: String,
  #[serde(rename = "Search", default)]
  search: Vec<OmdbSearchItem>,
}

#[derive(Debug, Deserialize)]
struct OmdbSearchItem {
  #[serde(rename = "imdbID")]
  imdb_id: String,
  #[serde(rename = "Title")]
  title: String,
  #[serde(rename = "Year", default)]
  year: String,
  #[serde(rename = "Poster", default)]
  poster: String,
}

#[derive(Debug, Deserialize)]
struct OmdbDetail {
  #[serde(rename = "Response")]
  response: String,
  #[serde(rename = "Error")]
  error: Option<String>,
  #[serde(rename = "imdbID", default)]
  imdb_id: String,
  #[serde(rename = "Title", default)]
  title: String,
  #[serde(rename = "Year", default)]
  year: String,
  #[serde(rename = "Poster", default)]
  poster: String,
  #[serde(rename = "Runtime", default)]
  runtime: String,
  #[serde(rename = "imdbRating", default)]
  imdb_rating: String,
  #[serde(rename = "Plot", default)]
  plot: String,
  #[serde(rename = "Released", default)]
  released: String,
  #[serde(rename = "Actors", default)]
  actors: String,
  #[serde(rename = "Director", default)]
  director: String,
  #[serde(rename = "Genre", default)]
  genre: String,
}

/// OMDb uses the literal `N/A` for missing values.
fn present(s: &str) -> Option<&str> {
  let s = s.trim();
  (!s.is_empty() && s != "N/A").then_some(s)
}

/// Parse `"148 min"` into `148`.
pub fn parse_runtime(raw: &str) -> Option<u32> {
  present(raw)?.split_whitespace().next()?.parse().ok()
}

pub fn parse_rating(raw: &str) -> Option<f64> {
  present(raw)?.parse::<f64>().ok().filter(|r| r.is_finite())
}

pub fn parse_released(raw: &str) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(present(raw)?, RELEASE_DATE_FORMAT).ok()
}

impl From<OmdbSearchItem> for SearchResultItem {
  fn from(raw: OmdbSearchItem) -> Self {
    Self { poster: present(&raw.poster).map(str::to_string), id: raw.imdb_id, title: raw.title, year: raw.year }
  }
}

impl From<OmdbDetail> for MovieDetail {
  fn from(raw: OmdbDetail) -> Self {
    Self {
      poster: present(&raw.poster).map(str::to_string),
      runtime_minutes: parse_runtime(&raw.runtime),
      critic_rating: parse_rating(&raw.imdb_rating),
      released: parse_released(&raw.released),
      id: raw.imdb_id,
      title: raw.title,
      year: raw.year,
      plot: raw.plot,
      actors: raw.actors,
      director: raw.director,
      genre: raw.genre,
    }
  }
}

fn decode_search(body: &str) -> Result<SearchOutcome> {
  let parsed: OmdbSearchResponse = serde_json::from_str(body).context("Failed to decode OMDb search response")?;
  if parsed.response != "True" || parsed.search.is_empty() {
    return Ok(SearchOutcome::NotFound);
  }
  Ok(SearchOutcome::Found(parsed.search.into_iter().map(SearchResultItem::from).collect()))
}

fn decode_detail(body: &str) -> Result<MovieDetail> {
  let parsed: OmdbDetail = serde_json::from_str(body).context("Failed to decode OMDb detail response")?;
  if parsed.response != "True" {
    bail!("OMDb lookup failed: {}", parsed.error.as_deref().unwrap_or("unknown error"));
  }
  Ok(parsed.into())
}

// --- HTTP client ---

#[derive(Clone)]
pub struct OmdbClient {
  http_client: Client,
  base_url: Url,
  api_key: String,
}

impl OmdbClient {
  pub fn new(settings: &ApiSettings) -> Result<Self> {
    let base_url =
      Url::parse(&settings.base_url).with_context(|| format!("Invalid OMDb base URL: {}", settings.base_url))?;
    Ok(Self { http_client: Client::new(), base_url, api_key: settings.api_key.clone() })
  }

  fn url(&self, param: &str, value: &str) -> Url {
    let mut url = self.base_url.clone();
    url.query_pairs_mut().append_pair("apikey", &self.api_key).append_pair(param, value);
    url
  }

  /// Transport errors are stripped of their URL, which carries the API key.
  async fn get(client: Client, url: Url) -> Result<String> {
    let response =
      client.get(url).send().await.map_err(reqwest::Error::without_url).context("Failed to reach OMDb")?;
    let status = response.status();
    if !status.is_success() {
      return Err(anyhow!("OMDb returned HTTP {}", status));
    }
    response.text().await.map_err(reqwest::Error::without_url).context("Failed to read OMDb response body")
  }
}

impl MovieApi for OmdbClient {
  fn search(&self, query: &str) -> BoxFuture<'static, Result<SearchOutcome>> {
    let client = self.http_client.clone();
    let url = self.url("s", query);
    let query = query.to_string();
    async move {
      debug!(query = %query, "omdb: search request");
      let body = Self::get(client, url).await?;
      decode_search(&body)
    }
    .boxed()
  }

  fn details(&self, id: &str) -> BoxFuture<'static, Result<MovieDetail>> {
    let client = self.http_client.clone();
    let url = self.url("i", id);
    let id = id.to_string();
    async move {
      debug!(id = %id, "omdb: detail request");
      let body = Self::get(client, url).await?;
      decode_detail(&body)
    }
    .boxed()
  }
}

/// Scripted in-memory provider for driving the sessions in tests.
#[cfg(test)]
pub(crate) mod mock {
  use super::*;
  use std::collections::HashMap;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::{Arc, Mutex};
  use std::time::Duration;

  #[derive(Clone)]
  pub enum Scripted<T> {
    Ok(T),
    Fail(String),
  }

  #[derive(Default)]
  pub struct MockApi {
    searches: Mutex<HashMap<String, (Duration, Scripted<SearchOutcome>)>>,
    details: Mutex<HashMap<String, (Duration, Scripted<MovieDetail>)>>,
    /// Number of requests that ran to completion, per query or id.
    completed: Arc<Mutex<HashMap<String, usize>>>,
    started: AtomicUsize,
  }

  impl MockApi {
    pub fn new() -> Arc<Self> {
      Arc::new(Self::default())
    }

    pub fn on_search(&self, query: &str, delay_ms: u64, outcome: Scripted<SearchOutcome>) {
      self.searches.lock().unwrap().insert(query.to_string(), (Duration::from_millis(delay_ms), outcome));
    }

    pub fn on_details(&self, id: &str, delay_ms: u64, outcome: Scripted<MovieDetail>) {
      self.details.lock().unwrap().insert(id.to_string(), (Duration::from_millis(delay_ms), outcome));
    }

    pub fn completed(&self, key: &str) -> usize {
      self.completed.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn started(&self) -> usize {
      self.started.load(Ordering::SeqCst)
    }

    fn run<T: Clone + Send + 'static>(
      &self,
      key: &str,
      script: Option<(Duration, Scripted<T>)>,
    ) -> BoxFuture<'static, Result<T>> {
      self.started.fetch_add(1, Ordering::SeqCst);
      let completed = Arc::clone(&self.completed);
      let key = key.to_string();
      async move {
        let (delay, outcome) = script.ok_or_else(|| anyhow!("no script for {}", key))?;
        tokio::time::sleep(delay).await;
        *completed.lock().unwrap().entry(key).or_default() += 1;
        match outcome {
          Scripted::Ok(value) => Ok(value),
          Scripted::Fail(msg) => Err(anyhow!(msg)),
        }
      }
      .boxed()
    }
  }

  impl MovieApi for MockApi {
    fn search(&self, query: &str) -> BoxFuture<'static, Result<SearchOutcome>> {
      let script = self.searches.lock().unwrap().get(query).cloned();
      self.run(query, script)
    }

    fn details(&self, id: &str) -> BoxFuture<'static, Result<MovieDetail>> {
      let script = self.details.lock().unwrap().get(id).cloned();
      self.run(id, script)
    }
  }

  pub fn item(id: &str, title: &str) -> SearchResultItem {
    SearchResultItem { id: id.to_string(), title: title.to_string(), year: "2010".to_string(), poster: None }
  }

  pub fn detail(id: &str, title: &str) -> MovieDetail {
    MovieDetail {
      id: id.to_string(),
      title: title.to_string(),
      year: "2010".to_string(),
      poster: None,
      runtime_minutes: Some(148),
      critic_rating: Some(8.8),
      plot: "A thief who steals corporate secrets.".to_string(),
      released: NaiveDate::from_ymd_opt(2010, 7, 16),
      actors: "Leonardo DiCaprio".to_string(),
      director: "Christopher Nolan".to_string(),
      genre: "Action, Sci-Fi".to_string(),
    }
  }
}
