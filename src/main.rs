mod app;
mod config;
mod constants;
mod details;
mod input;
mod omdb;
mod rating;
mod search;
mod selection;
mod theme;
mod title;
mod ui;
mod watched;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use ratatui::{
  DefaultTerminal,
  crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
  },
};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use app::App;
use config::{ApiSettings, Config};
use omdb::OmdbClient;
use title::WindowTitle;

// --- CLI ---

#[derive(Parser, Debug)]
#[command(author, version = env!("CARGO_PKG_VERSION"), about = "Search, rate and track movies from the terminal", long_about = None)]
struct Args {
  /// OMDb API key (overrides OMDB_API_KEY and the config file)
  #[arg(short = 'k', long)]
  api_key: Option<String>,

  /// OMDb endpoint base URL
  #[arg(long)]
  base_url: Option<String>,

  /// Log filter, e.g. 'debug' or 'popcorn=trace' (RUST_LOG takes precedence)
  #[arg(long)]
  log_level: Option<String>,

  /// Print a shell completion script and exit
  #[arg(long, value_name = "SHELL")]
  completions: Option<Shell>,
}

/// Route tracing output to a log file; the terminal belongs to the UI.
fn init_logging(level: &str) -> Result<WorkerGuard> {
  let log_dir = Config::log_dir();
  std::fs::create_dir_all(&log_dir).with_context(|| format!("Failed to create log dir {}", log_dir.display()))?;
  let appender = tracing_appender::rolling::never(&log_dir, "popcorn.log");
  let (writer, guard) = tracing_appender::non_blocking(appender);
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(writer).with_ansi(false).init();
  Ok(guard)
}

// --- Main ---

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  if let Some(shell) = args.completions {
    clap_complete::generate(shell, &mut Args::command(), "popcorn", &mut std::io::stdout());
    return Ok(());
  }

  let config = Config::load();
  let level = args.log_level.clone().or_else(|| config.log_level.clone()).unwrap_or_else(|| "info".to_string());
  let _guard = init_logging(&level)?;

  let settings = ApiSettings::resolve(args.api_key, args.base_url, std::env::var("OMDB_API_KEY").ok(), &config);
  info!(base_url = %settings.base_url, "starting");
  let client = OmdbClient::new(&settings)?;
  let app = App::new(Arc::new(client), theme::theme_index(config.theme_name.as_deref()));

  let default_hook = std::panic::take_hook();
  std::panic::set_hook(Box::new(move |info| {
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();
    default_hook(info);
  }));

  let mut terminal = ratatui::init();
  execute!(std::io::stdout(), EnableMouseCapture).context("Failed to enable mouse capture")?;
  let result = run(&mut terminal, app).await;
  let _ = execute!(std::io::stdout(), DisableMouseCapture);
  ratatui::restore();
  result
}

async fn run(terminal: &mut DefaultTerminal, mut app: App) -> Result<()> {
  let mut window_title = WindowTitle::default();

  loop {
    app.check_pending();
    app.expire_error();

    terminal.draw(|frame| ui::ui(frame, &mut app))?;
    window_title.sync(&mut std::io::stdout(), app.window_title())?;

    if event::poll(Duration::from_millis(100))? {
      match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => input::handle_key_event(&mut app, key),
        Event::Mouse(mouse) => input::handle_mouse_event(&mut app, mouse),
        _ => {}
      }
    }

    if app.should_quit {
      break;
    }
  }

  window_title.restore(&mut std::io::stdout())?;
  info!(watched = app.watched.len(), "exiting");
  Ok(())
}
