//! `niv`: terminal UI for the NiV fitness companion.
//!
//! # Usage
//!
//! ```
//! GEMINI_API_KEY=... niv
//! niv --config ~/.config/niv/config.toml --camera-frame /tmp/frame.jpg
//! ```
//!
//! Logs go to a file (`log_file`, default `~/.cache/niv/niv.log`) because the
//! terminal belongs to the UI. Set `RUST_LOG` to change the level.

mod app;
mod camera;
mod settings;
mod ui;

use std::{
  fs::{self, OpenOptions},
  io,
  path::PathBuf,
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::{App, AppEvent};
use camera::FileCamera;
use clap::Parser;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use niv_core::profile::ProfileSession;
use niv_gemini::GeminiClient;
use niv_store_sqlite::SqliteProfileStore;
use rand::{SeedableRng, rngs::StdRng};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::{DEFAULT_CONFIG_PATH, Settings};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "niv", version, about = "NiV fitness companion in the terminal")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
  config: PathBuf,

  /// Gemini API key.
  #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
  api_key: Option<String>,

  /// Gemini model name.
  #[arg(long)]
  model: Option<String>,

  /// SQLite file holding the local profile.
  #[arg(long, value_name = "FILE")]
  store: Option<PathBuf>,

  /// JPEG frame written by an external camera capture tool.
  #[arg(long, value_name = "FILE")]
  camera_frame: Option<PathBuf>,

  #[arg(long, value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // CLI flags override the environment, which overrides the config file.
  let mut settings = Settings::load(&args.config)?;
  if let Some(key) = args.api_key {
    settings.api_key = Some(key);
  }
  if let Some(model) = args.model {
    settings.model = model;
  }
  if let Some(store) = args.store {
    settings.store_path = store;
  }
  if let Some(frame) = args.camera_frame {
    settings.camera_frame = frame;
  }
  if let Some(log_file) = args.log_file {
    settings.log_file = log_file;
  }
  settings.expand_paths();

  init_tracing(&settings)?;
  info!(model = %settings.model, store = %settings.store_path.display(), "starting niv");

  if let Some(dir) = settings.store_path.parent() {
    fs::create_dir_all(dir)
      .with_context(|| format!("creating store directory {}", dir.display()))?;
  }
  let store = SqliteProfileStore::open(&settings.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", settings.store_path))?;
  let session = ProfileSession::load(store)
    .await
    .context("failed to load profile")?;

  let gemini = GeminiClient::new(settings.gemini()).context("building Gemini client")?;
  if !gemini.has_api_key() {
    tracing::warn!("no Gemini API key configured; AI features return empty results");
  }

  let (tx, rx) = mpsc::unbounded_channel();
  let mut app = App::new(
    session,
    gemini,
    FileCamera::new(&settings.camera_frame),
    StdRng::from_entropy(),
    tx,
  );

  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  app.start();

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app, rx).await;

  // Releases the camera if the scanner tab was open.
  drop(app);

  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

fn init_tracing(settings: &Settings) -> Result<()> {
  if let Some(dir) = settings.log_file.parent() {
    fs::create_dir_all(dir)
      .with_context(|| format!("creating log directory {}", dir.display()))?;
  }
  let file = OpenOptions::new()
    .create(true)
    .append(true)
    .open(&settings.log_file)
    .with_context(|| format!("opening log file {}", settings.log_file.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(Mutex::new(file))
    .with_ansi(false)
    .init();
  Ok(())
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
  mut rx: UnboundedReceiver<AppEvent>,
) -> Result<()> {
  loop {
    // Apply whatever background tasks have finished.
    while let Ok(evt) = rx.try_recv() {
      app.handle_event(evt);
    }

    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
