//! Application state machine and event dispatcher.
//!
//! Key handling runs on the UI task. AI calls and the wearable sync are
//! spawned and report back as [`AppEvent`]s over an unbounded channel; the
//! main loop feeds them to [`App::handle_event`]. Nothing is cancelled or
//! deduplicated.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use niv_core::{
  DEFAULT_GOAL,
  activity::{self, Activity, WEARABLE_SYNC_DELAY, WearableActivity},
  generator::{MealGenerator, ProductAnalyzer},
  meal::{Meal, MealType},
  plan::DayState,
  profile::{ProfileSession, SessionError},
  scanner::{CaptureId, ScanResult, ScanState, Scanner},
};
use niv_gemini::GeminiClient;
use niv_store_sqlite::SqliteProfileStore;
use rand::rngs::StdRng;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{error, info, warn};

use crate::camera::FileCamera;

pub type Session = ProfileSession<SqliteProfileStore>;

// ─── Tabs ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
  Dashboard,
  Planner,
  Activity,
  Scanner,
  Settings,
}

impl Tab {
  pub const ALL: [Tab; 5] = [
    Tab::Dashboard,
    Tab::Planner,
    Tab::Activity,
    Tab::Scanner,
    Tab::Settings,
  ];

  pub fn title(self) -> &'static str {
    match self {
      Tab::Dashboard => "לוח בקרה",
      Tab::Planner => "תפריט",
      Tab::Activity => "פעילות",
      Tab::Scanner => "סורק",
      Tab::Settings => "הגדרות",
    }
  }

  pub fn index(self) -> usize {
    Self::ALL.iter().position(|t| *t == self).unwrap_or(0)
  }

  fn next(self) -> Self { Self::ALL[(self.index() + 1) % Self::ALL.len()] }

  fn prev(self) -> Self {
    Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
  }
}

// ─── Auth form ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode {
  Login,
  Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField {
  Name,
  /// Collected for the look of it; never checked or stored.
  Password,
  /// Register mode only.
  Weight,
}

#[derive(Debug, Clone)]
pub struct AuthForm {
  pub mode:     AuthMode,
  pub focus:    AuthField,
  pub name:     String,
  pub password: String,
  pub weight:   String,
}

impl Default for AuthForm {
  fn default() -> Self {
    Self {
      mode:     AuthMode::Login,
      focus:    AuthField::Name,
      name:     String::new(),
      password: String::new(),
      weight:   String::new(),
    }
  }
}

impl AuthForm {
  pub fn fields(&self) -> &'static [AuthField] {
    match self.mode {
      AuthMode::Login => &[AuthField::Name, AuthField::Password],
      AuthMode::Register => &[AuthField::Name, AuthField::Password, AuthField::Weight],
    }
  }

  fn cycle_focus(&mut self, forward: bool) {
    let fields = self.fields();
    let pos = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
    let len = fields.len();
    self.focus = if forward {
      fields[(pos + 1) % len]
    } else {
      fields[(pos + len - 1) % len]
    };
  }

  fn toggle_mode(&mut self) {
    self.mode = match self.mode {
      AuthMode::Login => AuthMode::Register,
      AuthMode::Register => AuthMode::Login,
    };
    if !self.fields().contains(&self.focus) {
      self.focus = AuthField::Name;
    }
  }

  fn focused_mut(&mut self) -> &mut String {
    match self.focus {
      AuthField::Name => &mut self.name,
      AuthField::Password => &mut self.password,
      AuthField::Weight => &mut self.weight,
    }
  }
}

// ─── Settings editing ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
  Name,
  Weight,
}

// ─── Background events ────────────────────────────────────────────────────────

/// Results delivered by spawned tasks.
#[derive(Debug)]
pub enum AppEvent {
  PlanLoaded {
    candidates: Vec<Meal>,
    /// Weight the request was made for; the target snapshot uses it.
    weight_kg:  f64,
  },
  Replacement {
    slot: MealType,
    meal: Option<Meal>,
  },
  Analysis {
    capture: CaptureId,
    outcome: Result<ScanResult, String>,
  },
  WearableSynced(WearableActivity),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub tab:            Tab,
  pub auth:           AuthForm,
  pub session:        Session,
  pub day:            DayState,
  /// Full-plan requests in flight.
  pub pending_plans:  usize,
  /// Replacement requests in flight, per slot index.
  pub replacing:      [usize; 4],
  pub scanner:        Scanner<FileCamera>,
  pub activity_query: String,
  /// Whether keystrokes go into `activity_query`.
  pub searching:      bool,
  /// Wearable records, newest first.
  pub synced:         Vec<WearableActivity>,
  pub pending_syncs:  usize,
  pub editing:        Option<SettingsField>,
  pub edit_buffer:    String,
  /// One-line status message shown in the status bar.
  pub status_msg:     String,

  gemini: Arc<GeminiClient>,
  rng:    StdRng,
  tx:     UnboundedSender<AppEvent>,
}

impl App {
  pub fn new(
    session: Session,
    gemini: GeminiClient,
    camera: FileCamera,
    rng: StdRng,
    tx: UnboundedSender<AppEvent>,
  ) -> Self {
    let day = DayState::new(session.profile().weight);
    let auth = AuthForm {
      name: session.profile().name.clone(),
      ..AuthForm::default()
    };
    Self {
      tab: Tab::Dashboard,
      auth,
      session,
      day,
      pending_plans: 0,
      replacing: [0; 4],
      scanner: Scanner::new(camera),
      activity_query: String::new(),
      searching: false,
      synced: Vec::new(),
      pending_syncs: 0,
      editing: None,
      edit_buffer: String::new(),
      status_msg: String::new(),
      gemini: Arc::new(gemini),
      rng,
      tx,
    }
  }

  /// Kick off the first plan fetch if a user is already logged in.
  pub fn start(&mut self) {
    if self.session.is_logged_in() {
      self.refresh_plan();
    }
  }

  pub fn is_loading_plan(&self) -> bool { self.pending_plans > 0 }

  pub fn is_replacing(&self, slot: MealType) -> bool {
    self.replacing[slot.index()] > 0
  }

  pub fn activity_results(&self) -> Vec<&'static Activity> {
    activity::search(&self.activity_query)
  }

  // ── Background work ───────────────────────────────────────────────────────

  /// Request a new candidate pool and, when it lands, a new selection.
  pub fn refresh_plan(&mut self) {
    let weight_kg = self.session.profile().weight;
    let gemini = self.gemini.clone();
    let tx = self.tx.clone();
    self.pending_plans += 1;
    self.status_msg = "מכין תפריט…".into();
    info!(weight_kg, "refreshing daily plan");
    tokio::spawn(async move {
      let candidates = gemini.generate_candidates(DEFAULT_GOAL, weight_kg).await;
      let _ = tx.send(AppEvent::PlanLoaded { candidates, weight_kg });
    });
  }

  pub fn replace_slot(&mut self, slot: MealType) {
    let weight_kg = self.session.profile().weight;
    let gemini = self.gemini.clone();
    let tx = self.tx.clone();
    self.replacing[slot.index()] += 1;
    info!(%slot, "replacing meal");
    tokio::spawn(async move {
      let meal = gemini.replacement_meal(slot, DEFAULT_GOAL, weight_kg).await;
      let _ = tx.send(AppEvent::Replacement { slot, meal });
    });
  }

  pub fn sync_wearable(&mut self) {
    let tx = self.tx.clone();
    self.pending_syncs += 1;
    tokio::spawn(async move {
      tokio::time::sleep(WEARABLE_SYNC_DELAY).await;
      let _ = tx.send(AppEvent::WearableSynced(
        activity::simulated_wearable_activity(),
      ));
    });
  }

  fn capture_and_analyze(&mut self) {
    let Some(frame) = self.scanner.capture() else {
      self.status_msg = "לא ניתן לצלם תמונה".into();
      return;
    };
    let jpeg_base64 = frame.to_base64();
    let capture = frame.capture;
    let gemini = self.gemini.clone();
    let tx = self.tx.clone();
    self.status_msg = "מנתח מוצר…".into();
    tokio::spawn(async move {
      let outcome = gemini
        .analyze_product(&jpeg_base64)
        .await
        .map_err(|e| e.to_string());
      let _ = tx.send(AppEvent::Analysis { capture, outcome });
    });
  }

  /// Apply a result delivered by a spawned task.
  pub fn handle_event(&mut self, event: AppEvent) {
    match event {
      AppEvent::PlanLoaded { candidates, weight_kg } => {
        self.pending_plans = self.pending_plans.saturating_sub(1);
        let count = candidates.len();
        self.day.apply_candidates(candidates, weight_kg, &mut self.rng);
        self.status_msg = if count == 0 {
          "לא התקבלו מנות. נסה לרענן.".into()
        } else {
          String::new()
        };
      }
      AppEvent::Replacement { slot, meal } => {
        let counter = &mut self.replacing[slot.index()];
        *counter = counter.saturating_sub(1);
        if !self.day.apply_replacement(slot, meal) {
          self.status_msg = format!("החלפת {slot} נכשלה");
        }
      }
      AppEvent::Analysis { capture, outcome } => {
        // Results for abandoned captures leave the screen untouched.
        if !self.scanner.finish(capture, outcome) {
          return;
        }
        if self.scanner.state() == &ScanState::Idle {
          self.status_msg = "הניתוח נכשל. לחץ r לנסות שוב.".into();
        } else {
          self.status_msg.clear();
        }
      }
      AppEvent::WearableSynced(record) => {
        self.pending_syncs = self.pending_syncs.saturating_sub(1);
        self.synced.insert(0, record);
      }
    }
  }

  // ── Navigation ────────────────────────────────────────────────────────────

  /// Move to `tab`, acquiring or releasing the camera as the scanner tab is
  /// entered or left.
  pub fn switch_tab(&mut self, tab: Tab) {
    if tab == self.tab {
      return;
    }
    if self.tab == Tab::Scanner {
      self.scanner.leave();
    }
    self.tab = tab;
    self.searching = false;
    self.editing = None;
    self.status_msg.clear();
    if tab == Tab::Scanner {
      self.start_camera();
    }
  }

  fn start_camera(&mut self) {
    if !self.scanner.start() {
      self.status_msg = "אין גישה למצלמה".into();
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    if !self.session.is_logged_in() {
      return self.handle_auth_key(key).await;
    }
    if self.searching {
      self.handle_search_key(key);
      return Ok(true);
    }
    if self.editing.is_some() {
      self.handle_edit_key(key).await;
      return Ok(true);
    }

    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Tab | KeyCode::Right => self.switch_tab(self.tab.next()),
      KeyCode::BackTab | KeyCode::Left => self.switch_tab(self.tab.prev()),
      _ => match self.tab {
        Tab::Dashboard => self.handle_dashboard_key(key),
        Tab::Planner => self.handle_planner_key(key),
        Tab::Activity => self.handle_activity_key(key),
        Tab::Scanner => self.handle_scanner_key(key),
        Tab::Settings => self.handle_settings_key(key).await,
      },
    }
    Ok(true)
  }

  async fn handle_auth_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Esc => return Ok(false),
      KeyCode::F(2) => self.auth.toggle_mode(),
      KeyCode::Tab | KeyCode::Down => self.auth.cycle_focus(true),
      KeyCode::BackTab | KeyCode::Up => self.auth.cycle_focus(false),
      KeyCode::Backspace => {
        self.auth.focused_mut().pop();
      }
      KeyCode::Enter => self.submit_auth().await,
      KeyCode::Char(c) => {
        if self.auth.focus != AuthField::Weight || c.is_ascii_digit() || c == '.' {
          self.auth.focused_mut().push(c);
        }
      }
      _ => {}
    }
    Ok(true)
  }

  async fn submit_auth(&mut self) {
    let name = self.auth.name.trim().to_owned();
    if name.is_empty() {
      self.status_msg = "יש להזין שם".into();
      return;
    }

    let result = match self.auth.mode {
      AuthMode::Login => self.session.login(name).await,
      AuthMode::Register => {
        let Ok(weight_kg) = self.auth.weight.trim().parse::<f64>() else {
          self.status_msg = "משקל לא תקין".into();
          return;
        };
        self.session.register(name, weight_kg).await
      }
    };

    match result {
      Ok(()) => {
        self.auth.password.clear();
        self.status_msg.clear();
        self.tab = Tab::Dashboard;
        self.day = DayState::new(self.session.profile().weight);
        self.refresh_plan();
      }
      Err(e) => self.report_session_error(e),
    }
  }

  fn report_session_error(&mut self, e: SessionError<niv_store_sqlite::Error>) {
    match e {
      SessionError::Invalid(e) => {
        warn!(error = %e, "rejected profile input");
        self.status_msg = "משקל לא תקין".into();
      }
      SessionError::Store(e) => {
        error!(error = %e, "failed to save profile");
        self.status_msg = format!("שמירת הפרופיל נכשלה: {e}");
      }
    }
  }

  fn handle_dashboard_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('r') {
      self.refresh_plan();
    }
  }

  fn handle_planner_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('r') => self.refresh_plan(),
      KeyCode::Char(c @ '1'..='4') => {
        let idx = c as usize - '1' as usize;
        self.replace_slot(MealType::ALL[idx]);
      }
      _ => {}
    }
  }

  fn handle_activity_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('/') => self.searching = true,
      KeyCode::Char('s') => self.sync_wearable(),
      KeyCode::Esc => self.activity_query.clear(),
      _ => {}
    }
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.searching = false;
        self.activity_query.clear();
      }
      KeyCode::Enter => self.searching = false,
      KeyCode::Backspace => {
        self.activity_query.pop();
      }
      KeyCode::Char(c) => self.activity_query.push(c),
      _ => {}
    }
  }

  fn handle_scanner_key(&mut self, key: KeyEvent) {
    let state = self.scanner.state().clone();
    match (key.code, state) {
      (KeyCode::Enter | KeyCode::Char(' '), ScanState::Capturing) => {
        self.capture_and_analyze();
      }
      (KeyCode::Char('r'), ScanState::ResultShown(_)) => {
        self.scanner.retry();
        self.start_camera();
      }
      (KeyCode::Char('r') | KeyCode::Enter, ScanState::Idle) => {
        self.status_msg.clear();
        self.start_camera();
      }
      _ => {}
    }
  }

  async fn handle_settings_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('n') => {
        self.editing = Some(SettingsField::Name);
        self.edit_buffer = self.session.profile().name.clone();
      }
      KeyCode::Char('w') => {
        self.editing = Some(SettingsField::Weight);
        self.edit_buffer = self.session.profile().weight.to_string();
      }
      KeyCode::Char('o') => self.logout().await,
      _ => {}
    }
  }

  async fn handle_edit_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.editing = None;
        self.edit_buffer.clear();
      }
      KeyCode::Backspace => {
        self.edit_buffer.pop();
      }
      KeyCode::Enter => self.commit_edit().await,
      KeyCode::Char(c) => {
        if self.editing != Some(SettingsField::Weight) || c.is_ascii_digit() || c == '.' {
          self.edit_buffer.push(c);
        }
      }
      _ => {}
    }
  }

  async fn commit_edit(&mut self) {
    let Some(field) = self.editing.take() else { return };
    let input = std::mem::take(&mut self.edit_buffer);
    let result = match field {
      SettingsField::Name => self.session.set_name(input.trim()).await,
      SettingsField::Weight => match input.trim().parse::<f64>() {
        Ok(w) => self.session.set_weight(w).await,
        Err(_) => {
          self.status_msg = "משקל לא תקין".into();
          return;
        }
      },
    };
    match result {
      Ok(()) => self.status_msg = "נשמר".into(),
      Err(e) => self.report_session_error(e),
    }
  }

  async fn logout(&mut self) {
    self.scanner.leave();
    if let Err(e) = self.session.logout().await {
      self.report_session_error(e);
      return;
    }
    self.tab = Tab::Dashboard;
    self.auth = AuthForm {
      name: self.session.profile().name.clone(),
      ..AuthForm::default()
    };
  }
}
