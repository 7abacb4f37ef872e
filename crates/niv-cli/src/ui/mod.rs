//! TUI rendering. Routes to the auth screen or the active tab.

pub mod activity;
pub mod auth;
pub mod dashboard;
pub mod planner;
pub mod scanner;
pub mod settings;

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Paragraph, Tabs},
};

use crate::app::{App, Tab};

/// Accent used for highlights across panes.
pub const ACCENT: Color = Color::Rgb(34, 197, 94);

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(f.area());

  draw_header(f, rows[0], app);

  if !app.session.is_logged_in() {
    auth::draw(f, rows[1], app);
  } else {
    match app.tab {
      Tab::Dashboard => dashboard::draw(f, rows[1], app),
      Tab::Planner => planner::draw(f, rows[1], app),
      Tab::Activity => activity::draw(f, rows[1], app),
      Tab::Scanner => scanner::draw(f, rows[1], app),
      Tab::Settings => settings::draw(f, rows[1], app),
    }
  }

  draw_status(f, rows[2], app);
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let date = Local::now().format("%Y-%m-%d").to_string();
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([
      Constraint::Length(6),
      Constraint::Min(0),
      Constraint::Length(date.len() as u16 + 1),
    ])
    .split(inner);

  f.render_widget(
    Paragraph::new(Span::styled(
      " NiV ",
      Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )),
    cols[0],
  );

  if app.session.is_logged_in() {
    let titles = Tab::ALL.iter().map(|t| t.title());
    let tabs = Tabs::new(titles)
      .select(app.tab.index())
      .style(Style::default().fg(Color::White))
      .highlight_style(
        Style::default()
          .fg(Color::Black)
          .bg(ACCENT)
          .add_modifier(Modifier::BOLD),
      );
    f.render_widget(tabs, cols[1]);
  }

  f.render_widget(
    Paragraph::new(Span::styled(date, Style::default().fg(Color::Gray))),
    cols[2],
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = if !app.session.is_logged_in() {
    ("AUTH", "Tab field  F2 login/register  Enter submit  Esc quit")
  } else if app.searching {
    ("SEARCH", "Type to filter  Enter done  Esc clear")
  } else if app.editing.is_some() {
    ("EDIT", "Enter save  Esc cancel")
  } else {
    match app.tab {
      Tab::Dashboard => ("NORMAL", "Tab/←→ tabs  r refresh plan  q quit"),
      Tab::Planner => ("PLAN", "r refresh  1-4 replace meal  Tab/←→ tabs  q quit"),
      Tab::Activity => ("ACTIVITY", "/ search  s sync watch  Esc clear  q quit"),
      Tab::Scanner => ("SCAN", "Enter capture  r retry  Tab/←→ tabs  q quit"),
      Tab::Settings => ("SETTINGS", "n name  w weight  o logout  q quit"),
    }
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let line = Line::from(vec![
    Span::styled(
      format!(" {mode_label} "),
      Style::default()
        .fg(Color::Black)
        .bg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    Span::styled(format!("  {status}"), Style::default().fg(Color::DarkGray)),
  ]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}

/// A bordered pane with a title, dimmed border.
pub fn pane(title: &str) -> Block<'static> {
  Block::default()
    .title(format!(" {title} "))
    .borders(ratatui::widgets::Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray))
}
