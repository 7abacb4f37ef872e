//! Login / register form shown while no one is logged in.

use ratatui::{
  Frame,
  layout::{Constraint, Flex, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use super::{ACCENT, pane};
use crate::app::{App, AuthField, AuthMode};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let form = &app.auth;
  let [area] = Layout::horizontal([Constraint::Length(48)])
    .flex(Flex::Center)
    .areas(area);
  let [area] = Layout::vertical([Constraint::Length(12)])
    .flex(Flex::Center)
    .areas(area);

  let title = match form.mode {
    AuthMode::Login => "התחברות",
    AuthMode::Register => "הרשמה",
  };
  let block = pane(title);
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines = vec![
    Line::from(Span::styled(
      "NiV · פיטנס נגיש",
      Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )),
    Line::default(),
  ];
  for field in form.fields() {
    let (label, value) = match field {
      AuthField::Name => ("שם", form.name.clone()),
      AuthField::Password => ("סיסמה", "•".repeat(form.password.chars().count())),
      AuthField::Weight => ("משקל (ק\"ג)", form.weight.clone()),
    };
    let focused = *field == form.focus;
    let style = if focused {
      Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "▏" } else { "" };
    lines.push(Line::from(vec![
      Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
      Span::styled(format!("{value}{cursor}"), style),
    ]));
  }
  lines.push(Line::default());
  lines.push(Line::from(Span::styled(
    match form.mode {
      AuthMode::Login => "F2 למעבר להרשמה",
      AuthMode::Register => "F2 למעבר להתחברות",
    },
    Style::default().fg(Color::DarkGray),
  )));

  f.render_widget(Paragraph::new(lines), inner);
}
