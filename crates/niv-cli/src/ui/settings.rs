//! Settings tab: profile fields and logout.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::Paragraph,
};

use super::pane;
use crate::app::{App, SettingsField};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let profile = app.session.profile();

  let field = |label: &str, key: char, which: SettingsField, value: String| {
    let editing = app.editing == Some(which);
    let shown = if editing {
      format!("{}▏", app.edit_buffer)
    } else {
      value
    };
    let style = if editing {
      Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
      Style::default()
    };
    Line::from(vec![
      Span::styled(format!("[{key}] {label}: "), Style::default().fg(Color::DarkGray)),
      Span::styled(shown, style),
    ])
  };

  let lines = vec![
    field("שם", 'n', SettingsField::Name, profile.name.clone()),
    field("משקל (ק\"ג)", 'w', SettingsField::Weight, format!("{}", profile.weight)),
    Line::default(),
    Line::from(Span::styled(
      "היעד היומי מתעדכן ברענון התפריט הבא.",
      Style::default().fg(Color::DarkGray),
    )),
    Line::default(),
    Line::from(Span::styled("[o] התנתקות", Style::default().fg(Color::Red))),
  ];

  f.render_widget(Paragraph::new(lines).block(pane("הגדרות")), area);
}
