//! Scanner tab: camera state, capture and the analysis verdict.

use niv_core::scanner::ScanState;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Gauge, Paragraph, Wrap},
};

use super::pane;
use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = pane("סורק מוצרים");

  let ScanState::ResultShown(result) = app.scanner.state() else {
    let (text, color) = match app.scanner.state() {
      ScanState::Capturing => ("המצלמה פעילה. לחץ Enter לצילום המוצר.", Color::White),
      ScanState::Analyzing => ("מנתח את המוצר…", Color::Yellow),
      _ => ("המצלמה כבויה. לחץ r לניסיון חוזר.", Color::DarkGray),
    };
    f.render_widget(
      Paragraph::new(Span::styled(text, Style::default().fg(color))).block(block),
      area,
    );
    return;
  };

  let inner = block.inner(area);
  f.render_widget(block, area);

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1),
      Constraint::Length(1),
      Constraint::Min(0),
    ])
    .split(inner);

  f.render_widget(
    Paragraph::new(Span::styled(
      result.product_name.clone(),
      Style::default().add_modifier(Modifier::BOLD),
    )),
    rows[0],
  );

  let color = match result.score {
    70..=100 => Color::Green,
    40..=69 => Color::Yellow,
    _ => Color::Red,
  };
  f.render_widget(
    Gauge::default()
      .gauge_style(Style::default().fg(color).bg(Color::Black))
      .percent(u16::from(result.score))
      .label(format!("ציון התאמה לחיטוב: {}", result.score)),
    rows[1],
  );

  f.render_widget(
    Paragraph::new(vec![
      Line::default(),
      Line::from(result.analysis.clone()),
      Line::default(),
      Line::from(Span::styled(
        "r לסריקה נוספת",
        Style::default().fg(Color::DarkGray),
      )),
    ])
    .wrap(Wrap { trim: true }),
    rows[2],
  );
}
