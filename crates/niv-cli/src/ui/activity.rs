//! Activity tab: catalog search and the simulated watch sync.

use std::str::FromStr;

use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{List, ListItem, Paragraph},
};

use super::pane;
use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
    .split(area);

  draw_catalog(f, cols[0], app);
  draw_synced(f, cols[1], app);
}

fn draw_catalog(f: &mut Frame, area: Rect, app: &App) {
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(0)])
    .split(area);

  let cursor = if app.searching { "▏" } else { "" };
  let query_style = if app.searching {
    Style::default().fg(Color::White)
  } else {
    Style::default().fg(Color::Gray)
  };
  f.render_widget(
    Paragraph::new(Line::from(vec![
      Span::styled("🔍 ", Style::default().fg(Color::DarkGray)),
      Span::styled(format!("{}{cursor}", app.activity_query), query_style),
    ]))
    .block(pane("חיפוש")),
    rows[0],
  );

  let results = app.activity_results();
  let block = pane(&format!("פעילויות ({})", results.len()));

  if results.is_empty() {
    f.render_widget(
      Paragraph::new(Span::styled(
        "לא נמצאו פעילויות",
        Style::default().fg(Color::DarkGray),
      ))
      .block(block),
      rows[1],
    );
    return;
  }

  let items: Vec<ListItem> = results
    .iter()
    .map(|a| {
      let color = Color::from_str(a.color()).unwrap_or(Color::White);
      ListItem::new(Line::from(vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(a.name, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  {} קל' · {}", a.burn_kcal, a.duration)),
        Span::styled(format!("  {}", a.intensity.label()), Style::default().fg(color)),
      ]))
    })
    .collect();
  f.render_widget(List::new(items).block(block), rows[1]);
}

fn draw_synced(f: &mut Frame, area: Rect, app: &App) {
  let block = pane("שעון חכם");
  let mut items: Vec<ListItem> = Vec::new();

  if app.pending_syncs > 0 {
    items.push(ListItem::new(Span::styled(
      "מסנכרן…",
      Style::default().fg(Color::Yellow),
    )));
  }
  if app.synced.is_empty() && app.pending_syncs == 0 {
    items.push(ListItem::new(Span::styled(
      "לחץ s לסנכרון השעון",
      Style::default().fg(Color::DarkGray),
    )));
  }
  for record in &app.synced {
    items.push(ListItem::new(vec![
      Line::from(Span::styled(
        record.name.clone(),
        Style::default().add_modifier(Modifier::BOLD),
      )),
      Line::from(Span::styled(
        format!("{} קל' · {}", record.calories, record.date),
        Style::default().fg(Color::DarkGray),
      )),
    ]));
  }

  f.render_widget(List::new(items).block(block), area);
}
