//! Dashboard: calorie ring as a consumed/remaining gauge, macro bars and the
//! day's meal summary.

use niv_core::{
  macros::{MacroTotals, percent_of_target},
  plan::DailyPlan,
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Gauge, List, ListItem, Paragraph},
};

use super::{ACCENT, pane};
use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let progress = app.day.progress();
  let consumed = progress.consumed;
  let target = progress.target;

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(4), // greeting
      Constraint::Length(5), // calories
      Constraint::Min(0),    // macros + summary
    ])
    .split(area);

  let greeting = Paragraph::new(vec![
    Line::from(Span::styled(
      format!("שלום, {}", app.session.profile().name),
      Style::default().add_modifier(Modifier::BOLD),
    )),
    Line::from(Span::styled(
      if app.is_loading_plan() {
        "מכין את התפריט שלך…".to_owned()
      } else {
        format!("{} מתוך 4 ארוחות בתפריט היום", app.day.plan.populated())
      },
      Style::default().fg(Color::DarkGray),
    )),
    Line::from(vec![
      Span::raw("משקל יעד: "),
      Span::styled(
        format!("{:.1} ק\"ג", app.session.profile().target_weight()),
        Style::default().fg(ACCENT),
      ),
    ]),
  ])
  .block(pane("היום"));
  f.render_widget(greeting, rows[0]);

  let ratio = (percent_of_target(consumed.calories, target.calories) / 100.0).clamp(0.0, 1.0);
  let calories = Gauge::default()
    .block(pane("קלוריות"))
    .gauge_style(Style::default().fg(ACCENT).bg(Color::Black))
    .ratio(ratio)
    .label(format!(
      "{:.0} נצרכו · {:.0} נותרו · יעד {:.0}",
      consumed.calories,
      progress.remaining_calories(),
      target.calories
    ));
  f.render_widget(calories, rows[1]);

  let bottom = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(rows[2]);
  draw_macros(f, bottom[0], consumed, target);
  draw_summary(f, bottom[1], &app.day.plan);
}

fn draw_summary(f: &mut Frame, area: Rect, plan: &DailyPlan) {
  let items: Vec<ListItem> = if plan.is_empty() {
    vec![ListItem::new(Span::styled(
      "אין עדיין מנות בתפריט",
      Style::default().fg(Color::DarkGray),
    ))]
  } else {
    plan
      .meals()
      .map(|meal| {
        ListItem::new(Line::from(vec![
          Span::styled(meal.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
          Span::styled(
            format!("  {}", meal.meal_type.label()),
            Style::default().fg(Color::DarkGray),
          ),
          Span::styled(format!("  {:.0} קל'", meal.calories), Style::default().fg(ACCENT)),
        ]))
      })
      .collect()
  };
  f.render_widget(List::new(items).block(pane("סיכום תזונה יומי")), area);
}

fn draw_macros(f: &mut Frame, area: Rect, consumed: MacroTotals, target: MacroTotals) {
  let block = pane("מאקרו");
  let inner = block.inner(area);
  f.render_widget(block, area);

  let bars = [
    ("חלבון", consumed.protein, target.protein, Color::Rgb(59, 130, 246)),
    ("פחמימות", consumed.carbs, target.carbs, Color::Rgb(234, 179, 8)),
    ("שומן", consumed.fat, target.fat, Color::Rgb(239, 68, 68)),
  ];
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(2); 3])
    .split(inner);

  for ((label, value, goal, color), row) in bars.into_iter().zip(rows.iter()) {
    let percent = percent_of_target(value, goal);
    let gauge = Gauge::default()
      .gauge_style(Style::default().fg(color).bg(Color::Black))
      .ratio((percent / 100.0).clamp(0.0, 1.0))
      .label(format!("{label} {value:.0}/{goal:.0} ג' ({percent:.0}%)"));
    f.render_widget(gauge, *row);
  }
}
