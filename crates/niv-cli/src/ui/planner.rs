//! Planner: one card per meal slot.

use niv_core::meal::{Meal, MealType};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Paragraph, Wrap},
};

use super::{ACCENT, pane};
use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let halves = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
    .split(area);

  let mut cells = Vec::with_capacity(4);
  for half in halves.iter() {
    let cols = Layout::default()
      .direction(Direction::Horizontal)
      .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
      .split(*half);
    cells.extend(cols.iter().copied());
  }

  for (slot, cell) in MealType::ALL.into_iter().zip(cells) {
    draw_slot(f, cell, app, slot);
  }
}

fn draw_slot(f: &mut Frame, area: Rect, app: &App, slot: MealType) {
  let title = format!("{} {}", slot.index() + 1, slot.label());
  let block = pane(&title);

  let lines = if app.is_replacing(slot) {
    vec![Line::from(Span::styled(
      "מחליף מנה…",
      Style::default().fg(Color::Yellow),
    ))]
  } else if let Some(meal) = app.day.plan.get(slot) {
    meal_lines(meal)
  } else if app.is_loading_plan() {
    vec![Line::from(Span::styled(
      "טוען…",
      Style::default().fg(Color::DarkGray),
    ))]
  } else {
    vec![Line::from(Span::styled(
      "אין מנה לארוחה זו",
      Style::default().fg(Color::DarkGray),
    ))]
  };

  f.render_widget(
    Paragraph::new(lines).block(block).wrap(Wrap { trim: true }),
    area,
  );
}

fn meal_lines(meal: &Meal) -> Vec<Line<'static>> {
  let dim = Style::default().fg(Color::DarkGray);
  vec![
    Line::from(Span::styled(
      meal.name.clone(),
      Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )),
    Line::from(format!("{:.0} קלוריות", meal.calories)),
    Line::from(format!(
      "חלבון {:.0}ג' · פחמימות {:.0}ג' · שומן {:.0}ג'",
      meal.protein, meal.carbs, meal.fat
    )),
    Line::default(),
    Line::from(meal.description.clone()),
    Line::default(),
    Line::from(Span::styled(meal.display_image_url().to_owned(), dim)),
  ]
}
