use ratatui::{
  layout::Rect,
  prelude::{Line, Span},
};

use crate::{components::item_list::item_row::ItemRow, tui::Frame};

#[derive(Debug, Default)]
pub struct InstructionFooter {}

impl InstructionFooter {
  pub fn commands(&self, rows: &[ItemRow], selected: Option<&ItemRow>) -> Vec<Span<'static>> {
    let mut commands = vec![Span::raw("q: Quit"), Span::raw(" | a: Add item")];
    if selected.is_some() {
      commands.push(Span::raw(" | ↵: Edit"));
    }
    if rows.len() > 1 {
      commands.push(Span::raw(" | ↑/↓: Select"));
    }
    commands
  }

  pub fn render(&self, f: &mut Frame<'_>, area: Rect, rows: &[ItemRow], selected: Option<&ItemRow>) {
    let footer = Line::from(self.commands(rows, selected));
    f.render_widget(footer, area);
  }
}
