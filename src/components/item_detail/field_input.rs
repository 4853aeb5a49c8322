use crossterm::event::KeyEvent;
use ratatui::{
  layout::Rect,
  prelude::Color,
  style::{Modifier, Style},
  widgets::{Block, Borders},
};
use tui_textarea::{CursorMove, Input, Key, TextArea};

use crate::{inventory::ItemField, tui::Frame};

/// Single line text input bound to one field of the item being edited.
#[derive(Debug)]
pub struct FieldInput {
  pub field: ItemField,
  text_input: TextArea<'static>,
}

impl FieldInput {
  pub fn new(field: ItemField) -> Self {
    let mut input = FieldInput { field, text_input: TextArea::default() };
    input.set_focused(false);
    input
  }

  /// Whole first line, untouched. Empty text is a legitimate value.
  pub fn text(&self) -> String {
    self.text_input.lines().first().cloned().unwrap_or_default()
  }

  pub fn set_text(&mut self, text: &str) {
    self.text_input.move_cursor(CursorMove::Head);
    self.text_input.delete_line_by_end();
    self.text_input.insert_str(text);
  }

  pub fn set_focused(&mut self, focused: bool) {
    let (border, cursor) = if focused {
      (Style::default().fg(Color::LightBlue), Style::default().add_modifier(Modifier::REVERSED))
    } else {
      (Style::default().fg(Color::DarkGray), Style::default())
    };
    self.text_input.set_style(Style::default().fg(Color::White));
    self.text_input.set_cursor_style(cursor);
    self.text_input.set_cursor_line_style(Style::default());
    self.text_input.set_block(Block::default().borders(Borders::ALL).border_style(border).title(format!(
      "{}:",
      self.field
    )));
  }

  /// Feeds a key to the text area, returning the new text when it changed.
  /// Keys the text area would turn into a line break are dropped so the field stays on one line.
  pub fn handle_key_event(&mut self, key_event: KeyEvent) -> Option<String> {
    let input = Input::from(key_event);
    if breaks_line(&input) {
      return None;
    }
    let changed = self.text_input.input(input);
    if changed { Some(self.text()) } else { None }
  }

  pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
    f.render_widget(&self.text_input, area);
  }
}

fn breaks_line(input: &Input) -> bool {
  matches!(
    input,
    Input { key: Key::Enter, .. }
      | Input { key: Key::Char('m'), ctrl: true, alt: false, .. }
      | Input { key: Key::Char('\n' | '\r'), ctrl: false, alt: false, .. }
  )
}
