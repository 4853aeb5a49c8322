use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
  prelude::*,
  widgets::{Block, Borders, Paragraph, Wrap},
};

use super::Component;
use crate::{action::Action, tui::Frame};

#[derive(Default)]
pub struct ErrorView {
  message: Option<String>,
  scroll: u16,
  last_height: u16,
  wrapped_lines: u16,
}

impl ErrorView {
  pub fn set_message(&mut self, message: String) {
    self.message = Some(message);
    self.scroll = 0;
  }

  fn has_scrolled_to_bottom(&self) -> bool {
    match &self.message {
      Some(_) => self.scroll + self.last_height >= self.wrapped_lines,
      None => true,
    }
  }

  fn dismiss(&mut self) {
    self.scroll = 0;
    self.message = None;
    self.last_height = 0;
    self.wrapped_lines = 0;
  }
}

#[async_trait::async_trait]
impl Component for ErrorView {
  async fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    let action = match key.code {
      KeyCode::Up => {
        self.scroll = self.scroll.saturating_sub(1);
        None
      },
      KeyCode::Down => {
        if !self.has_scrolled_to_bottom() {
          self.scroll += 1;
        }
        None
      },
      _ => {
        self.dismiss();
        Some(Action::ExitError)
      },
    };
    Ok(action)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let block = Block::default().title("Error").style(Style::default().fg(Color::Red)).borders(Borders::ALL);
    let inner = block.inner(area);
    self.last_height = inner.height;
    let message = self.message.clone().unwrap_or_default();
    let paragraph = Paragraph::new(message).wrap(Wrap { trim: false });
    self.wrapped_lines = u16::try_from(paragraph.line_count(inner.width)).unwrap_or(u16::MAX);
    let paragraph = paragraph.block(block).scroll((self.scroll, 0));

    f.render_widget(paragraph, area);
    Ok(())
  }
}
