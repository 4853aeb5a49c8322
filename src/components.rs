use color_eyre::eyre::Result;
use crossterm::event::KeyEvent;
use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::{
  action::Action,
  tui::{Event, Frame},
};

pub mod error_view;
pub mod item_detail;
pub mod item_list;

/// A screen of the application. Components receive terminal events and actions from the
/// event loop and draw themselves into the area they are given.
#[async_trait::async_trait]
pub trait Component: Send + Sync {
  /// Hands the component a sender it can use to queue actions outside of the
  /// `handle_events`/`update` return values.
  fn register_action_handler(&mut self, _tx: UnboundedSender<Action>) -> Result<()> {
    Ok(())
  }

  async fn handle_events(&mut self, event: Option<Event>) -> Result<Option<Action>> {
    match event {
      Some(Event::Key(key_event)) => self.handle_key_events(key_event).await,
      _ => Ok(None),
    }
  }

  /// Maps a key press to an action. Only called while the component is the active view.
  async fn handle_key_events(&mut self, _key: KeyEvent) -> Result<Option<Action>> {
    Ok(None)
  }

  /// Applies an action to the component's state, optionally producing a follow up action.
  async fn update(&mut self, _action: Action) -> Result<Option<Action>> {
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()>;
}
