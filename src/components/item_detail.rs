use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
  layout::{Constraint, Direction, Layout, Rect},
  prelude::{Line, Span},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders},
};
use strum::IntoEnumIterator;
use tracing::{error, info};

use crate::{
  action::Action,
  components::{Component, item_detail::field_input::FieldInput},
  error::Error,
  inventory::{ItemField, ItemId, SharedItemStore},
  tui::Frame,
};

mod field_input;

/// Form editing one item. It only holds the item's id; every change is written
/// straight through to the store.
pub struct ItemDetail {
  store: SharedItemStore,
  item_id: Option<ItemId>,
  title: String,
  inputs: Vec<FieldInput>,
  focused: ItemField,
}

impl ItemDetail {
  pub fn new(store: SharedItemStore) -> Self {
    let inputs = ItemField::iter().map(FieldInput::new).collect();
    let mut detail = ItemDetail { store, item_id: None, title: String::new(), inputs, focused: ItemField::Name };
    detail.focus(ItemField::Name);
    detail
  }

  fn open(&mut self, id: ItemId) -> Option<Action> {
    match self.store.get(id) {
      Ok(item) => {
        info!("Editing item {}", id);
        for input in self.inputs.iter_mut() {
          input.set_text(input.field.get(&item));
        }
        self.item_id = Some(id);
        self.title = item.name.clone();
        self.focus(ItemField::Name);
        None
      },
      Err(err) => Some(self.abort(err)),
    }
  }

  fn close(&mut self) {
    self.item_id = None;
    self.title.clear();
  }

  fn abort(&mut self, err: Error) -> Action {
    error!("Abandoning edit: {}", err);
    self.close();
    Action::Error(err.to_string())
  }

  fn focus(&mut self, field: ItemField) {
    self.focused = field;
    for input in self.inputs.iter_mut() {
      input.set_focused(input.field == field);
    }
  }

  fn focused_input(&mut self) -> Option<&mut FieldInput> {
    let focused = self.focused;
    self.inputs.iter_mut().find(|input| input.field == focused)
  }

  fn write_field(&mut self, field: ItemField, text: String) -> Option<Action> {
    let id = self.item_id?;
    if field == ItemField::Name {
      self.title = text.clone();
    }
    match self.store.update(id, |item| field.set(item, text)) {
      Ok(()) => None,
      Err(err) => Some(self.abort(err)),
    }
  }

  fn render_footer(&self, f: &mut Frame<'_>, area: Rect) {
    let footer = Line::from(vec![
      Span::raw("esc: Back"),
      Span::raw(" | tab/↓: Next field"),
      Span::raw(" | ⇧ + tab/↑: Previous field"),
    ]);
    f.render_widget(footer, area);
  }
}

#[async_trait::async_trait]
impl Component for ItemDetail {
  async fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    if self.item_id.is_none() {
      return Ok(None);
    }
    match key.code {
      KeyCode::Esc => {
        self.close();
        Ok(Some(Action::CloseDetail))
      },
      KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
        self.focus(self.focused.next());
        Ok(None)
      },
      KeyCode::BackTab | KeyCode::Up => {
        self.focus(self.focused.previous());
        Ok(None)
      },
      _ => {
        let field = self.focused;
        let changed = self.focused_input().and_then(|input| input.handle_key_event(key));
        match changed {
          Some(text) => Ok(self.write_field(field, text)),
          None => Ok(None),
        }
      },
    }
  }

  async fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::OpenDetail(id) => Ok(self.open(id)),
      Action::ItemsChanged => {
        let Some(id) = self.item_id else {
          return Ok(None);
        };
        match self.store.get(id) {
          Ok(item) => {
            self.title = item.name;
            Ok(None)
          },
          Err(err) => Ok(Some(self.abort(err))),
        }
      },
      _ => Ok(None),
    }
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let block = Block::default()
      .title(Span::styled(self.title.clone(), Style::default().add_modifier(Modifier::BOLD)))
      .borders(Borders::ALL)
      .style(Style::default().fg(Color::White));
    let outer = Layout::new(Direction::Vertical, [Constraint::Fill(1), Constraint::Length(1)]).margin(1).split(area);
    let inner = block.inner(outer[0]);
    f.render_widget(block, outer[0]);

    let mut constraints: Vec<Constraint> = self.inputs.iter().map(|_| Constraint::Length(3)).collect();
    constraints.push(Constraint::Fill(1));
    let rows = Layout::new(Direction::Vertical, constraints).split(inner);
    for (input, row) in self.inputs.iter().zip(rows.iter()) {
      input.render(f, *row);
    }
    self.render_footer(f, outer[1]);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use crossterm::event::KeyModifiers;
  use pretty_assertions::assert_eq;
  use ratatui::{Terminal, backend::TestBackend};

  use super::*;
  use crate::inventory::{ItemDraft, ItemStore};

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  async fn type_text(detail: &mut ItemDetail, text: &str) {
    for c in text.chars() {
      detail.handle_key_events(key(KeyCode::Char(c))).await.unwrap();
    }
  }

  async fn clear_field(detail: &mut ItemDetail, len: usize) {
    for _ in 0..len {
      detail.handle_key_events(key(KeyCode::Backspace)).await.unwrap();
    }
  }

  fn unknown_id() -> ItemId {
    ItemStore::new().append(ItemDraft::default())
  }

  #[tokio::test]
  async fn test_open_loads_fields() {
    let store = SharedItemStore::new();
    let id = store.append(ItemDraft::default());
    let mut detail = ItemDetail::new(store);

    let action = detail.update(Action::OpenDetail(id)).await.unwrap();

    assert_eq!(action, None);
    assert_eq!(detail.item_id, Some(id));
    assert_eq!(detail.title, "New Item");
    let texts: Vec<String> = detail.inputs.iter().map(|input| input.text()).collect();
    assert_eq!(texts, vec!["New Item", "SN3040220", "1.00"]);
    assert_eq!(detail.focused, ItemField::Name);
  }

  #[tokio::test]
  async fn test_open_unknown_id_reports_error() {
    let store = SharedItemStore::new();
    let mut detail = ItemDetail::new(store);
    let missing = unknown_id();

    let action = detail.update(Action::OpenDetail(missing)).await.unwrap();

    assert_eq!(action, Some(Action::Error(Error::NotFound(missing).to_string())));
    assert_eq!(detail.item_id, None);
  }

  #[tokio::test]
  async fn test_typing_writes_through_to_store() {
    let store = SharedItemStore::new();
    let first = store.append(ItemDraft::default());
    let second = store.append(ItemDraft::default());
    let mut detail = ItemDetail::new(store.clone());
    detail.update(Action::OpenDetail(second)).await.unwrap();

    clear_field(&mut detail, "New Item".len()).await;
    type_text(&mut detail, "Sword").await;

    let items = store.all();
    assert_eq!(items[0].id(), first);
    assert_eq!(items[0].name, "New Item");
    assert_eq!(items[1].id(), second);
    assert_eq!(items[1].name, "Sword");
    assert_eq!(items[1].serial_number, "SN3040220");
    assert_eq!(detail.title, "Sword");
  }

  #[tokio::test]
  async fn test_tab_moves_to_next_field() {
    let store = SharedItemStore::new();
    let id = store.append(ItemDraft::default());
    let mut detail = ItemDetail::new(store.clone());
    detail.update(Action::OpenDetail(id)).await.unwrap();

    detail.handle_key_events(key(KeyCode::Tab)).await.unwrap();
    detail.handle_key_events(key(KeyCode::Tab)).await.unwrap();
    assert_eq!(detail.focused, ItemField::Value);
    clear_field(&mut detail, "1.00".len()).await;
    type_text(&mut detail, "25.50").await;

    let item = store.get(id).unwrap();
    assert_eq!(item.name, "New Item");
    assert_eq!(item.value, "25.50");
  }

  #[tokio::test]
  async fn test_ctrl_m_does_not_split_field() {
    let store = SharedItemStore::new();
    let id = store.append(ItemDraft::default());
    let mut detail = ItemDetail::new(store.clone());
    detail.update(Action::OpenDetail(id)).await.unwrap();

    for _ in 0..4 {
      detail.handle_key_events(key(KeyCode::Left)).await.unwrap();
    }
    let action = detail.handle_key_events(KeyEvent::new(KeyCode::Char('m'), KeyModifiers::CONTROL)).await.unwrap();
    type_text(&mut detail, "X").await;

    assert_eq!(action, None);
    assert_eq!(store.get(id).unwrap().name, "New XItem");
    assert_eq!(detail.title, "New XItem");
  }

  #[tokio::test]
  async fn test_back_tab_wraps_to_last_field() {
    let store = SharedItemStore::new();
    let id = store.append(ItemDraft::default());
    let mut detail = ItemDetail::new(store);
    detail.update(Action::OpenDetail(id)).await.unwrap();

    detail.handle_key_events(key(KeyCode::BackTab)).await.unwrap();

    assert_eq!(detail.focused, ItemField::Value);
  }

  #[tokio::test]
  async fn test_clearing_a_field_stores_empty_text() {
    let store = SharedItemStore::new();
    let id = store.append(ItemDraft::default());
    let mut detail = ItemDetail::new(store.clone());
    detail.update(Action::OpenDetail(id)).await.unwrap();
    detail.handle_key_events(key(KeyCode::Down)).await.unwrap();

    clear_field(&mut detail, "SN3040220".len()).await;

    assert_eq!(store.get(id).unwrap().serial_number, "");
  }

  #[tokio::test]
  async fn test_escape_closes_form() {
    let store = SharedItemStore::new();
    let id = store.append(ItemDraft::default());
    let mut detail = ItemDetail::new(store);
    detail.update(Action::OpenDetail(id)).await.unwrap();

    let action = detail.handle_key_events(key(KeyCode::Esc)).await.unwrap();

    assert_eq!(action, Some(Action::CloseDetail));
    assert_eq!(detail.item_id, None);
  }

  #[tokio::test]
  async fn test_keys_ignored_when_nothing_is_open() {
    let store = SharedItemStore::new();
    let mut detail = ItemDetail::new(store.clone());

    let action = detail.handle_key_events(key(KeyCode::Char('x'))).await.unwrap();

    assert_eq!(action, None);
    assert!(store.all().is_empty());
  }

  #[tokio::test]
  async fn test_items_changed_refreshes_title() {
    let store = SharedItemStore::new();
    let id = store.append(ItemDraft::default());
    let mut detail = ItemDetail::new(store.clone());
    detail.update(Action::OpenDetail(id)).await.unwrap();

    store.update(id, |item| item.name = "Shield".to_string()).unwrap();
    detail.update(Action::ItemsChanged).await.unwrap();

    assert_eq!(detail.title, "Shield");
  }

  #[tokio::test]
  async fn test_draw_renders_form() {
    let store = SharedItemStore::new();
    let id = store.append(ItemDraft::default());
    let mut detail = ItemDetail::new(store);
    detail.update(Action::OpenDetail(id)).await.unwrap();
    let mut terminal = Terminal::new(TestBackend::new(60, 16)).unwrap();

    terminal.draw(|f| detail.draw(f, f.area()).unwrap()).unwrap();

    let content: String = terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect();
    assert!(content.contains("Description:"));
    assert!(content.contains("Serial Number:"));
    assert!(content.contains("Value:"));
    assert!(content.contains("SN3040220"));
  }
}
