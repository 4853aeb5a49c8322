use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  widgets::{Block, Borders, List, ListItem, ListState},
};
use tracing::info;

use crate::{
  action::Action,
  components::{
    Component,
    item_list::{instruction_footer::InstructionFooter, item_row::ItemRow},
  },
  inventory::{ItemDraft, ItemId, SharedItemStore},
  tui::Frame,
};

mod instruction_footer;
mod item_row;

pub struct ItemList {
  store: SharedItemStore,
  rows: Vec<ItemRow>,
  list_state: ListState,
  instruction_footer: InstructionFooter,
}

impl ItemList {
  pub fn new(store: SharedItemStore) -> Self {
    let mut list = ItemList {
      store,
      rows: Vec::new(),
      list_state: ListState::default(),
      instruction_footer: InstructionFooter::default(),
    };
    list.refresh_rows();
    list
  }

  /// Re-reads the store, keeping the same item selected even if its position moved.
  fn refresh_rows(&mut self) {
    let selected_id = self.get_selected_row().map(|row| row.item.id());
    self.rows = self.store.all().into_iter().map(ItemRow::new).collect();

    if self.rows.is_empty() {
      self.list_state.select(None);
      return;
    }
    let position = selected_id.and_then(|id| self.store.index_of(id).ok());
    match (position, self.list_state.selected()) {
      (Some(index), _) => self.list_state.select(Some(index)),
      (None, Some(index)) => self.list_state.select(Some(index.min(self.rows.len() - 1))),
      (None, None) => self.list_state.select(Some(0)),
    }
  }

  pub fn select_previous(&mut self) {
    if self.rows.is_empty() {
      return;
    }
    let final_index = self.rows.len() - 1;
    match self.list_state.selected() {
      None | Some(0) => self.list_state.select(Some(final_index)),
      Some(selected) => self.list_state.select(Some(selected.min(final_index + 1) - 1)),
    }
  }

  pub fn select_next(&mut self) {
    if self.rows.is_empty() {
      return;
    }
    let final_index = self.rows.len() - 1;
    match self.list_state.selected() {
      Some(selected) if selected < final_index => self.list_state.select(Some(selected + 1)),
      _ => self.list_state.select(Some(0)),
    }
  }

  fn get_selected_row(&self) -> Option<&ItemRow> {
    let selected_index = self.list_state.selected()?;
    self.rows.get(selected_index)
  }

  fn selected_id(&self) -> Option<ItemId> {
    self.get_selected_row().map(|row| row.item.id())
  }

  fn add_item(&mut self) {
    let id = self.store.append(ItemDraft::default());
    info!("Added item {}", id);
    self.refresh_rows();
    self.list_state.select(self.store.index_of(id).ok());
  }

  fn render_list(&mut self, f: &mut Frame<'_>, area: Rect) {
    let render_items: Vec<ListItem> = self.rows.iter().map(|row| row.render()).collect();
    let list = List::new(render_items)
      .block(Block::default().title("Loot Logger").borders(Borders::ALL))
      .style(Style::default().fg(Color::White))
      .highlight_style(Style::default().add_modifier(Modifier::BOLD))
      .highlight_symbol("→")
      .repeat_highlight_symbol(true);

    f.render_stateful_widget(list, area, &mut self.list_state);
  }
}

#[async_trait::async_trait]
impl Component for ItemList {
  async fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>> {
    let action = match key {
      KeyEvent { code: KeyCode::Down | KeyCode::Char('j'), modifiers: KeyModifiers::NONE, .. } => {
        Some(Action::SelectNext)
      },
      KeyEvent { code: KeyCode::Up | KeyCode::Char('k'), modifiers: KeyModifiers::NONE, .. } => {
        Some(Action::SelectPrevious)
      },
      KeyEvent { code: KeyCode::Char('a' | '+'), .. } => Some(Action::AddItem),
      KeyEvent { code: KeyCode::Enter, .. } => self.selected_id().map(Action::OpenDetail),
      _ => None,
    };
    Ok(action)
  }

  async fn update(&mut self, action: Action) -> Result<Option<Action>> {
    match action {
      Action::SelectNext => self.select_next(),
      Action::SelectPrevious => self.select_previous(),
      Action::AddItem => self.add_item(),
      Action::ItemsChanged => self.refresh_rows(),
      _ => {},
    }
    Ok(None)
  }

  fn draw(&mut self, f: &mut Frame<'_>, area: Rect) -> Result<()> {
    let layout = Layout::new(Direction::Vertical, [Constraint::Fill(1), Constraint::Length(1)]).margin(1).split(area);
    self.render_list(f, layout[0]);
    self.instruction_footer.render(f, layout[1], &self.rows, self.get_selected_row());
    Ok(())
  }
}
