use ratatui::{
  style::{Modifier, Style},
  text::{Line, Span},
  widgets::ListItem,
};

use crate::inventory::Item;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
  pub item: Item,
}

impl ItemRow {
  pub fn new(item: Item) -> Self {
    ItemRow { item }
  }

  pub fn render(&self) -> ListItem {
    let mut text = Line::default();
    let parts = vec![
      Span::styled(self.item.name.clone(), Style::default()),
      Span::styled(format!("  {}", self.item.serial_number), Style::default().add_modifier(Modifier::DIM)),
      Span::styled(format!("  {}", self.item.value), Style::default().add_modifier(Modifier::DIM)),
    ];

    text = text.spans(parts);
    ListItem::from(text)
  }
}
