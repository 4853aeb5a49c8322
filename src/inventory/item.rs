use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use uuid::Uuid;

/// Opaque identity of an inventory item. Never used for ordering or display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
  fn generate() -> Self {
    ItemId(Uuid::new_v4())
  }
}

impl fmt::Display for ItemId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Field values for a new item. The default is the placeholder record the list
/// creates when the user asks for a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
  pub name: String,
  pub serial_number: String,
  pub value: String,
}

impl Default for ItemDraft {
  fn default() -> Self {
    ItemDraft { name: "New Item".to_string(), serial_number: "SN3040220".to_string(), value: "1.00".to_string() }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
  id: ItemId,
  pub name: String,
  pub serial_number: String,
  pub value: String,
}

impl Item {
  pub(crate) fn from_draft(draft: ItemDraft) -> Self {
    Item { id: ItemId::generate(), name: draft.name, serial_number: draft.serial_number, value: draft.value }
  }

  pub fn id(&self) -> ItemId {
    self.id
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum ItemField {
  #[strum(to_string = "Description")]
  Name,
  #[strum(to_string = "Serial Number")]
  SerialNumber,
  #[strum(to_string = "Value")]
  Value,
}

impl ItemField {
  pub fn get(self, item: &Item) -> &str {
    match self {
      ItemField::Name => &item.name,
      ItemField::SerialNumber => &item.serial_number,
      ItemField::Value => &item.value,
    }
  }

  pub fn set(self, item: &mut Item, text: String) {
    match self {
      ItemField::Name => item.name = text,
      ItemField::SerialNumber => item.serial_number = text,
      ItemField::Value => item.value = text,
    }
  }

  pub fn next(self) -> Self {
    match self {
      ItemField::Name => ItemField::SerialNumber,
      ItemField::SerialNumber => ItemField::Value,
      ItemField::Value => ItemField::Name,
    }
  }

  pub fn previous(self) -> Self {
    match self {
      ItemField::Name => ItemField::Value,
      ItemField::SerialNumber => ItemField::Name,
      ItemField::Value => ItemField::SerialNumber,
    }
  }
}
