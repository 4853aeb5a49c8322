use serde::{Deserialize, Serialize};
use strum::Display;

use crate::inventory::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Display, Deserialize)]
pub enum Action {
  AddItem,
  CloseDetail,
  Error(String),
  ExitError,
  ItemsChanged,
  OpenDetail(ItemId),
  Quit,
  Render,
  Resize(u16, u16),
  Resume,
  SelectNext,
  SelectPrevious,
  Suspend,
  Tick,
}
