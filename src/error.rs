use thiserror::Error;

use crate::inventory::ItemId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  #[error("No item with id {0} exists in the inventory")]
  NotFound(ItemId),
}
