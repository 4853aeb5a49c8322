pub mod item;
pub mod store;

pub use item::{Item, ItemDraft, ItemField, ItemId};
pub use store::{ItemStore, SharedItemStore, SubscriptionId};

pub use crate::error::Error;
