use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info};

use crate::{
  error::Error,
  inventory::item::{Item, ItemDraft, ItemId},
};

type Observer = Box<dyn Fn(&[Item]) + Send + Sync>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Ordered, in-memory owner of every inventory item.
///
/// Insertion order is display order. Items are only ever addressed by their [`ItemId`],
/// so records with identical field values stay independently editable. Observers are
/// called synchronously, in registration order, after every committed mutation.
#[derive(Default)]
pub struct ItemStore {
  items: Vec<Item>,
  observers: Vec<(SubscriptionId, Observer)>,
  next_subscription: u64,
}

impl ItemStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn append(&mut self, draft: ItemDraft) -> ItemId {
    let item = Item::from_draft(draft);
    let id = item.id();
    info!("Appending item {} at position {}", id, self.items.len());
    self.items.push(item);
    self.notify();
    id
  }

  pub fn all(&self) -> &[Item] {
    &self.items
  }

  pub fn index_of(&self, id: ItemId) -> Result<usize, Error> {
    self.items.iter().position(|item| item.id() == id).ok_or(Error::NotFound(id))
  }

  pub fn get(&self, id: ItemId) -> Result<&Item, Error> {
    let index = self.index_of(id)?;
    Ok(&self.items[index])
  }

  /// Applies `mutator` to the item with `id` in place. The item keeps its position and id.
  pub fn update<F>(&mut self, id: ItemId, mutator: F) -> Result<(), Error>
  where
    F: FnOnce(&mut Item),
  {
    let index = self.index_of(id)?;
    mutator(&mut self.items[index]);
    debug!("Updated item {} at position {}", id, index);
    self.notify();
    Ok(())
  }

  pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
  where
    F: Fn(&[Item]) + Send + Sync + 'static,
  {
    let id = SubscriptionId(self.next_subscription);
    self.next_subscription += 1;
    self.observers.push((id, Box::new(observer)));
    id
  }

  pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
    let before = self.observers.len();
    self.observers.retain(|(id, _)| *id != subscription);
    self.observers.len() != before
  }

  fn notify(&self) {
    for (_, observer) in &self.observers {
      observer(&self.items);
    }
  }
}

/// Cloneable handle to the one [`ItemStore`] shared by every view.
///
/// Reads hand out owned snapshots so no view keeps a reference into the collection.
/// Observers run while the store is locked and must not call back into this handle.
#[derive(Clone, Default)]
pub struct SharedItemStore {
  inner: Arc<Mutex<ItemStore>>,
}

impl SharedItemStore {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, ItemStore> {
    self.inner.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn append(&self, draft: ItemDraft) -> ItemId {
    self.lock().append(draft)
  }

  pub fn all(&self) -> Vec<Item> {
    self.lock().all().to_vec()
  }

  pub fn index_of(&self, id: ItemId) -> Result<usize, Error> {
    self.lock().index_of(id)
  }

  pub fn get(&self, id: ItemId) -> Result<Item, Error> {
    self.lock().get(id).cloned()
  }

  pub fn update<F>(&self, id: ItemId, mutator: F) -> Result<(), Error>
  where
    F: FnOnce(&mut Item),
  {
    self.lock().update(id, mutator)
  }

  pub fn subscribe<F>(&self, observer: F) -> SubscriptionId
  where
    F: Fn(&[Item]) + Send + Sync + 'static,
  {
    self.lock().subscribe(observer)
  }

  pub fn unsubscribe(&self, subscription: SubscriptionId) -> bool {
    self.lock().unsubscribe(subscription)
  }
}

#[cfg(test)]
mod tests {
  use std::{
    collections::HashSet,
    sync::{
      Arc, Mutex,
      atomic::{AtomicUsize, Ordering},
    },
  };

  use pretty_assertions::assert_eq;

  use super::*;
  use crate::inventory::item::ItemField;

  fn snapshot(store: &ItemStore) -> Vec<Item> {
    store.all().to_vec()
  }

  #[test]
  fn test_new_store_is_empty() {
    let store = ItemStore::new();

    assert!(store.all().is_empty());
  }

  #[test]
  fn test_append_preserves_call_order() {
    let mut store = ItemStore::new();
    let names = ["Sword", "Shield", "Potion", "Sword"];

    let ids: Vec<ItemId> = names
      .iter()
      .map(|name| store.append(ItemDraft { name: name.to_string(), ..ItemDraft::default() }))
      .collect();

    assert_eq!(store.all().len(), names.len());
    let stored_names: Vec<&str> = store.all().iter().map(|item| item.name.as_str()).collect();
    assert_eq!(stored_names, names.to_vec());
    for (index, id) in ids.iter().enumerate() {
      assert_eq!(store.index_of(*id), Ok(index));
    }
  }

  #[test]
  fn test_append_generates_distinct_ids() {
    let mut store = ItemStore::new();

    let ids: HashSet<ItemId> = (0..100).map(|_| store.append(ItemDraft::default())).collect();

    assert_eq!(ids.len(), 100);
  }

  #[test]
  fn test_update_changes_only_target() {
    let mut store = ItemStore::new();
    let first = store.append(ItemDraft::default());
    let second = store.append(ItemDraft::default());
    let third = store.append(ItemDraft::default());
    let before = snapshot(&store);

    store.update(second, |item| item.value = "250.00".to_string()).unwrap();

    let after = snapshot(&store);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[2], before[2]);
    assert_eq!(after[1].id(), second);
    assert_eq!(after[1].value, "250.00");
    assert_eq!(after[1].name, before[1].name);
    assert_eq!(after[1].serial_number, before[1].serial_number);
    assert_eq!(store.index_of(first), Ok(0));
    assert_eq!(store.index_of(third), Ok(2));
  }

  #[test]
  fn test_duplicate_items_are_independently_editable() {
    let mut store = ItemStore::new();
    let first = store.append(ItemDraft::default());
    let second = store.append(ItemDraft::default());

    assert_ne!(first, second);
    assert_eq!(store.index_of(first), Ok(0));
    assert_eq!(store.index_of(second), Ok(1));

    store.update(second, |item| ItemField::Name.set(item, "Sword".to_string())).unwrap();

    let items = store.all();
    assert_eq!(items[0].name, "New Item");
    assert_eq!(items[0].serial_number, "SN3040220");
    assert_eq!(items[0].value, "1.00");
    assert_eq!(items[1].name, "Sword");
    assert_eq!(items[1].serial_number, "SN3040220");
    assert_eq!(items[1].value, "1.00");
  }

  #[test]
  fn test_unknown_id_is_not_found_and_leaves_store_untouched() {
    let mut store = ItemStore::new();
    store.append(ItemDraft::default());
    let missing = Item::from_draft(ItemDraft::default()).id();
    let before = snapshot(&store);
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = notified.clone();
    store.subscribe(move |_| {
      counter.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(store.index_of(missing), Err(Error::NotFound(missing)));
    assert_eq!(store.get(missing), Err(Error::NotFound(missing)));
    let result = store.update(missing, |item| item.name = "X".to_string());

    assert_eq!(result, Err(Error::NotFound(missing)));
    assert_eq!(snapshot(&store), before);
    assert_eq!(notified.load(Ordering::SeqCst), 0);
  }

  #[test]
  fn test_empty_text_is_accepted() {
    let mut store = ItemStore::new();
    let id = store.append(ItemDraft { name: String::new(), serial_number: String::new(), value: String::new() });

    store.update(id, |item| item.value = String::new()).unwrap();

    let item = store.get(id).unwrap();
    assert_eq!(item.name, "");
    assert_eq!(item.value, "");
  }

  #[test]
  fn test_observers_receive_current_sequence_after_each_mutation() {
    let mut store = ItemStore::new();
    let seen: Arc<Mutex<Vec<Vec<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    store.subscribe(move |items| {
      sink.lock().unwrap().push(items.iter().map(|item| item.name.clone()).collect());
    });

    let id = store.append(ItemDraft::default());
    store.append(ItemDraft::default());
    store.update(id, |item| item.name = "Sword".to_string()).unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![
      vec!["New Item".to_string()],
      vec!["New Item".to_string(), "New Item".to_string()],
      vec!["Sword".to_string(), "New Item".to_string()],
    ]);
  }

  #[test]
  fn test_observers_are_called_in_registration_order() {
    let mut store = ItemStore::new();
    let calls: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
    let first = calls.clone();
    let second = calls.clone();
    store.subscribe(move |_| first.lock().unwrap().push("first"));
    store.subscribe(move |_| second.lock().unwrap().push("second"));

    store.append(ItemDraft::default());

    assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
  }

  #[test]
  fn test_late_subscriber_gets_no_replay() {
    let mut store = ItemStore::new();
    store.append(ItemDraft::default());
    store.append(ItemDraft::default());
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = notified.clone();

    store.subscribe(move |_| {
      counter.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(notified.load(Ordering::SeqCst), 0);

    store.append(ItemDraft::default());
    assert_eq!(notified.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn test_unsubscribe() {
    let mut store = ItemStore::new();
    let notified = Arc::new(AtomicUsize::new(0));
    let counter = notified.clone();
    let subscription = store.subscribe(move |_| {
      counter.fetch_add(1, Ordering::SeqCst);
    });

    store.append(ItemDraft::default());
    assert!(store.unsubscribe(subscription));
    assert!(!store.unsubscribe(subscription));
    store.append(ItemDraft::default());

    assert_eq!(notified.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn test_shared_store_scenario() {
    let store = SharedItemStore::new();
    let other_handle = store.clone();

    let first = store.append(ItemDraft::default());
    let second = other_handle.append(ItemDraft::default());
    assert_eq!(store.all().len(), 2);
    assert_ne!(first, second);

    store.update(second, |item| item.name = "Sword".to_string()).unwrap();

    let items = other_handle.all();
    assert_eq!(items[0].id(), first);
    assert_eq!(items[0].name, "New Item");
    assert_eq!(items[0].serial_number, "SN3040220");
    assert_eq!(items[0].value, "1.00");
    assert_eq!(items[1].id(), second);
    assert_eq!(items[1].name, "Sword");
    assert_eq!(other_handle.get(second).map(|item| item.name), Ok("Sword".to_string()));
  }

  #[test]
  fn test_shared_store_update_unknown_id() {
    let store = SharedItemStore::new();
    store.append(ItemDraft::default());
    let missing = Item::from_draft(ItemDraft::default()).id();
    let before = store.all();

    let result = store.update(missing, |item| item.name = "X".to_string());

    assert_eq!(result, Err(Error::NotFound(missing)));
    assert_eq!(store.all(), before);
    assert_eq!(store.all().len(), 1);
  }
}
