//! Item attribute bag operations
//!
//! Every write lands in the attribute table immediately.

use std::collections::BTreeMap;

use super::Store;
use crate::core::error::{Result, SimError};
use crate::core::types::ItemId;
use crate::entity::item::AttrValue;

impl Store {
    pub fn attributes(&self, item: ItemId) -> Option<&BTreeMap<String, AttrValue>> {
        self.attributes.get(&item)
    }

    pub fn attribute(&self, item: ItemId, name: &str) -> Option<&AttrValue> {
        self.attributes.get(&item).and_then(|bag| bag.get(name))
    }

    pub fn has_attribute(&self, item: ItemId, name: &str) -> bool {
        self.attribute(item, name).is_some()
    }

    pub fn number(&self, item: ItemId, name: &str) -> Option<f64> {
        self.attribute(item, name).and_then(AttrValue::as_number)
    }

    pub fn text(&self, item: ItemId, name: &str) -> Option<&str> {
        self.attribute(item, name).and_then(AttrValue::as_text)
    }

    pub fn set_attribute(
        &mut self,
        item: ItemId,
        name: &str,
        value: impl Into<AttrValue>,
    ) -> Result<()> {
        let bag = self
            .attributes
            .get_mut(&item)
            .ok_or(SimError::ItemNotFound(item))?;
        bag.insert(name.to_string(), value.into());
        Ok(())
    }

    pub fn remove_attribute(&mut self, item: ItemId, name: &str) -> Result<Option<AttrValue>> {
        let bag = self
            .attributes
            .get_mut(&item)
            .ok_or(SimError::ItemNotFound(item))?;
        Ok(bag.remove(name))
    }

    /// Add `delta` to a numeric attribute, creating it at 0 when absent
    ///
    /// Incrementing a text attribute is an invariant violation.
    pub fn increment_attribute(&mut self, item: ItemId, name: &str, delta: f64) -> Result<f64> {
        let bag = self
            .attributes
            .get_mut(&item)
            .ok_or(SimError::ItemNotFound(item))?;
        let slot = bag
            .entry(name.to_string())
            .or_insert(AttrValue::Number(0.0));
        match slot {
            AttrValue::Number(n) => {
                *n += delta;
                Ok(*n)
            }
            AttrValue::Text(s) => Err(SimError::Invariant(format!(
                "cannot increment text attribute '{}' = {:?} on {}",
                name, s, item
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::item::Item;

    fn store_with_item() -> (Store, ItemId) {
        let mut store = Store::new();
        let mut bag = BTreeMap::new();
        bag.insert("count".to_string(), AttrValue::Number(2.0));
        bag.insert("color".to_string(), AttrValue::from("red"));
        let id = store.insert_item(|id| Item::new(id, "thing"), bag);
        (store, id)
    }

    #[test]
    fn test_get_set_increment() {
        let (mut store, id) = store_with_item();
        assert_eq!(store.number(id, "count"), Some(2.0));
        assert_eq!(store.increment_attribute(id, "count", 3.0).unwrap(), 5.0);
        assert_eq!(store.increment_attribute(id, "fresh", 1.0).unwrap(), 1.0);
        store.set_attribute(id, "color", "blue").unwrap();
        assert_eq!(store.text(id, "color"), Some("blue"));
    }

    #[test]
    fn test_increment_text_is_invariant_violation() {
        let (mut store, id) = store_with_item();
        let err = store.increment_attribute(id, "color", -1.0);
        assert!(matches!(err, Err(SimError::Invariant(_))));
    }

    #[test]
    fn test_missing_item_errors() {
        let mut store = Store::new();
        assert!(matches!(
            store.set_attribute(ItemId(9), "x", 1.0),
            Err(SimError::ItemNotFound(_))
        ));
    }
}
