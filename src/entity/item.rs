//! Item rows and their attribute values

use serde::{Deserialize, Serialize};

use crate::core::types::{CommunityId, Coord, ItemId, MobId};

/// Value stored in an item's attribute bag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttrValue::Number(n) => Some(*n),
            AttrValue::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Number(_) => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(n: f64) -> Self {
        AttrValue::Number(n)
    }
}

impl From<i64> for AttrValue {
    fn from(n: i64) -> Self {
        AttrValue::Number(n as f64)
    }
}

impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        AttrValue::Text(s.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(s: String) -> Self {
        AttrValue::Text(s)
    }
}

/// Static grant restricting who may interact with an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ownership {
    Community(CommunityId),
    Character(MobId),
}

/// A lock opened by any mob holding the named key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    pub key: String,
}

/// One row of the item table
///
/// The attribute bag lives in its own table in the store; this row only
/// carries identity, placement and grants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// Key into the rules' item types
    pub item_type: String,
    pub subtype: Option<String>,
    /// Absent while carried
    pub position: Option<Coord>,
    pub owner: Option<Ownership>,
    pub lock: Option<Lock>,
    /// Non-owning back-reference to the carrier, kept in sync by the store
    pub carried_by: Option<MobId>,
}

impl Item {
    pub fn new(id: ItemId, item_type: impl Into<String>) -> Self {
        Self {
            id,
            item_type: item_type.into(),
            subtype: None,
            position: None,
            owner: None,
            lock: None,
            carried_by: None,
        }
    }

    pub fn is_carried(&self) -> bool {
        self.carried_by.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_value_untagged_toml() {
        #[derive(Deserialize)]
        struct Row {
            a: AttrValue,
            b: AttrValue,
            c: AttrValue,
        }
        let row: Row = toml::from_str("a = 3\nb = 2.5\nc = \"red\"").unwrap();
        assert_eq!(row.a, AttrValue::Number(3.0));
        assert_eq!(row.b.as_number(), Some(2.5));
        assert_eq!(row.c.as_text(), Some("red"));
    }
}
