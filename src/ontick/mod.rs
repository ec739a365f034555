//! On-tick registry - scheduled item behavior keyed by string
//!
//! Item types list `on_tick` entries in the rules file; each names a
//! handler and carries opaque parameters the handler interprets.

mod spawn;

use std::collections::BTreeMap;

use crate::core::error::{Result, SimError};
use crate::core::types::ItemId;
use crate::entity::item::AttrValue;
use crate::simulation::context::TickContext;

pub use spawn::{SpawnItem, SpawnMob};

pub type Params = BTreeMap<String, AttrValue>;

pub trait OnTickHandler: Send + Sync {
    fn key(&self) -> &'static str;

    /// Run once for `item` this tick; `Ok(false)` skips its remaining entries
    fn on_tick(&self, ctx: &mut TickContext<'_>, item: ItemId, params: &Params) -> Result<bool>;
}

#[derive(Default)]
pub struct OnTickRegistry {
    handlers: BTreeMap<&'static str, Box<dyn OnTickHandler>>,
}

impl OnTickRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(SpawnItem));
        registry.register(Box::new(SpawnMob));
        registry
    }

    pub fn register(&mut self, handler: Box<dyn OnTickHandler>) {
        self.handlers.insert(handler.key(), handler);
    }

    pub fn get(&self, key: &str) -> Result<&dyn OnTickHandler> {
        self.handlers
            .get(key)
            .map(|h| h.as_ref())
            .ok_or_else(|| SimError::UnknownOnTickAction(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.handlers.contains_key(key)
    }
}

/// Required text parameter
pub fn text_param<'p>(params: &'p Params, key: &str, handler: &str) -> Result<&'p str> {
    params
        .get(key)
        .and_then(AttrValue::as_text)
        .ok_or_else(|| SimError::Config(format!("{} needs a text '{}' parameter", handler, key)))
}

/// Optional numeric parameter with a fallback
pub fn number_param(params: &Params, key: &str, default: f64) -> f64 {
    params
        .get(key)
        .and_then(AttrValue::as_number)
        .unwrap_or(default)
}
