//! Borrowed view handed to behaviors and handlers for one entity step

use serde_json::json;

use crate::core::error::Result;
use crate::core::types::{EntityRef, ItemId, MobId, Tick};
use crate::effects::EffectOutcome;
use crate::interactions::UseRegistry;
use crate::services::Services;
use crate::simulation::world::World;

pub struct TickContext<'a> {
    pub world: &'a mut World,
    pub services: &'a Services,
    pub uses: &'a UseRegistry,
}

impl<'a> TickContext<'a> {
    pub fn new(world: &'a mut World, services: &'a Services, uses: &'a UseRegistry) -> Self {
        Self {
            world,
            services,
            uses,
        }
    }

    pub fn now(&self) -> Tick {
        self.world.now()
    }

    pub fn publish(&self, event: &str, payload: serde_json::Value) {
        self.services.publish(event, payload);
    }

    /// Apply an effect and tell observers what actually changed
    pub fn apply_effect(
        &mut self,
        entity: EntityRef,
        attribute: &str,
        delta: f64,
        duration: Tick,
    ) -> EffectOutcome {
        let now = self.now();
        let outcome = self
            .world
            .store
            .effects
            .apply(entity, attribute, delta, duration, now);
        match outcome {
            EffectOutcome::Applied { delta, expires_at } => self.publish(
                "effect_applied",
                json!({ "entity": entity.to_string(), "attribute": attribute, "delta": delta, "expires_at": expires_at }),
            ),
            EffectOutcome::Refreshed { expires_at, .. } => self.publish(
                "effect_refreshed",
                json!({ "entity": entity.to_string(), "attribute": attribute, "expires_at": expires_at }),
            ),
        }
        outcome
    }

    /// Run a use handler by key on behalf of `actor`
    pub fn use_item(
        &mut self,
        key: &str,
        actor: MobId,
        item: ItemId,
        other: Option<MobId>,
    ) -> Result<bool> {
        let uses = self.uses;
        let handler = uses.get(key)?;
        handler.interact(self, actor, item, other)
    }
}
