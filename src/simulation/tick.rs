//! Tick driver - advances the world one step
//!
//! Per mob: follow the stored path, let the planner pick and run one
//! behavior (non-player mobs only), then sweep expired effects, decay
//! needs and apply poison. Per item: sweep effects and run the type's
//! on-tick handlers. Mobs go first, then items, each in ascending id order.
//!
//! A fatal error while processing one entity is logged and recorded in the
//! report; the remaining entities are still processed.

use rand::Rng;
use serde_json::json;
use std::path::Path;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, SimError};
use crate::core::types::{EntityRef, ItemId, MobId, Tick};
use crate::effects::ExpiredEffect;
use crate::entity::item::AttrValue;
use crate::entity::mob::attr;
use crate::interactions::UseRegistry;
use crate::ontick::{text_param, OnTickRegistry};
use crate::planner::Planner;
use crate::rules::GameRules;
use crate::services::Services;
use crate::simulation::context::TickContext;
use crate::simulation::lifecycle;
use crate::simulation::movement;
use crate::simulation::world::World;
use crate::store::Store;

/// A fatal error isolated to one entity
#[derive(Debug)]
pub struct EntityError {
    pub entity: EntityRef,
    pub error: SimError,
}

/// What one call to [`Simulation::step`] did
#[derive(Debug, Default)]
pub struct TickReport {
    pub tick: Tick,
    pub mobs_processed: usize,
    pub items_processed: usize,
    pub errors: Vec<EntityError>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct Simulation {
    pub world: World,
    pub services: Services,
    uses: UseRegistry,
    on_tick: OnTickRegistry,
    planner: Planner,
}

impl Simulation {
    /// Default registries and the full behavior roster
    pub fn new(world: World, services: Services) -> Result<Self> {
        let planner = Planner::with_defaults(world.config.stubbornness);
        Self::with_registries(
            world,
            services,
            UseRegistry::with_defaults(),
            OnTickRegistry::with_defaults(),
            planner,
        )
    }

    /// Fails fast when the rules name a handler no registry knows
    pub fn with_registries(
        world: World,
        services: Services,
        uses: UseRegistry,
        on_tick: OnTickRegistry,
        planner: Planner,
    ) -> Result<Self> {
        validate_rules(&world.rules, &uses, &on_tick)?;
        tracing::info!(
            "Simulation ready: {} item types, {} templates, behaviors [{}]",
            world.rules.items.len(),
            world.rules.mobs.len(),
            planner.keys().collect::<Vec<_>>().join(", ")
        );
        Ok(Self {
            world,
            services,
            uses,
            on_tick,
            planner,
        })
    }

    /// Resume from a snapshot file
    pub fn load(
        config: SimulationConfig,
        rules: GameRules,
        services: Services,
        path: &Path,
    ) -> Result<Self> {
        let (store, tick) = Store::load_snapshot(path)?;
        tracing::info!(
            "Loaded snapshot {} at tick {} ({} mobs, {} items)",
            path.display(),
            tick,
            store.mob_count(),
            store.item_count()
        );
        let world = World::restore(config, rules, store, tick)?;
        Self::new(world, services)
    }

    pub fn save_snapshot(&self, path: &Path) -> Result<()> {
        self.world.store.save_snapshot(path, self.world.now())
    }

    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    pub fn uses(&self) -> &UseRegistry {
        &self.uses
    }

    fn ctx(&mut self) -> TickContext<'_> {
        TickContext::new(&mut self.world, &self.services, &self.uses)
    }

    /// Process every live entity once and advance the clock
    pub fn step(&mut self, dt: f64) -> TickReport {
        let mut report = TickReport {
            tick: self.world.now(),
            ..TickReport::default()
        };

        for id in self.world.store.mob_ids() {
            // killed earlier this tick
            if !self.world.store.has_mob(id) {
                continue;
            }
            report.mobs_processed += 1;
            if let Err(error) = self.tick_mob(id, dt) {
                tracing::error!("Tick {} failed for {}: {}", report.tick, id, error);
                report.errors.push(EntityError {
                    entity: id.into(),
                    error,
                });
            }
        }

        for id in self.world.store.item_ids() {
            if !self.world.store.has_item(id) {
                continue;
            }
            report.items_processed += 1;
            if let Err(error) = self.tick_item(id) {
                tracing::error!("Tick {} failed for {}: {}", report.tick, id, error);
                report.errors.push(EntityError {
                    entity: id.into(),
                    error,
                });
            }
        }

        self.world.calendar.advance();
        report
    }

    pub fn run(&mut self, ticks: u64, dt: f64) -> Vec<TickReport> {
        (0..ticks).map(|_| self.step(dt)).collect()
    }

    pub fn tick_mob(&mut self, id: MobId, dt: f64) -> Result<()> {
        let speed = self.world.current(id, attr::SPEED).max(0.0);
        let mob = self.world.store.require_mob_mut(id)?;
        movement::follow_path(mob, speed * dt)?;
        let player = mob.player;

        if !player {
            self.plan(id)?;
            // died or left during its own behavior
            if !self.world.store.has_mob(id) {
                return Ok(());
            }
        }
        self.maintain(id)
    }

    /// Select, execute and record the behavior label
    fn plan(&mut self, id: MobId) -> Result<()> {
        let mob = self.world.store.require_mob(id)?;
        let selection = self.planner.select(&self.world, mob)?;
        let finished = {
            let mut ctx = TickContext::new(&mut self.world, &self.services, &self.uses);
            self.planner.execute(&mut ctx, id, &selection)?
        };

        let Some(mob) = self.world.store.mob_mut(id) else {
            return Ok(());
        };
        if finished {
            mob.action = None;
            return Ok(());
        }
        if mob.action.as_deref() == Some(selection.key) {
            return Ok(());
        }

        let previous = mob.action.replace(selection.key.to_string());
        tracing::debug!(
            "{} switched from {:?} to {} ({:.1})",
            id,
            previous,
            selection.key,
            selection.utility
        );
        let reaction = self
            .planner
            .plan(selection.key)
            .and_then(|plan| plan.reaction());
        self.services.publish(
            "behavior_changed",
            json!({ "mob": id.to_string(), "behavior": selection.key, "reaction": reaction }),
        );
        Ok(())
    }

    /// Effects, needs, poison and the health bound
    fn maintain(&mut self, id: MobId) -> Result<()> {
        let now = self.world.now();
        let ended = self.world.store.effects.sweep(EntityRef::Mob(id), now);
        self.announce_ended(EntityRef::Mob(id), &ended);

        let poison_due = now % self.world.config.poison_interval == 0
            && self.world.current(id, attr::POISONED) == 1.0;
        let poison = if poison_due {
            let (min, max) = (
                self.world.config.poison_damage_min,
                self.world.config.poison_damage_max,
            );
            self.world.rng.gen_range(min..=max)
        } else {
            0.0
        };
        let max_health = self.world.max_health(id);

        let mob = self.world.store.require_mob_mut(id)?;
        mob.needs.tick(now, &self.world.config);
        mob.health = (mob.health - poison).clamp(0.0, max_health);
        let dead = mob.health <= 0.0;

        if poison > 0.0 {
            self.services.publish(
                "mob_poisoned",
                json!({ "mob": id.to_string(), "damage": poison }),
            );
        }
        if dead {
            lifecycle::kill_mob(&mut self.ctx(), id)?;
        }
        Ok(())
    }

    pub fn tick_item(&mut self, id: ItemId) -> Result<()> {
        let now = self.world.now();
        let ended = self.world.store.effects.sweep(EntityRef::Item(id), now);
        self.announce_ended(EntityRef::Item(id), &ended);

        let row = self.world.store.require_item(id)?;
        let specs = self
            .world
            .item_type(row)
            .ok_or_else(|| SimError::UnknownItemType(row.item_type.clone()))?
            .on_tick
            .clone();

        for spec in &specs {
            let handler = self.on_tick.get(&spec.action)?;
            let mut ctx = TickContext::new(&mut self.world, &self.services, &self.uses);
            let keep_going = handler.on_tick(&mut ctx, id, &spec.params)?;
            if !keep_going || !self.world.store.has_item(id) {
                break;
            }
        }
        Ok(())
    }

    fn announce_ended(&self, entity: EntityRef, ended: &[ExpiredEffect]) {
        for effect in ended {
            self.services.publish(
                "effect_ended",
                json!({ "entity": entity.to_string(), "attribute": effect.attribute, "delta": effect.delta }),
            );
        }
    }

    /// Client-directed action; only keys the item type declares are allowed
    pub fn interact(
        &mut self,
        actor: MobId,
        key: &str,
        item: ItemId,
        other: Option<MobId>,
    ) -> Result<bool> {
        let handler = self.uses.get(key)?;
        let row = self.world.store.require_item(item)?;
        if !self.world.item_type(row).is_some_and(|t| t.allows(key)) {
            tracing::debug!("{} may not {} {} ({})", actor, key, item, row.item_type);
            return Ok(false);
        }
        let mut ctx = TickContext::new(&mut self.world, &self.services, &self.uses);
        handler.interact(&mut ctx, actor, item, other)
    }

    /// Text a client shows for an action on an item
    pub fn describe(&self, actor: MobId, key: &str, item: ItemId) -> Result<String> {
        Ok(self.uses.get(key)?.description(&self.world, actor, item))
    }
}

/// Every key the rules name must resolve before the first tick
pub fn validate_rules(rules: &GameRules, uses: &UseRegistry, on_tick: &OnTickRegistry) -> Result<()> {
    for (type_key, item_type) in &rules.items {
        if let Some(key) = item_type.interactions.iter().find(|k| !uses.contains(k)) {
            return Err(SimError::UnknownUseAction(format!(
                "{} (declared by item type {})",
                key, type_key
            )));
        }
        if let Some(spec) = item_type.on_tick.iter().find(|s| !on_tick.contains(&s.action)) {
            return Err(SimError::UnknownOnTickAction(format!(
                "{} (declared by item type {})",
                spec.action, type_key
            )));
        }
    }
    for (type_key, item_type) in &rules.items {
        for attribute in ["completes", "yields"] {
            let named = item_type.attributes.get(attribute).and_then(AttrValue::as_text);
            if let Some(target) = named.filter(|t| !t.is_empty()) {
                if rules.item_type(target).is_none() {
                    return Err(SimError::UnknownItemType(format!(
                        "{} ({} of item type {})",
                        target, attribute, type_key
                    )));
                }
            }
        }
        for spec in &item_type.on_tick {
            match spec.action.as_str() {
                "spawn_item" => {
                    let target = text_param(&spec.params, "item", &spec.action)?;
                    if rules.item_type(target).is_none() {
                        return Err(SimError::UnknownItemType(format!(
                            "{} (spawned by item type {})",
                            target, type_key
                        )));
                    }
                }
                "spawn_mob" => {
                    let target = text_param(&spec.params, "template", &spec.action)?;
                    if rules.template(target).is_none() {
                        return Err(SimError::UnknownTemplate(format!(
                            "{} (spawned by item type {})",
                            target, type_key
                        )));
                    }
                }
                _ => {}
            }
        }
    }
    for (template_key, template) in &rules.mobs {
        if let Some(favorite) = &template.favorite_item {
            if rules.item_type(favorite).is_none() {
                return Err(SimError::UnknownItemType(format!(
                    "{} (favorite of template {})",
                    favorite, template_key
                )));
            }
        }
    }
    Ok(())
}
