//! Mob factory and item generator
//!
//! Both build rows from named rules entries. Unknown names are
//! configuration errors.

use rand::Rng;
use std::collections::BTreeMap;

use crate::core::error::{Result, SimError};
use crate::core::types::{CommunityId, Coord, ItemId, MobId, Tick};
use crate::entity::item::{AttrValue, Item};
use crate::entity::mob::{Mob, MobStats};
use crate::entity::needs::Needs;
use crate::entity::personality::Personality;
use crate::rules::GameRules;
use crate::store::Store;

/// Spawn a mob from a template at `position`
pub fn spawn_mob(
    store: &mut Store,
    rules: &GameRules,
    rng: &mut impl Rng,
    template_key: &str,
    position: Coord,
    now: Tick,
) -> Result<MobId> {
    let template = rules
        .template(template_key)
        .ok_or_else(|| SimError::UnknownTemplate(template_key.to_string()))?;

    let personality = match &template.personality {
        Some(p) => p.clone().clamped(),
        None => Personality::random(rng),
    };

    let id = store.insert_mob(|id| Mob {
        id,
        name: format!("{} {}", template.name, id.0),
        template: template_key.to_string(),
        stats: MobStats {
            speed: template.speed,
            attack: template.attack,
            defense: template.defense,
            max_health: template.max_health,
        },
        gold: template.gold,
        favorite_item: template.favorite_item.clone(),
        health: template.max_health,
        position: position.to_position(),
        path: Vec::new(),
        target: None,
        carrying: None,
        action: None,
        community: template.community.as_deref().map(CommunityId::new),
        unlocks: template.unlocks.clone(),
        player: template.player,
        personality,
        needs: Needs::starting_at(now),
    });

    tracing::debug!("Spawned {} from template '{}' at {}", id, template_key, position);
    Ok(id)
}

/// Create an item of `type_key`; `overrides` win over the type's defaults
pub fn generate_item(
    store: &mut Store,
    rules: &GameRules,
    type_key: &str,
    overrides: BTreeMap<String, AttrValue>,
    position: Option<Coord>,
) -> Result<ItemId> {
    let item_type = rules
        .item_type(type_key)
        .ok_or_else(|| SimError::UnknownItemType(type_key.to_string()))?;

    let mut attributes = item_type.attributes.clone();
    attributes.extend(overrides);

    let id = store.insert_item(
        |id| {
            let mut item = Item::new(id, type_key);
            item.subtype = item_type.subtype.clone();
            item.position = position;
            item
        },
        attributes,
    );
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{ItemType, MobTemplate};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rules() -> GameRules {
        let mut rules = GameRules::new();
        rules.add_item_type(
            "potion",
            ItemType::new("Potion").carryable().with_attribute("heal", 20.0),
        );
        rules.add_template(
            "guard",
            MobTemplate {
                name: "Guard".into(),
                speed: 1.5,
                attack: 8.0,
                defense: 4.0,
                max_health: 120.0,
                gold: 15,
                favorite_item: Some("potion".into()),
                community: Some("keep".into()),
                player: false,
                unlocks: vec!["gate".into()],
                personality: None,
            },
        );
        rules
    }

    #[test]
    fn test_spawn_mob_from_template() {
        let rules = rules();
        let mut store = Store::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let id = spawn_mob(&mut store, &rules, &mut rng, "guard", Coord::new(2, 3), 40).unwrap();

        let mob = store.mob(id).unwrap();
        assert_eq!(mob.health, 120.0);
        assert_eq!(mob.stats.attack, 8.0);
        assert_eq!(mob.community, Some(CommunityId::new("keep")));
        assert_eq!(mob.cell(), Coord::new(2, 3));
        assert_eq!(mob.needs.last_update, 40);
    }

    #[test]
    fn test_unknown_template_is_config_error() {
        let mut store = Store::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = spawn_mob(&mut store, &rules(), &mut rng, "dragon", Coord::default(), 0);
        assert!(matches!(err, Err(SimError::UnknownTemplate(_))));
    }

    #[test]
    fn test_generate_item_with_overrides() {
        let rules = rules();
        let mut store = Store::new();
        let mut overrides = BTreeMap::new();
        overrides.insert("heal".to_string(), AttrValue::Number(50.0));
        overrides.insert("price".to_string(), AttrValue::Number(5.0));
        let id = generate_item(&mut store, &rules, "potion", overrides, Some(Coord::new(1, 1)))
            .unwrap();

        assert_eq!(store.number(id, "heal"), Some(50.0));
        assert_eq!(store.number(id, "price"), Some(5.0));
        assert_eq!(store.item(id).unwrap().position, Some(Coord::new(1, 1)));
        assert!(generate_item(&mut store, &rules, "nope", BTreeMap::new(), None).is_err());
    }
}
