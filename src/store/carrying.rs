//! The exclusive carrying relation between mobs and items
//!
//! The mob row owns the relation (`Mob::carrying`); the item row keeps a
//! back-reference for lookup. Only these three operations change either
//! side, so the two can never disagree. Handlers validate softly before
//! calling; reaching an error here means that validation was skipped.

use super::Store;
use crate::core::error::{Result, SimError};
use crate::core::types::{ItemId, MobId};

impl Store {
    /// Move a placed item into a mob's hands
    pub fn pick_up(&mut self, mob: MobId, item: ItemId) -> Result<()> {
        let carrier = self.require_mob(mob)?;
        if let Some(held) = carrier.carrying {
            return Err(SimError::Invariant(format!(
                "{} already carries {}",
                mob, held
            )));
        }
        let row = self.require_item(item)?;
        if let Some(other) = row.carried_by {
            return Err(SimError::Invariant(format!(
                "{} is already carried by {}",
                item, other
            )));
        }

        let row = self.require_item_mut(item)?;
        row.carried_by = Some(mob);
        row.position = None;
        self.require_mob_mut(mob)?.carrying = Some(item);
        Ok(())
    }

    /// Put the carried item down on the mob's cell
    pub fn release(&mut self, mob: MobId) -> Result<Option<ItemId>> {
        let carrier = self.require_mob_mut(mob)?;
        let Some(item) = carrier.carrying.take() else {
            return Ok(None);
        };
        let cell = carrier.cell();
        let row = self.require_item_mut(item)?;
        row.carried_by = None;
        row.position = Some(cell);
        Ok(Some(item))
    }

    /// Hand the carried item from one mob to another
    pub fn transfer(&mut self, from: MobId, to: MobId) -> Result<ItemId> {
        if self.require_mob(to)?.carrying.is_some() {
            return Err(SimError::Invariant(format!("{} already carries an item", to)));
        }
        let giver = self.require_mob_mut(from)?;
        let item = giver
            .carrying
            .take()
            .ok_or_else(|| SimError::Invariant(format!("{} carries nothing", from)))?;

        self.require_item_mut(item)?.carried_by = Some(to);
        self.require_mob_mut(to)?.carrying = Some(item);
        Ok(item)
    }

    pub fn carrier_of(&self, item: ItemId) -> Option<MobId> {
        self.item(item).and_then(|i| i.carried_by)
    }
}
