pub mod facets;
pub mod factory;
pub mod item;
pub mod mob;
pub mod needs;
pub mod personality;

pub use item::{AttrValue, Item, Lock, Ownership};
pub use mob::{Mob, MobStats};
pub use needs::{NeedType, Needs};
pub use personality::{Personality, Trait};
