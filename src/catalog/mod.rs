//! Static game data
//!
//! Characters, weapons, passives and weapon upgrade trees. Nothing in here
//! changes during a run; runtime state lives in [`crate::sim`].

pub mod characters;
pub mod passives;
pub mod upgrades;
pub mod weapons;

pub use characters::Character;
pub use passives::{PASSIVES, PassiveDef, PassiveSpecial, passive};
pub use upgrades::{UPGRADE_TREES, UpgradeDef, UpgradeTier, UpgradeTree};
pub use weapons::{FireContext, WEAPONS, WeaponBehavior, WeaponDef, weapon};
