//! Card data model
//!
//! Cards are owned by the external data layer. The gallery only reads them.

mod card_entity;
mod card_source;

pub use card_entity::{CardEntity, CardId, Rarity};
pub use card_source::{CardSource, StaticCardSource, cards_from_json};
