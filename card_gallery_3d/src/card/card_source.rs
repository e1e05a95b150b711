/// Card data source contract.
///
/// The gallery asks the data layer for a collection's cards and never
/// writes back.

use crate::error::{Error, Result};
use super::card_entity::CardEntity;

/// Supplier of collection cards (external data layer)
pub trait CardSource: Send + Sync {
    /// Fetch every card of a collection, in display order
    fn fetch_collection_cards(&self, collection_id: &str) -> Result<Vec<CardEntity>>;
}

/// Card source backed by an in-memory list, keyed by collection id.
///
/// Handy for previews and tests; unknown collections are an error.
pub struct StaticCardSource {
    collections: Vec<(String, Vec<CardEntity>)>,
}

impl StaticCardSource {
    pub fn new() -> Self {
        Self { collections: Vec::new() }
    }

    pub fn with_collection(mut self, collection_id: impl Into<String>, cards: Vec<CardEntity>) -> Self {
        self.collections.push((collection_id.into(), cards));
        self
    }
}

impl Default for StaticCardSource {
    fn default() -> Self {
        Self::new()
    }
}

impl CardSource for StaticCardSource {
    fn fetch_collection_cards(&self, collection_id: &str) -> Result<Vec<CardEntity>> {
        self.collections
            .iter()
            .find(|(id, _)| id == collection_id)
            .map(|(_, cards)| cards.clone())
            .ok_or_else(|| Error::DataSource(format!("Unknown collection '{}'", collection_id)))
    }
}

/// Parse a JSON array of cards as returned by the data layer
pub fn cards_from_json(json: &str) -> Result<Vec<CardEntity>> {
    serde_json::from_str(json).map_err(|e| Error::DataSource(format!("Invalid card JSON: {}", e)))
}
