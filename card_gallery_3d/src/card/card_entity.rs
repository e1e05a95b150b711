/// Card entity as supplied by the collection data layer.
///
/// Immutable from the gallery's perspective: layout, LOD, and rendering
/// derive their own state from it and never write back.

use std::fmt;
use serde::{Deserialize, Serialize};

/// Stable card identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Rarity tier of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl Rarity {
    /// Linear RGBA tint applied to the card material
    pub fn tint(&self) -> [f32; 4] {
        match self {
            Rarity::Common => [0.82, 0.82, 0.85, 1.0],
            Rarity::Uncommon => [0.45, 0.85, 0.50, 1.0],
            Rarity::Rare => [0.35, 0.55, 0.95, 1.0],
            Rarity::Epic => [0.70, 0.40, 0.95, 1.0],
            Rarity::Legendary => [1.00, 0.78, 0.25, 1.0],
        }
    }

    /// Lower-case label, as stored by the data layer
    pub fn label(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
        }
    }
}

impl Default for Rarity {
    fn default() -> Self {
        Rarity::Common
    }
}

/// A trading card in a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardEntity {
    pub id: CardId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Opaque image URL, resolved by the texture fetcher
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rarity: Rarity,
    /// Market value in the marketplace's display currency
    #[serde(default)]
    pub market_value: Option<f64>,
    #[serde(default)]
    pub serial_number: Option<u32>,
}

impl CardEntity {
    /// Create a card with only an id and a title
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: CardId(id.into()),
            title: title.into(),
            description: String::new(),
            image_url: None,
            rarity: Rarity::Common,
            market_value: None,
            serial_number: None,
        }
    }

    pub fn with_image(mut self, url: impl Into<String>) -> Self {
        self.image_url = Some(url.into());
        self
    }

    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Case-insensitive match of a search query against title, description and rarity.
    ///
    /// An empty (or whitespace-only) query matches every card.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.rarity.label() == query
    }
}

#[cfg(test)]
#[path = "card_entity_tests.rs"]
mod tests;
