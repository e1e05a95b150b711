/// 2D grid presentation used when the 3D scene is not rendered.

use crate::card::{CardEntity, CardId, Rarity};

/// Width of one grid cell in logical pixels
pub const FALLBACK_CELL_WIDTH: u32 = 220;
pub const FALLBACK_MAX_COLUMNS: usize = 6;

/// One cell of the 2D grid
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackGridItem {
    pub card_id: CardId,
    pub title: String,
    pub rarity: Rarity,
    pub image_url: Option<String>,
    pub row: usize,
    pub column: usize,
    pub selected: bool,
    /// Text for screen readers
    pub accessible_label: String,
}

/// Columns fitting a viewport width (at least one)
pub fn fallback_columns(viewport_width: u32) -> usize {
    ((viewport_width / FALLBACK_CELL_WIDTH) as usize).clamp(1, FALLBACK_MAX_COLUMNS)
}

/// Lay cards out row-major, in input order
pub fn build_fallback_grid(cards: &[CardEntity], columns: usize, selected: Option<&CardId>) -> Vec<FallbackGridItem> {
    let columns = columns.max(1);
    cards
        .iter()
        .enumerate()
        .map(|(index, card)| FallbackGridItem {
            card_id: card.id.clone(),
            title: card.title.clone(),
            rarity: card.rarity,
            image_url: card.image_url.clone(),
            row: index / columns,
            column: index % columns,
            selected: selected == Some(&card.id),
            accessible_label: format!("{}, {} card", card.title, card.rarity.label()),
        })
        .collect()
}
