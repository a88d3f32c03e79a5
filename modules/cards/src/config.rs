use serde::{Deserialize, Serialize};

/// Configuration for the cards module (`modules.cards`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CardsConfig {
    #[serde(default = "default_collection")]
    pub collection: String,
    /// Enforce one document per (suit, rank) with a unique index.
    #[serde(default)]
    pub unique_cards: bool,
}

impl Default for CardsConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            unique_cards: false,
        }
    }
}

fn default_collection() -> String {
    "playing_cards".to_string()
}
