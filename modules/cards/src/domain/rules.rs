//! Card validation and derived-field enrichment.

use serde_json::Value;

use crate::contract::model::{CardFields, Rank, Suit};
use crate::domain::error::DomainError;

/// Check a create/replace candidate, short-circuiting on the first failure.
pub fn validate_card(input: Option<&CardFields>) -> Result<(), DomainError> {
    let card = match input {
        Some(card) if !card.is_empty() => card,
        _ => return Err(DomainError::no_data()),
    };

    let (Some(rank), Some(suit)) = (card.get("rank"), card.get("suit")) else {
        return Err(DomainError::missing_fields());
    };

    if rank.as_str().and_then(Rank::parse).is_none() {
        return Err(DomainError::invalid_rank(render_value(rank)));
    }
    if suit.as_str().and_then(Suit::parse).is_none() {
        return Err(DomainError::invalid_suit(render_value(suit)));
    }
    Ok(())
}

/// Fill `color` and `value` from `suit` and `rank` when the caller left them out.
pub fn enrich_card(card: &mut CardFields) {
    if !card.contains_key("color") {
        if let Some(suit) = card.get("suit").and_then(Value::as_str).and_then(Suit::parse) {
            card.insert("color".into(), Value::from(suit.color().as_str()));
        }
    }

    if !card.contains_key("value") {
        if let Some(rank) = card
            .get("rank")
            .and_then(Value::as_str)
            .and_then(Rank::parse_ignore_case)
        {
            card.insert("value".into(), Value::from(rank.value()));
        }
    }
}

// Strings print bare, everything else as compact JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
