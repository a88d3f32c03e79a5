use std::sync::Arc;

use mongodb::bson::Document;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::contract::model::CardFields;
use crate::domain::document::{render_id, to_document, to_json};
use crate::domain::error::DomainError;
use crate::domain::id::CardId;
use crate::domain::rules::{enrich_card, validate_card};
use crate::domain::store::{DocumentStore, StoreError};

/// Card façade: validation, enrichment and outcome mapping over a document store.
/// Depends only on the store port, not on infra types.
#[derive(Clone)]
pub struct CardService {
    store: Arc<dyn DocumentStore>,
}

impl CardService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    #[instrument(name = "cards.service.list_cards", skip(self))]
    pub async fn list_cards(&self) -> Result<Vec<Value>, DomainError> {
        let docs = self
            .store
            .find(Document::new())
            .await
            .map_err(store_failure)?;
        debug!(count = docs.len(), "Listed cards");
        Ok(docs.into_iter().map(to_json).collect())
    }

    #[instrument(name = "cards.service.get_card", skip(self), fields(card_id = %id))]
    pub async fn get_card(&self, id: &str) -> Result<Value, DomainError> {
        let id: CardId = id.parse()?;
        let doc = self
            .store
            .find_one(id.filter())
            .await
            .map_err(store_failure)?
            .ok_or_else(DomainError::card_not_found)?;
        Ok(to_json(doc))
    }

    /// Exact-match search; query values stay strings. The first occurrence of a
    /// repeated key wins.
    #[instrument(name = "cards.service.search_cards", skip(self, query), fields(params = query.len()))]
    pub async fn search_cards(&self, query: &[(String, String)]) -> Result<Vec<Value>, DomainError> {
        let mut filter = Document::new();
        for (key, value) in query {
            if !filter.contains_key(key) {
                filter.insert(key.clone(), value.clone());
            }
        }

        let docs = self.store.find(filter).await.map_err(store_failure)?;
        if docs.is_empty() {
            debug!("Search matched nothing");
            return Err(DomainError::no_data_found());
        }
        Ok(docs.into_iter().map(to_json).collect())
    }

    /// Validate, enrich and insert a card. Returns the new id as a string.
    #[instrument(name = "cards.service.create_card", skip(self, input))]
    pub async fn create_card(&self, input: Option<CardFields>) -> Result<String, DomainError> {
        validate_card(input.as_ref())?;
        let mut card = input.unwrap_or_default();
        enrich_card(&mut card);

        let inserted = self
            .store
            .insert(to_document(&card)?)
            .await
            .map_err(|e| write_failure(e, DomainError::duplicate_on_create))?;

        let id = render_id(&inserted);
        info!(card_id = %id, "Created card");
        Ok(id)
    }

    /// Replace every field but `_id`. Returns the modified count.
    #[instrument(name = "cards.service.replace_card", skip(self, input), fields(card_id = %id))]
    pub async fn replace_card(&self, id: &str, input: Option<CardFields>) -> Result<u64, DomainError> {
        validate_card(input.as_ref())?;
        let mut card = input.unwrap_or_default();
        enrich_card(&mut card);
        let id: CardId = id.parse()?;

        let outcome = self
            .store
            .replace(id.filter(), to_document(&card)?)
            .await
            .map_err(|e| write_failure(e, DomainError::duplicate_on_update))?;

        if outcome.matched == 0 {
            return Err(DomainError::card_not_found());
        }
        info!(modified = outcome.modified, "Replaced card");
        Ok(outcome.modified)
    }

    /// Set the given top-level fields. No rank/suit validation on this path.
    #[instrument(name = "cards.service.update_card", skip(self, input), fields(card_id = %id))]
    pub async fn update_card(&self, id: &str, input: Option<CardFields>) -> Result<u64, DomainError> {
        let fields = match input {
            Some(fields) if !fields.is_empty() => fields,
            _ => return Err(DomainError::no_data()),
        };
        let id: CardId = id.parse()?;

        let outcome = self
            .store
            .update_fields(id.filter(), to_document(&fields)?)
            .await
            .map_err(|e| write_failure(e, DomainError::duplicate_on_update))?;

        if outcome.matched == 0 {
            return Err(DomainError::card_not_found());
        }
        info!(modified = outcome.modified, "Updated card");
        Ok(outcome.modified)
    }

    #[instrument(name = "cards.service.delete_card", skip(self), fields(card_id = %id))]
    pub async fn delete_card(&self, id: &str) -> Result<u64, DomainError> {
        let id: CardId = id.parse()?;
        let deleted = self
            .store
            .delete_one(id.filter())
            .await
            .map_err(store_failure)?;
        if deleted == 0 {
            return Err(DomainError::card_not_found());
        }
        info!("Deleted card");
        Ok(deleted)
    }

    #[instrument(name = "cards.service.delete_all_cards", skip(self))]
    pub async fn delete_all_cards(&self) -> Result<u64, DomainError> {
        let deleted = self
            .store
            .delete_many(Document::new())
            .await
            .map_err(store_failure)?;
        info!(deleted, "Deleted all cards");
        Ok(deleted)
    }
}

fn store_failure(err: StoreError) -> DomainError {
    DomainError::store(err.to_string())
}

fn write_failure(err: StoreError, on_duplicate: fn() -> DomainError) -> DomainError {
    match err {
        StoreError::DuplicateKey { .. } => on_duplicate(),
        StoreError::Backend { message } => DomainError::store(message),
    }
}
