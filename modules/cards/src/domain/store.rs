use async_trait::async_trait;
use mongodb::bson::{Bson, Document};
use thiserror::Error;

/// Matched/modified counts of a single-document write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOutcome {
    pub matched: u64,
    pub modified: u64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// A write collided with a unique index.
    #[error("{message}")]
    DuplicateKey { message: String },

    #[error("{message}")]
    Backend { message: String },
}

impl StoreError {
    pub fn duplicate_key(message: impl Into<String>) -> Self {
        Self::DuplicateKey {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}

/// Port for the domain layer: the document operations the card service needs.
/// Object-safe and async-friendly via `async_trait`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Insert a document. Returns its `_id`, generated when absent.
    async fn insert(&self, doc: Document) -> Result<Bson, StoreError>;
    /// All documents matching an equality filter, in natural order.
    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError>;
    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError>;
    /// Replace the first match, keeping its `_id`.
    async fn replace(&self, filter: Document, doc: Document) -> Result<WriteOutcome, StoreError>;
    /// Set top-level fields on the first match.
    async fn update_fields(
        &self,
        filter: Document,
        fields: Document,
    ) -> Result<WriteOutcome, StoreError>;
    async fn delete_one(&self, filter: Document) -> Result<u64, StoreError>;
    async fn delete_many(&self, filter: Document) -> Result<u64, StoreError>;
    /// Connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}
