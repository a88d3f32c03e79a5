use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::domain::store::{DocumentStore, StoreError, WriteOutcome};

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// `DocumentStore` backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Build a client for `url`. The driver connects lazily, so call
    /// [`DocumentStore::ping`] to confirm the server is reachable.
    pub async fn connect(
        url: &str,
        database: &str,
        collection: &str,
        max_pool_size: Option<u32>,
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(url).await.map_err(map_error)?;
        if let Some(max_size) = max_pool_size {
            options.max_pool_size = Some(max_size);
        }
        let client = Client::with_options(options).map_err(map_error)?;
        let db = client.database(database);
        let collection = db.collection::<Document>(collection);
        Ok(Self { db, collection })
    }

    /// Create (or confirm) a unique ascending compound index over `fields`.
    pub async fn ensure_unique_index(&self, fields: &[&str]) -> Result<(), StoreError> {
        let mut keys = Document::new();
        for field in fields {
            keys.insert(*field, 1);
        }
        let index = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection
            .create_index(index)
            .await
            .map_err(map_error)?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn insert(&self, doc: Document) -> Result<Bson, StoreError> {
        let result = self.collection.insert_one(doc).await.map_err(map_error)?;
        Ok(result.inserted_id)
    }

    async fn find(&self, filter: Document) -> Result<Vec<Document>, StoreError> {
        let cursor = self.collection.find(filter).await.map_err(map_error)?;
        cursor.try_collect().await.map_err(map_error)
    }

    async fn find_one(&self, filter: Document) -> Result<Option<Document>, StoreError> {
        self.collection.find_one(filter).await.map_err(map_error)
    }

    async fn replace(&self, filter: Document, doc: Document) -> Result<WriteOutcome, StoreError> {
        let result = self
            .collection
            .replace_one(filter, doc)
            .await
            .map_err(map_error)?;
        Ok(WriteOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn update_fields(
        &self,
        filter: Document,
        fields: Document,
    ) -> Result<WriteOutcome, StoreError> {
        let result = self
            .collection
            .update_one(filter, doc! { "$set": fields })
            .await
            .map_err(map_error)?;
        Ok(WriteOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_one(&self, filter: Document) -> Result<u64, StoreError> {
        let result = self.collection.delete_one(filter).await.map_err(map_error)?;
        Ok(result.deleted_count)
    }

    async fn delete_many(&self, filter: Document) -> Result<u64, StoreError> {
        let result = self
            .collection
            .delete_many(filter)
            .await
            .map_err(map_error)?;
        Ok(result.deleted_count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(map_error)?;
        Ok(())
    }
}

fn map_error(err: MongoError) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::duplicate_key(err.to_string())
    } else {
        StoreError::backend(err.to_string())
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY_CODE,
        _ => false,
    }
}
