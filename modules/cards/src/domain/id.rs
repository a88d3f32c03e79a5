use std::fmt;
use std::str::FromStr;

use mongodb::bson::{doc, oid::ObjectId, Document};

use crate::domain::error::DomainError;

/// Store-assigned card identifier: a 24-hex-digit object id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CardId(ObjectId);

impl CardId {
    pub fn object_id(&self) -> ObjectId {
        self.0
    }

    /// Equality filter selecting this card by `_id`.
    pub fn filter(&self) -> Document {
        doc! { "_id": self.0 }
    }
}

impl FromStr for CardId {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(raw)
            .map(CardId)
            .map_err(|_| DomainError::invalid_id(raw))
    }
}

impl From<ObjectId> for CardId {
    fn from(oid: ObjectId) -> Self {
        CardId(oid)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}
