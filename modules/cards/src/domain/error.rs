use thiserror::Error;

/// Message returned when a create collides with the unique (suit, rank) index.
pub const DUPLICATE_ON_CREATE: &str =
    "Duplicate card entry: This card already exists in the database. Duplicates are not allowed.";

/// Message returned when a replace or patch collides with the unique index.
pub const DUPLICATE_ON_UPDATE: &str =
    "the card already exist, cannot update this card with the same data";

/// Domain-specific errors. Display text is the client-facing message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Invalid ID format")]
    InvalidId { raw: String },

    #[error("No data provided")]
    NoData,

    #[error("Missing required fields: 'rank' and 'suit'")]
    MissingFields,

    #[error("Invalid rank: {value}")]
    InvalidRank { value: String },

    #[error("Invalid suit: {value}")]
    InvalidSuit { value: String },

    #[error("Card not found")]
    CardNotFound,

    #[error("no data found")]
    NoDataFound,

    #[error("{message}")]
    DuplicateKey { message: String },

    #[error("{message}")]
    Store { message: String },
}

impl DomainError {
    pub fn invalid_id(raw: impl Into<String>) -> Self {
        Self::InvalidId { raw: raw.into() }
    }

    pub fn no_data() -> Self {
        Self::NoData
    }

    pub fn missing_fields() -> Self {
        Self::MissingFields
    }

    pub fn invalid_rank(value: impl Into<String>) -> Self {
        Self::InvalidRank {
            value: value.into(),
        }
    }

    pub fn invalid_suit(value: impl Into<String>) -> Self {
        Self::InvalidSuit {
            value: value.into(),
        }
    }

    pub fn card_not_found() -> Self {
        Self::CardNotFound
    }

    pub fn no_data_found() -> Self {
        Self::NoDataFound
    }

    pub fn duplicate_on_create() -> Self {
        Self::DuplicateKey {
            message: DUPLICATE_ON_CREATE.to_string(),
        }
    }

    pub fn duplicate_on_update() -> Self {
        Self::DuplicateKey {
            message: DUPLICATE_ON_UPDATE.to_string(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Client errors that come from the request itself rather than the store.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Store { .. })
    }
}
