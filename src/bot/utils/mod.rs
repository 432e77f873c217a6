use teloxide::{dispatching::dialogue::InMemStorageError, RequestError};

use crate::bot::{config::ConfigError, store::StoreError};

/* Types */
pub type HandlerResult = Result<(), BotError>;

#[derive(thiserror::Error, Debug)]
pub enum BotError {
    #[error("Request error: {0}")]
    RequestError(RequestError),
    #[error("Conversation storage error: {0}")]
    StorageError(InMemStorageError),
    #[error("Store error: {0}")]
    StoreError(StoreError),
    #[error("Config error: {0}")]
    ConfigError(ConfigError),
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

impl From<RequestError> for BotError {
    fn from(request_error: RequestError) -> BotError {
        BotError::RequestError(request_error)
    }
}

impl From<InMemStorageError> for BotError {
    fn from(storage_error: InMemStorageError) -> BotError {
        BotError::StorageError(storage_error)
    }
}

impl From<StoreError> for BotError {
    fn from(store_error: StoreError) -> BotError {
        BotError::StoreError(store_error)
    }
}

impl From<ConfigError> for BotError {
    fn from(config_error: ConfigError) -> BotError {
        BotError::ConfigError(config_error)
    }
}

pub mod amounts;
pub mod format;
