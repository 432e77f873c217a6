/* Record store capability.
 * Finished expenses live in an external table; the conversation core only creates,
 * reads back the latest, and updates records through this trait.
 */

use async_trait::async_trait;

use super::expense::{ExpensePayload, ExpenseRecord, RecordId};

pub mod notion;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Malformed response: {0}")]
    Malformed(String),
    #[error("Invalid API key")]
    InvalidApiKey,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_record(&self, payload: &ExpensePayload) -> Result<RecordId, StoreError>;

    /// Records ordered by date, most recent first.
    async fn query_latest_by_date(&self, limit: usize) -> Result<Vec<ExpenseRecord>, StoreError>;

    async fn update_record(&self, id: &RecordId, payload: &ExpensePayload)
        -> Result<(), StoreError>;

    async fn latest_record(&self) -> Result<Option<ExpenseRecord>, StoreError> {
        Ok(self.query_latest_by_date(1).await?.into_iter().next())
    }
}
