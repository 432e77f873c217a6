/* Test doubles for the transport and record store capabilities. */

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use chrono::NaiveDate;
use chrono_tz::Tz;
use teloxide::types::ChatId;

use super::{
    agent::{AgentSettings, ExpenseAgent},
    expense::{Category, ExpensePayload, ExpenseRecord, RecordId},
    flow::DateMode,
    store::{RecordStore, StoreError},
    transport::{Keyboard, MessageTransport},
    utils::HandlerResult,
};

#[derive(Clone, Debug, PartialEq)]
pub struct SentMessage {
    pub chat_id: ChatId,
    pub text: String,
    pub keyboard: Option<Keyboard>,
}

#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<SentMessage>>,
}

impl RecordingTransport {
    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last(&self) -> SentMessage {
        self.sent().pop().expect("no message was sent")
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Option<Keyboard>,
    ) -> HandlerResult {
        self.sent.lock().unwrap().push(SentMessage {
            chat_id,
            text,
            keyboard,
        });
        Ok(())
    }
}

fn unavailable() -> StoreError {
    StoreError::Api {
        status: 503,
        message: "Service unavailable".to_string(),
    }
}

/// In-memory record store with switchable failures.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<ExpenseRecord>>,
    created: Mutex<Vec<ExpensePayload>>,
    updated: Mutex<Vec<(RecordId, ExpensePayload)>>,
    mutation_calls: AtomicUsize,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<ExpenseRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Self::default()
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    // Successful creates, in order.
    pub fn created(&self) -> Vec<ExpensePayload> {
        self.created.lock().unwrap().clone()
    }

    // Successful updates, in order.
    pub fn updated(&self) -> Vec<(RecordId, ExpensePayload)> {
        self.updated.lock().unwrap().clone()
    }

    // Create and update attempts, failed ones included.
    pub fn mutation_calls(&self) -> usize {
        self.mutation_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_record(&self, payload: &ExpensePayload) -> Result<RecordId, StoreError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let mut records = self.records.lock().unwrap();
        let id = RecordId(format!("page-{}", records.len() + 1));
        records.push(ExpenseRecord {
            id: id.clone(),
            payload: payload.clone(),
        });
        self.created.lock().unwrap().push(payload.clone());
        Ok(id)
    }

    async fn query_latest_by_date(&self, limit: usize) -> Result<Vec<ExpenseRecord>, StoreError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let mut records = self.records.lock().unwrap().clone();
        records.sort_by(|a, b| b.payload.date.cmp(&a.payload.date));
        records.truncate(limit);
        Ok(records)
    }

    async fn update_record(
        &self,
        id: &RecordId,
        payload: &ExpensePayload,
    ) -> Result<(), StoreError> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(unavailable());
        }

        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| StoreError::Api {
                status: 404,
                message: format!("Could not find page with ID: {id}"),
            })?;
        record.payload = payload.clone();
        self.updated
            .lock()
            .unwrap()
            .push((id.clone(), payload.clone()));
        Ok(())
    }
}

pub fn rent_record() -> ExpenseRecord {
    ExpenseRecord {
        id: RecordId("page-rent".to_string()),
        payload: ExpensePayload {
            name: "Rent".to_string(),
            amount: 1200.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            category: Category::Rent,
            comment: "January, paid late!".to_string(),
        },
    }
}

pub fn agent_with_mode(
    store: MemoryStore,
    date_mode: DateMode,
) -> (ExpenseAgent, Arc<RecordingTransport>, Arc<MemoryStore>) {
    let transport = Arc::new(RecordingTransport::default());
    let store = Arc::new(store);
    let agent = ExpenseAgent::new(
        transport.clone(),
        store.clone(),
        AgentSettings {
            bot_username: "expense_test_bot".to_string(),
            date_mode,
            time_zone: Tz::UTC,
        },
    );
    (agent, transport, store)
}

pub fn agent(store: MemoryStore) -> (ExpenseAgent, Arc<RecordingTransport>, Arc<MemoryStore>) {
    agent_with_mode(store, DateMode::Ask)
}
