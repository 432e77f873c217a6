use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{header, RequestBuilder};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::bot::{
    expense::{Category, ExpensePayload, ExpenseRecord, RecordId},
    flow::DATE_FORMAT,
};

use super::{RecordStore, StoreError};

const NOTION_API_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

// Property names of the expense table.
const PROPERTY_NAME: &str = "Name";
const PROPERTY_AMOUNT: &str = "Amount";
const PROPERTY_DATE: &str = "Date";
const PROPERTY_CATEGORY: &str = "Category";
const PROPERTY_COMMENT: &str = "Comment";

#[derive(Deserialize)]
struct PageList {
    results: Vec<Value>,
}

#[derive(Deserialize)]
struct CreatedPage {
    id: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Authenticated Notion API client.
#[derive(Clone)]
pub struct NotionClient {
    client: reqwest::Client,
    base_url: String,
}

impl NotionClient {
    pub fn new(api_key: &str, timeout: Duration) -> Result<Self, StoreError> {
        let mut h = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| StoreError::InvalidApiKey)?;
        auth.set_sensitive(true);
        h.insert(header::AUTHORIZATION, auth);
        h.insert(
            "notion-version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );
        h.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(h)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: NOTION_API_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, StoreError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) => body.message,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            };
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    // Finds the ID of the database whose title is exactly `name`.
    pub async fn find_database_id(&self, name: &str) -> Result<Option<String>, StoreError> {
        let body = json!({
            "query": name,
            "filter": { "property": "object", "value": "database" },
        });
        let response = self
            .send(self.client.post(self.url("search")).json(&body))
            .await?;
        let list: PageList =
            serde_json::from_value(response).map_err(|e| StoreError::Malformed(e.to_string()))?;

        Ok(list
            .results
            .iter()
            .find(|database| plain_text(&database["title"]) == name)
            .and_then(|database| database["id"].as_str())
            .map(str::to_string))
    }
}

/* Expense table stored as a Notion database.
 * Each expense is one page; properties follow the table layout above.
 */
#[derive(Clone)]
pub struct NotionStore {
    client: NotionClient,
    database_id: String,
}

impl NotionStore {
    pub fn new(client: NotionClient, database_id: String) -> Self {
        Self {
            client,
            database_id,
        }
    }
}

fn rich_text(content: &str) -> Value {
    json!([{ "text": { "content": content } }])
}

fn expense_properties(payload: &ExpensePayload) -> Value {
    json!({
        PROPERTY_NAME: { "title": rich_text(&payload.name) },
        PROPERTY_AMOUNT: { "number": payload.amount },
        PROPERTY_DATE: { "date": { "start": payload.date.format(DATE_FORMAT).to_string() } },
        PROPERTY_CATEGORY: { "rich_text": rich_text(payload.category.as_str()) },
        PROPERTY_COMMENT: { "rich_text": rich_text(&payload.comment) },
    })
}

// Concatenates the plain text of a rich text array.
fn plain_text(items: &Value) -> String {
    items
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    item["plain_text"]
                        .as_str()
                        .or_else(|| item["text"]["content"].as_str())
                })
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn parse_record(page: &Value) -> Result<ExpenseRecord, StoreError> {
    let id = page["id"]
        .as_str()
        .ok_or_else(|| StoreError::Malformed("page without id".to_string()))?;
    let properties = &page["properties"];

    let amount = properties[PROPERTY_AMOUNT]["number"]
        .as_f64()
        .ok_or_else(|| StoreError::Malformed(format!("page {id} has no amount")))?;

    // Date properties may carry a time; only the calendar date is kept.
    let start = properties[PROPERTY_DATE]["date"]["start"]
        .as_str()
        .ok_or_else(|| StoreError::Malformed(format!("page {id} has no date")))?;
    let date = start
        .get(..10)
        .and_then(|day| NaiveDate::parse_from_str(day, DATE_FORMAT).ok())
        .ok_or_else(|| StoreError::Malformed(format!("page {id} has invalid date {start}")))?;

    // Category may be stored as rich text or as a select option.
    let category_property = &properties[PROPERTY_CATEGORY];
    let category_text = match category_property["select"]["name"].as_str() {
        Some(name) => name.to_string(),
        None => plain_text(&category_property["rich_text"]),
    };
    let category = category_text.parse::<Category>().unwrap_or_else(|_| {
        log::warn!(
            "Page {} has unknown category {:?}, reading it as {}",
            id,
            category_text,
            Category::Other
        );
        Category::Other
    });

    Ok(ExpenseRecord {
        id: RecordId(id.to_string()),
        payload: ExpensePayload {
            name: plain_text(&properties[PROPERTY_NAME]["title"]),
            amount,
            date,
            category,
            comment: plain_text(&properties[PROPERTY_COMMENT]["rich_text"]),
        },
    })
}

#[async_trait]
impl RecordStore for NotionStore {
    async fn create_record(&self, payload: &ExpensePayload) -> Result<RecordId, StoreError> {
        let body = json!({
            "parent": { "database_id": self.database_id },
            "properties": expense_properties(payload),
        });
        let response = self
            .client
            .send(self.client.client.post(self.client.url("pages")).json(&body))
            .await?;
        let page: CreatedPage =
            serde_json::from_value(response).map_err(|e| StoreError::Malformed(e.to_string()))?;

        Ok(RecordId(page.id))
    }

    async fn query_latest_by_date(&self, limit: usize) -> Result<Vec<ExpenseRecord>, StoreError> {
        let body = json!({
            "sorts": [{ "property": PROPERTY_DATE, "direction": "descending" }],
            "page_size": limit,
        });
        let path = format!("databases/{}/query", self.database_id);
        let response = self
            .client
            .send(self.client.client.post(self.client.url(&path)).json(&body))
            .await?;
        let list: PageList =
            serde_json::from_value(response).map_err(|e| StoreError::Malformed(e.to_string()))?;

        list.results.iter().map(parse_record).collect()
    }

    async fn update_record(
        &self,
        id: &RecordId,
        payload: &ExpensePayload,
    ) -> Result<(), StoreError> {
        let body = json!({ "properties": expense_properties(payload) });
        let path = format!("pages/{id}");
        self.client
            .send(self.client.client.patch(self.client.url(&path)).json(&body))
            .await?;
        Ok(())
    }
}
