use std::{env, time::Duration};

use chrono_tz::Tz;
use teloxide::types::ChatId;

use super::flow::DateMode;

const NOTION_API_KEY: &str = "NOTION_API_KEY";
const NOTION_TABLE_ID: &str = "NOTION_TABLE_ID";
const NOTION_TABLE_NAME: &str = "NOTION_TABLE_NAME";
const NOTION_TIMEOUT_SECS: &str = "NOTION_TIMEOUT_SECS";
const TELEGRAM_ADMIN_ID: &str = "TELEGRAM_ADMIN_ID";
const EXPENSE_DATE_MODE: &str = "EXPENSE_DATE_MODE";
const EXPENSE_TIME_ZONE: &str = "EXPENSE_TIME_ZONE";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("either NOTION_TABLE_ID or NOTION_TABLE_NAME must be set")]
    MissingTable,
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
    #[error("no Notion database named {0:?}")]
    UnknownTable(String),
}

/// How the expense table is identified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TableRef {
    Id(String),
    Name(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub notion_api_key: String,
    pub table: TableRef,
    pub notion_timeout: Duration,
    pub admin_chat_id: Option<ChatId>,
    pub date_mode: DateMode,
    pub time_zone: Tz,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Reads settings through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let notion_api_key = get(NOTION_API_KEY).ok_or(ConfigError::Missing(NOTION_API_KEY))?;

        let table = match (get(NOTION_TABLE_ID), get(NOTION_TABLE_NAME)) {
            (Some(id), _) => TableRef::Id(id),
            (None, Some(name)) => TableRef::Name(name),
            (None, None) => return Err(ConfigError::MissingTable),
        };

        let notion_timeout = match get(NOTION_TIMEOUT_SECS) {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    key: NOTION_TIMEOUT_SECS,
                    value,
                })?,
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let admin_chat_id = match get(TELEGRAM_ADMIN_ID) {
            Some(value) => Some(ChatId(value.trim().parse::<i64>().map_err(|_| {
                ConfigError::Invalid {
                    key: TELEGRAM_ADMIN_ID,
                    value: value.clone(),
                }
            })?)),
            None => None,
        };

        let date_mode = match get(EXPENSE_DATE_MODE) {
            Some(value) => value
                .parse::<DateMode>()
                .map_err(|_| ConfigError::Invalid {
                    key: EXPENSE_DATE_MODE,
                    value: value.clone(),
                })?,
            None => DateMode::default(),
        };

        let time_zone = match get(EXPENSE_TIME_ZONE) {
            Some(value) => value.trim().parse::<Tz>().map_err(|_| ConfigError::Invalid {
                key: EXPENSE_TIME_ZONE,
                value: value.clone(),
            })?,
            None => Tz::UTC,
        };

        Ok(Self {
            notion_api_key,
            table,
            notion_timeout,
            admin_chat_id,
            date_mode,
            time_zone,
        })
    }
}
