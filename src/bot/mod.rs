pub use self::agent::{AgentSettings, ExpenseAgent};
pub use self::config::{Config, ConfigError, TableRef};
pub use self::dispatcher::{run_dispatcher, Command};
pub use self::flow::DateMode;
pub use self::store::{
    notion::{NotionClient, NotionStore},
    RecordStore, StoreError,
};
pub use self::transport::{Keyboard, MessageTransport, TelegramTransport};
pub use self::utils::{BotError, HandlerResult};

mod agent;
mod assembler;
mod config;
mod constants;
mod conversation;
mod dispatcher;
mod expense;
mod flow;
mod handlers;
mod store;
mod transport;
mod utils;

#[cfg(test)]
mod testing;
