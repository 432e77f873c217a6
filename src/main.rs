use std::sync::Arc;

use expense_bot::bot::{
    run_dispatcher, AgentSettings, BotError, Config, ConfigError, ExpenseAgent, NotionClient,
    NotionStore, TableRef, TelegramTransport,
};
use teloxide::prelude::*;

async fn run(bot: Bot, config: Config) -> Result<(), BotError> {
    let client = NotionClient::new(&config.notion_api_key, config.notion_timeout)?;
    let database_id = match config.table {
        TableRef::Id(id) => id,
        TableRef::Name(name) => match client.find_database_id(&name).await? {
            Some(id) => {
                log::info!("Using Notion database {} for table {:?}", id, name);
                id
            }
            None => return Err(ConfigError::UnknownTable(name).into()),
        },
    };

    let me = bot.get_me().await?;
    let agent = Arc::new(ExpenseAgent::new(
        Arc::new(TelegramTransport::new(bot.clone())),
        Arc::new(NotionStore::new(client, database_id)),
        AgentSettings {
            bot_username: me.username().to_string(),
            date_mode: config.date_mode,
            time_zone: config.time_zone,
        },
    ));

    if let Some(admin) = config.admin_chat_id {
        if let Err(err) = agent.notify_startup(admin).await {
            log::error!("Failed to notify operator on startup: {}", err);
        }
    }

    log::info!("Starting expense bot as @{}", me.username());
    run_dispatcher(bot, agent.clone()).await;

    if let Some(admin) = config.admin_chat_id {
        if let Err(err) = agent.notify_shutdown(admin).await {
            log::error!("Failed to notify operator on shutdown: {}", err);
        }
    }

    Ok(())
}

#[tokio::main]
pub async fn main() {
    dotenv::dotenv().ok();
    pretty_env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            log::error!("Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    let bot = teloxide::Bot::from_env();

    if let Err(err) = run(bot, config).await {
        log::error!("Expense bot stopped with an error: {}", err);
        std::process::exit(1);
    }
}
