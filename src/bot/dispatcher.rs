use std::sync::Arc;

use teloxide::{
    dispatching::UpdateFilterExt,
    error_handlers::LoggingErrorHandler,
    prelude::*,
    utils::command::BotCommands,
};

use super::{agent::ExpenseAgent, constants::messages::NO_TEXT_MESSAGE, utils::HandlerResult};

#[derive(BotCommands, Clone, Copy, Debug, PartialEq, Eq)]
#[command(
    rename_rule = "snake_case",
    description = "These commands are supported:"
)]
pub enum Command {
    #[command(description = "Show the welcome message")]
    Start,
    #[command(description = "Show this help message")]
    Help,
    #[command(description = "Add a new expense")]
    AddExpense,
    #[command(description = "Edit the most recent expense")]
    EditLastExpense,
    #[command(description = "Cancel the current operation")]
    Cancel,
}

pub async fn run_dispatcher(bot: Bot, agent: Arc<ExpenseAgent>) {
    let handler = Update::filter_message().endpoint(handle_message);

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![agent])
        .default_handler(|upd| async move {
            log::debug!("Unhandled update: {:?}", upd.id);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
}

// Every message goes through the agent; anything without text never touches conversation state.
// Failures are reported once, by the dispatcher's error handler.
async fn handle_message(agent: Arc<ExpenseAgent>, msg: Message) -> HandlerResult {
    match msg.text() {
        Some(text) => agent.handle_message(msg.chat.id, text).await,
        None => agent.reply(msg.chat.id, NO_TEXT_MESSAGE, None).await,
    }
}
