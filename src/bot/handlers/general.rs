use teloxide::{types::ChatId, utils::command::BotCommands};

use crate::bot::{
    agent::ExpenseAgent,
    constants::messages::{CANCEL_MESSAGE, WELCOME_MESSAGE},
    dispatcher::Command,
    transport::Keyboard,
    utils::{format::make_keyboard_cancel, BotError, HandlerResult},
};

// Keyboard for replies to informational commands. A flow in progress keeps its cancel button.
async fn command_keyboard(agent: &ExpenseAgent, chat_id: ChatId) -> Result<Keyboard, BotError> {
    let conversation = agent.conversations.get(chat_id).await?;
    if conversation.cancel_affordance_active && conversation.step.flow().is_some() {
        return Ok(make_keyboard_cancel());
    }
    Ok(agent.idle_menu().await)
}

/* Start command.
 * Greets the user with the menu. Editing is offered only when an expense exists.
 */
pub async fn action_start(agent: &ExpenseAgent, chat_id: ChatId) -> HandlerResult {
    let menu = command_keyboard(agent, chat_id).await?;
    agent
        .reply(
            chat_id,
            format!("{WELCOME_MESSAGE}\n\n{}", Command::descriptions()),
            Some(menu),
        )
        .await
}

/* Help command.
 * Displays a list of commands available to the user.
 */
pub async fn action_help(agent: &ExpenseAgent, chat_id: ChatId) -> HandlerResult {
    let menu = command_keyboard(agent, chat_id).await?;
    agent
        .reply(chat_id, Command::descriptions().to_string(), Some(menu))
        .await
}

/* Cancel command.
 * Valid from any step, including Idle. Drops whatever was collected.
 */
pub async fn action_cancel(agent: &ExpenseAgent, chat_id: ChatId) -> HandlerResult {
    agent.conversations.reset(chat_id).await?;
    log::info!("Chat {} cancelled", chat_id);

    let menu = agent.idle_menu().await;
    agent.reply(chat_id, CANCEL_MESSAGE, Some(menu)).await
}
