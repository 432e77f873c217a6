use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use teloxide::{types::ChatId, utils::command::BotCommands};

use super::{
    constants::messages::BOT_STOPPED_MESSAGE,
    conversation::ConversationStore,
    dispatcher::Command,
    flow::{DateMode, FlowTable},
    handlers::{
        expense::{action_add_expense, action_edit_last_expense, handle_step},
        general::{action_cancel, action_help, action_start},
    },
    store::RecordStore,
    transport::{Keyboard, MessageTransport},
    utils::{format::make_keyboard_menu, HandlerResult},
};

#[derive(Clone, Debug, PartialEq)]
pub struct AgentSettings {
    pub bot_username: String,
    pub date_mode: DateMode,
    pub time_zone: Tz,
}

/* Conversational expense agent.
 * Owns the per-chat conversation state and talks to the outside world only through
 * the transport and record store it is given.
 */
pub struct ExpenseAgent {
    pub(crate) transport: Arc<dyn MessageTransport>,
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) conversations: ConversationStore,
    pub(crate) flows: FlowTable,
    bot_username: String,
    time_zone: Tz,
}

impl ExpenseAgent {
    pub fn new(
        transport: Arc<dyn MessageTransport>,
        store: Arc<dyn RecordStore>,
        settings: AgentSettings,
    ) -> Self {
        Self {
            transport,
            store,
            conversations: ConversationStore::new(),
            flows: FlowTable::new(settings.date_mode),
            bot_username: settings.bot_username,
            time_zone: settings.time_zone,
        }
    }

    /// Handles one inbound text message. Commands win over step input, whatever the step.
    pub async fn handle_message(&self, chat_id: ChatId, text: &str) -> HandlerResult {
        match self.parse_command(text) {
            Some(Command::Start) => action_start(self, chat_id).await,
            Some(Command::Help) => action_help(self, chat_id).await,
            Some(Command::AddExpense) => action_add_expense(self, chat_id).await,
            Some(Command::EditLastExpense) => action_edit_last_expense(self, chat_id).await,
            Some(Command::Cancel) => action_cancel(self, chat_id).await,
            None => handle_step(self, chat_id, text).await,
        }
    }

    // Only the leading token decides, so "/cancel now" still cancels.
    fn parse_command(&self, text: &str) -> Option<Command> {
        let head = text.split_whitespace().next()?;
        if !head.starts_with('/') {
            return None;
        }
        Command::parse(head, &self.bot_username).ok()
    }

    pub async fn reply(
        &self,
        chat_id: ChatId,
        text: impl Into<String>,
        keyboard: Option<Keyboard>,
    ) -> HandlerResult {
        self.transport
            .send_message(chat_id, text.into(), keyboard)
            .await
    }

    // Idle menu. A failed lookup only hides the edit option.
    pub async fn idle_menu(&self) -> Keyboard {
        let has_records = match self.store.latest_record().await {
            Ok(latest) => latest.is_some(),
            Err(err) => {
                log::error!("Failed to check for existing expenses: {}", err);
                false
            }
        };
        make_keyboard_menu(has_records)
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.time_zone).date_naive()
    }

    pub fn date_mode(&self) -> DateMode {
        self.flows.date_mode()
    }

    // Sends the idle menu to the operator chat when the bot comes up.
    pub async fn notify_startup(&self, chat_id: ChatId) -> HandlerResult {
        action_start(self, chat_id).await
    }

    pub async fn notify_shutdown(&self, chat_id: ChatId) -> HandlerResult {
        self.reply(chat_id, BOT_STOPPED_MESSAGE, None).await
    }
}
