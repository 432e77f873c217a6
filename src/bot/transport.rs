/* Outbound message delivery.
 * The conversation core only needs to send text with an optional reply keyboard;
 * Telegram is one implementation of that capability.
 */

use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{ChatId, KeyboardButton, KeyboardMarkup},
    Bot,
};

use super::utils::HandlerResult;

/// Reply keyboard, as rows of button labels.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Keyboard {
    rows: Vec<Vec<String>>,
}

impl Keyboard {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn contains(&self, label: &str) -> bool {
        self.rows.iter().flatten().any(|button| button == label)
    }
}

#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Option<Keyboard>,
    ) -> HandlerResult;
}

pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send_message(
        &self,
        chat_id: ChatId,
        text: String,
        keyboard: Option<Keyboard>,
    ) -> HandlerResult {
        let request = self.bot.send_message(chat_id, text);
        match keyboard {
            Some(keyboard) => {
                let buttons = keyboard
                    .rows
                    .into_iter()
                    .map(|row| row.into_iter().map(KeyboardButton::new).collect::<Vec<_>>());
                request
                    .reply_markup(KeyboardMarkup::new(buttons).resize_keyboard(true))
                    .await?;
            }
            None => {
                request.await?;
            }
        }
        Ok(())
    }
}
