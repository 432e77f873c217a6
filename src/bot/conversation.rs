use std::{collections::BTreeMap, fmt, sync::Arc};

use teloxide::{
    dispatching::dialogue::{Dialogue, InMemStorage},
    types::ChatId,
};

use super::{expense::RecordId, utils::BotError};

/* Conversation steps.
 * Idle is the initial state and the only state reached by /cancel or a completed flow.
 */
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Step {
    #[default]
    Idle,
    AddName,
    AddAmount,
    AddDate,
    AddCategory,
    AddComment,
    EditName,
    EditAmount,
    EditComment,
    EditDate,
    EditCategory,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Add,
    Edit,
}

impl Step {
    pub fn flow(self) -> Option<Flow> {
        match self {
            Step::Idle => None,
            Step::AddName
            | Step::AddAmount
            | Step::AddDate
            | Step::AddCategory
            | Step::AddComment => Some(Flow::Add),
            Step::EditName
            | Step::EditAmount
            | Step::EditComment
            | Step::EditDate
            | Step::EditCategory => Some(Flow::Edit),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Amount,
    Date,
    Category,
    Comment,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Amount => "amount",
            Field::Date => "date",
            Field::Category => "category",
            Field::Comment => "comment",
        })
    }
}

pub type Fields = BTreeMap<Field, String>;

/// Per-chat state: where the user is in a flow and what they have answered so far.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Conversation {
    pub step: Step,
    pub fields: Fields,
    pub cancel_affordance_active: bool,
    pub editing_record_id: Option<RecordId>,
}

pub type ConversationDialogue = Dialogue<Conversation, InMemStorage<Conversation>>;

/* In-memory conversation store, one dialogue per chat.
 * Entries are created on first access and live for the lifetime of the process.
 */
#[derive(Clone)]
pub struct ConversationStore {
    storage: Arc<InMemStorage<Conversation>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self {
            storage: InMemStorage::new(),
        }
    }

    fn dialogue(&self, chat_id: ChatId) -> ConversationDialogue {
        Dialogue::new(self.storage.clone(), chat_id)
    }

    pub async fn get(&self, chat_id: ChatId) -> Result<Conversation, BotError> {
        Ok(self.dialogue(chat_id).get_or_default().await?)
    }

    pub async fn put(&self, chat_id: ChatId, conversation: Conversation) -> Result<(), BotError> {
        self.dialogue(chat_id).update(conversation).await?;
        Ok(())
    }

    // Back to Idle, with no fields, no record under edit and no cancel affordance.
    pub async fn reset(&self, chat_id: ChatId) -> Result<(), BotError> {
        self.put(chat_id, Conversation::default()).await
    }

    pub async fn set_field(
        &self,
        chat_id: ChatId,
        field: Field,
        value: String,
    ) -> Result<(), BotError> {
        let mut conversation = self.get(chat_id).await?;
        conversation.fields.insert(field, value);
        self.put(chat_id, conversation).await
    }

    // Moving to Idle always goes through reset, so an idle conversation never holds fields.
    pub async fn set_step(&self, chat_id: ChatId, step: Step) -> Result<(), BotError> {
        if step == Step::Idle {
            return self.reset(chat_id).await;
        }

        let mut conversation = self.get(chat_id).await?;
        conversation.step = step;
        self.put(chat_id, conversation).await
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_creates_idle_conversation() {
        let store = ConversationStore::new();
        let conversation = store.get(ChatId(7)).await.unwrap();
        assert_eq!(conversation, Conversation::default());
        assert_eq!(conversation.step, Step::Idle);
    }

    #[tokio::test]
    async fn set_field_and_step_mutate_only_their_chat() {
        let store = ConversationStore::new();
        store.set_step(ChatId(1), Step::AddAmount).await.unwrap();
        store
            .set_field(ChatId(1), Field::Name, "Coffee".to_string())
            .await
            .unwrap();

        let first = store.get(ChatId(1)).await.unwrap();
        assert_eq!(first.step, Step::AddAmount);
        assert_eq!(first.fields.get(&Field::Name).map(String::as_str), Some("Coffee"));

        let second = store.get(ChatId(2)).await.unwrap();
        assert_eq!(second, Conversation::default());
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let store = ConversationStore::new();
        store
            .put(
                ChatId(1),
                Conversation {
                    step: Step::EditAmount,
                    fields: Fields::from([(Field::Name, "Rent".to_string())]),
                    cancel_affordance_active: true,
                    editing_record_id: Some(RecordId("page-1".to_string())),
                },
            )
            .await
            .unwrap();

        store.reset(ChatId(1)).await.unwrap();
        assert_eq!(store.get(ChatId(1)).await.unwrap(), Conversation::default());
    }

    #[tokio::test]
    async fn stepping_to_idle_drops_fields() {
        let store = ConversationStore::new();
        store.set_step(ChatId(1), Step::AddDate).await.unwrap();
        store
            .set_field(ChatId(1), Field::Amount, "3".to_string())
            .await
            .unwrap();

        store.set_step(ChatId(1), Step::Idle).await.unwrap();
        let conversation = store.get(ChatId(1)).await.unwrap();
        assert_eq!(conversation.step, Step::Idle);
        assert!(conversation.fields.is_empty());
    }

    #[test]
    fn steps_belong_to_their_flow() {
        assert_eq!(Step::Idle.flow(), None);
        assert_eq!(Step::AddComment.flow(), Some(Flow::Add));
        assert_eq!(Step::EditDate.flow(), Some(Flow::Edit));
    }
}
