use teloxide::types::ChatId;

use crate::bot::{
    agent::ExpenseAgent,
    assembler::{assemble, disassemble, save, SaveTarget},
    constants::messages::{
        CORRUPT_EXPENSE_MESSAGE, EDIT_HEADER_MESSAGE, EXPENSE_ADDED_MESSAGE,
        EXPENSE_UPDATED_MESSAGE, LOAD_FAILED_MESSAGE, NOT_COLLECTING_MESSAGE, NO_RECORDS_MESSAGE,
        SAVE_FAILED_MESSAGE,
    },
    conversation::{Conversation, Flow, Step},
    flow::{DateMode, Next, StepDefinition, StepEffect, Validator},
    transport::Keyboard,
    utils::{
        format::{
            display_expense, make_keyboard_cancel, make_keyboard_category_selection,
            make_keyboard_menu,
        },
        BotError, HandlerResult,
    },
};

// Keyboard for a step prompt. The cancel affordance only shows while a flow is active.
fn step_keyboard(definition: &StepDefinition, conversation: &Conversation) -> Option<Keyboard> {
    if !(conversation.cancel_affordance_active && definition.shows_cancel_affordance) {
        return None;
    }

    match definition.validator {
        Validator::Category => Some(make_keyboard_category_selection()),
        _ => Some(make_keyboard_cancel()),
    }
}

fn step_definition(agent: &ExpenseAgent, step: Step) -> Result<&StepDefinition, BotError> {
    agent
        .flows
        .definition(step)
        .ok_or_else(|| BotError::InvariantViolation(format!("no definition for step {step:?}")))
}

/* Runs the entry effect of a step against a local copy of the conversation.
 * Returns false if the step cannot be entered; the user has been told why and the
 * stored conversation is untouched.
 */
async fn apply_on_enter(
    agent: &ExpenseAgent,
    chat_id: ChatId,
    definition: &StepDefinition,
    conversation: &mut Conversation,
) -> Result<bool, BotError> {
    match definition.on_enter {
        None => Ok(true),
        Some(StepEffect::SeedFromLatestRecord) => {
            let record = match agent.store.latest_record().await {
                Ok(Some(record)) => record,
                Ok(None) => {
                    agent.reply(chat_id, NO_RECORDS_MESSAGE, None).await?;
                    return Ok(false);
                }
                Err(err) => {
                    log::error!("Chat {} failed to load the latest expense: {}", chat_id, err);
                    agent.reply(chat_id, LOAD_FAILED_MESSAGE, None).await?;
                    return Ok(false);
                }
            };

            // Answers already given in this flow win over stored values.
            for (field, value) in disassemble(&record.payload) {
                conversation.fields.entry(field).or_insert(value);
            }
            conversation.editing_record_id = Some(record.id);

            agent
                .reply(
                    chat_id,
                    format!("{EDIT_HEADER_MESSAGE}{}", display_expense(&record.payload)),
                    None,
                )
                .await?;
            Ok(true)
        }
    }
}

// Starts a flow from scratch; whatever was in progress is replaced.
async fn enter_flow(agent: &ExpenseAgent, chat_id: ChatId, flow: Flow) -> HandlerResult {
    let step = agent.flows.entry(flow);
    let definition = step_definition(agent, step)?;

    let mut conversation = Conversation {
        step,
        cancel_affordance_active: true,
        ..Conversation::default()
    };
    if !apply_on_enter(agent, chat_id, definition, &mut conversation).await? {
        return Ok(());
    }

    let keyboard = step_keyboard(definition, &conversation);
    agent.conversations.put(chat_id, conversation).await?;
    log::info!("Chat {} started the {:?} flow", chat_id, flow);

    agent.reply(chat_id, definition.prompt, keyboard).await
}

// Moves an active flow on to `step` and asks its question.
async fn enter_step(agent: &ExpenseAgent, chat_id: ChatId, step: Step) -> HandlerResult {
    let definition = step_definition(agent, step)?;

    let conversation = match definition.on_enter {
        None => {
            agent.conversations.set_step(chat_id, step).await?;
            agent.conversations.get(chat_id).await?
        }
        Some(_) => {
            let mut conversation = agent.conversations.get(chat_id).await?;
            conversation.step = step;
            if !apply_on_enter(agent, chat_id, definition, &mut conversation).await? {
                return Ok(());
            }
            agent
                .conversations
                .put(chat_id, conversation.clone())
                .await?;
            conversation
        }
    };

    agent
        .reply(
            chat_id,
            definition.prompt,
            step_keyboard(definition, &conversation),
        )
        .await
}

/* Add expense command.
 * Restarts the add flow, even in the middle of another flow.
 */
pub async fn action_add_expense(agent: &ExpenseAgent, chat_id: ChatId) -> HandlerResult {
    enter_flow(agent, chat_id, Flow::Add).await
}

/* Edit last expense command.
 * Loads the most recent expense and walks through its fields. Nothing changes if
 * there is no expense to edit.
 */
pub async fn action_edit_last_expense(agent: &ExpenseAgent, chat_id: ChatId) -> HandlerResult {
    enter_flow(agent, chat_id, Flow::Edit).await
}

/* Step input.
 * Validates the answer to the current step. Invalid answers are re-asked without
 * touching state; valid ones are stored and the flow moves on.
 */
pub async fn handle_step(agent: &ExpenseAgent, chat_id: ChatId, text: &str) -> HandlerResult {
    let conversation = agent.conversations.get(chat_id).await?;
    let Some(definition) = agent.flows.definition(conversation.step) else {
        let menu = agent.idle_menu().await;
        return agent
            .reply(chat_id, NOT_COLLECTING_MESSAGE, Some(menu))
            .await;
    };

    let value = match definition.validator.validate(text) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("Chat {} sent invalid input at {:?}", chat_id, definition.step);
            return agent
                .reply(
                    chat_id,
                    format!("{err}\n\n{}", definition.prompt),
                    step_keyboard(definition, &conversation),
                )
                .await;
        }
    };

    agent
        .conversations
        .set_field(chat_id, definition.field, value)
        .await?;

    match definition.next {
        Next::Step(next) => enter_step(agent, chat_id, next).await,
        Next::Complete => complete_flow(agent, chat_id).await,
    }
}

// Drops a flow whose collected data cannot be turned into an expense.
async fn abort_flow(agent: &ExpenseAgent, chat_id: ChatId, reason: String) -> HandlerResult {
    log::error!("Chat {} aborted its flow: {}", chat_id, reason);
    agent.conversations.reset(chat_id).await?;

    let menu = agent.idle_menu().await;
    agent
        .reply(chat_id, CORRUPT_EXPENSE_MESSAGE, Some(menu))
        .await
}

/* Flow completion.
 * Saves the expense, then returns to Idle. If the store call fails the conversation
 * is kept as it is, so re-sending the last answer retries the save.
 */
async fn complete_flow(agent: &ExpenseAgent, chat_id: ChatId) -> HandlerResult {
    let conversation = agent.conversations.get(chat_id).await?;
    let flow = conversation.step.flow();

    let target = match (flow, &conversation.editing_record_id) {
        (Some(Flow::Add), _) => SaveTarget::Create,
        (Some(Flow::Edit), Some(id)) => SaveTarget::Update(id.clone()),
        (Some(Flow::Edit), None) => {
            return abort_flow(agent, chat_id, "edit without a record".to_string()).await;
        }
        (None, _) => {
            return abort_flow(agent, chat_id, "completed while idle".to_string()).await;
        }
    };

    let stamped_date = match (flow, agent.date_mode()) {
        (Some(Flow::Add), DateMode::Today) => Some(agent.today()),
        _ => None,
    };
    let payload = match assemble(&conversation.fields, stamped_date) {
        Ok(payload) => payload,
        Err(err) => return abort_flow(agent, chat_id, err.to_string()).await,
    };

    match save(agent.store.as_ref(), &target, &payload).await {
        Ok(id) => {
            log::info!("Chat {} saved expense {}", chat_id, id);
            agent.conversations.reset(chat_id).await?;

            let message = match target {
                SaveTarget::Create => EXPENSE_ADDED_MESSAGE,
                SaveTarget::Update(_) => EXPENSE_UPDATED_MESSAGE,
            };
            agent
                .reply(chat_id, message, Some(make_keyboard_menu(true)))
                .await
        }
        Err(err) => {
            log::error!("Chat {} failed to save expense: {}", chat_id, err);
            let keyboard = agent
                .flows
                .definition(conversation.step)
                .and_then(|definition| step_keyboard(definition, &conversation));
            agent.reply(chat_id, SAVE_FAILED_MESSAGE, keyboard).await
        }
    }
}
