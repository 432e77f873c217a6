/* Record assembly.
 * Turns the string fields collected by a flow into a typed expense and writes it to the store.
 */

use chrono::NaiveDate;

use super::{
    conversation::{Field, Fields},
    expense::{Category, ExpensePayload, RecordId},
    flow::DATE_FORMAT,
    store::{RecordStore, StoreError},
    utils::amounts::{display_amount, parse_amount},
};

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("missing field: {0}")]
    MissingField(Field),
    #[error("amount {0:?} is not a nonnegative number")]
    InvalidAmount(String),
    #[error("date {0:?} is not a calendar date")]
    InvalidDate(String),
    #[error("category {0:?} is not a known category")]
    InvalidCategory(String),
}

/// Where a finished expense goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveTarget {
    Create,
    Update(RecordId),
}

fn required(fields: &Fields, field: Field) -> Result<&str, AssemblyError> {
    fields
        .get(&field)
        .map(String::as_str)
        .ok_or(AssemblyError::MissingField(field))
}

// Builds the store payload. `stamped_date` stands in for a date the flow did not ask for.
pub fn assemble(
    fields: &Fields,
    stamped_date: Option<NaiveDate>,
) -> Result<ExpensePayload, AssemblyError> {
    let name = required(fields, Field::Name)?;

    let amount_text = required(fields, Field::Amount)?;
    let amount = parse_amount(amount_text)
        .ok_or_else(|| AssemblyError::InvalidAmount(amount_text.to_string()))?;

    let date = match (fields.get(&Field::Date), stamped_date) {
        (Some(text), _) => NaiveDate::parse_from_str(text, DATE_FORMAT)
            .map_err(|_| AssemblyError::InvalidDate(text.clone()))?,
        (None, Some(date)) => date,
        (None, None) => return Err(AssemblyError::MissingField(Field::Date)),
    };

    let category_text = required(fields, Field::Category)?;
    let category = category_text
        .parse::<Category>()
        .map_err(|_| AssemblyError::InvalidCategory(category_text.to_string()))?;

    let comment = fields.get(&Field::Comment).cloned().unwrap_or_default();

    Ok(ExpensePayload {
        name: name.to_string(),
        amount,
        date,
        category,
        comment,
    })
}

// Inverse of assemble: the fields that would produce `payload` again.
pub fn disassemble(payload: &ExpensePayload) -> Fields {
    Fields::from([
        (Field::Name, payload.name.clone()),
        (Field::Amount, display_amount(payload.amount)),
        (Field::Date, payload.date.format(DATE_FORMAT).to_string()),
        (Field::Category, payload.category.as_str().to_string()),
        (Field::Comment, payload.comment.clone()),
    ])
}

pub async fn save(
    store: &dyn RecordStore,
    target: &SaveTarget,
    payload: &ExpensePayload,
) -> Result<RecordId, StoreError> {
    match target {
        SaveTarget::Create => store.create_record(payload).await,
        SaveTarget::Update(id) => {
            store.update_record(id, payload).await?;
            Ok(id.clone())
        }
    }
}
