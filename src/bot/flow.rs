/* Step definitions for the add and edit flows.
 * Each step names its prompt, its validator, the field it fills and the step after it.
 * The table is built once at startup from the configured date mode.
 */

use std::{collections::HashMap, str::FromStr};

use chrono::NaiveDate;
use regex::Regex;

use super::{
    constants::messages::{
        ADD_AMOUNT_PROMPT, ADD_CATEGORY_PROMPT, ADD_COMMENT_PROMPT, ADD_DATE_PROMPT,
        ADD_NAME_PROMPT, EDIT_AMOUNT_PROMPT, EDIT_CATEGORY_PROMPT, EDIT_COMMENT_PROMPT,
        EDIT_DATE_PROMPT, EDIT_NAME_PROMPT, INVALID_AMOUNT_MESSAGE, INVALID_CATEGORY_MESSAGE,
        INVALID_COMMENT_MESSAGE, INVALID_DATE_MESSAGE, INVALID_NAME_MESSAGE, INVALID_TEXT_MESSAGE,
    },
    conversation::{Field, Flow, Step},
    expense::Category,
    utils::amounts::parse_amount,
};

const ALPHANUMERIC_PATTERN: &str = r"^[a-zA-Z0-9\s]+$";
const AMOUNT_PATTERN: &str = r"^[0-9]+(\.[0-9]+)?$";
const DATE_PATTERN: &str = r"^[0-9]{4}-[0-9]{1,2}-[0-9]{1,2}$";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Whether the date is asked for, or stamped with the current date.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DateMode {
    #[default]
    Ask,
    Today,
}

impl FromStr for DateMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ask" => Ok(DateMode::Ask),
            "today" => Ok(DateMode::Today),
            other => Err(other.to_string()),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{}", INVALID_NAME_MESSAGE)]
    Name,
    #[error("{}", INVALID_AMOUNT_MESSAGE)]
    Amount,
    #[error("{}", INVALID_DATE_MESSAGE)]
    Date,
    #[error("{}", INVALID_CATEGORY_MESSAGE)]
    Category,
    #[error("{}", INVALID_COMMENT_MESSAGE)]
    Comment,
    #[error("{}", INVALID_TEXT_MESSAGE)]
    Text,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Validator {
    Name,
    Amount,
    Date,
    Category,
    Comment,
    FreeText,
}

// Checks a string against a pattern. A pattern that fails to compile matches nothing.
fn matches_pattern(pattern: &str, text: &str) -> bool {
    match Regex::new(pattern) {
        Ok(re) => re.is_match(text),
        Err(err) => {
            log::error!("Invalid validation pattern {}: {}", pattern, err);
            false
        }
    }
}

impl Validator {
    /// Checks the raw input and returns the value to store.
    pub fn validate(self, text: &str) -> Result<String, ValidationError> {
        let text = text.trim();
        match self {
            Validator::Name if matches_pattern(ALPHANUMERIC_PATTERN, text) => Ok(text.to_string()),
            Validator::Name => Err(ValidationError::Name),
            Validator::Comment if matches_pattern(ALPHANUMERIC_PATTERN, text) => {
                Ok(text.to_string())
            }
            Validator::Comment => Err(ValidationError::Comment),
            // The amount must also survive conversion to a finite number.
            Validator::Amount
                if matches_pattern(AMOUNT_PATTERN, text) && parse_amount(text).is_some() =>
            {
                Ok(text.to_string())
            }
            Validator::Amount => Err(ValidationError::Amount),
            Validator::Date if matches_pattern(DATE_PATTERN, text) => {
                NaiveDate::parse_from_str(text, DATE_FORMAT)
                    .map(|date| date.format(DATE_FORMAT).to_string())
                    .map_err(|_| ValidationError::Date)
            }
            Validator::Date => Err(ValidationError::Date),
            Validator::Category => text
                .parse::<Category>()
                .map(|category| category.as_str().to_string())
                .map_err(|_| ValidationError::Category),
            Validator::FreeText if !text.is_empty() => Ok(text.to_string()),
            Validator::FreeText => Err(ValidationError::Text),
        }
    }
}

/// Side effect run when a step is entered, before its prompt is sent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepEffect {
    SeedFromLatestRecord,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Next {
    Step(Step),
    Complete,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StepDefinition {
    pub step: Step,
    pub prompt: &'static str,
    pub validator: Validator,
    pub field: Field,
    pub next: Next,
    pub on_enter: Option<StepEffect>,
    pub shows_cancel_affordance: bool,
}

// Prompt, validator and field of a step, independent of its position in a flow.
fn step_template(step: Step) -> Option<(&'static str, Validator, Field)> {
    let template = match step {
        Step::Idle => return None,
        Step::AddName => (ADD_NAME_PROMPT, Validator::Name, Field::Name),
        Step::AddAmount => (ADD_AMOUNT_PROMPT, Validator::Amount, Field::Amount),
        Step::AddDate => (ADD_DATE_PROMPT, Validator::Date, Field::Date),
        Step::AddCategory => (ADD_CATEGORY_PROMPT, Validator::Category, Field::Category),
        Step::AddComment => (ADD_COMMENT_PROMPT, Validator::Comment, Field::Comment),
        Step::EditName => (EDIT_NAME_PROMPT, Validator::Name, Field::Name),
        Step::EditAmount => (EDIT_AMOUNT_PROMPT, Validator::Amount, Field::Amount),
        Step::EditComment => (EDIT_COMMENT_PROMPT, Validator::FreeText, Field::Comment),
        Step::EditDate => (EDIT_DATE_PROMPT, Validator::Date, Field::Date),
        Step::EditCategory => (EDIT_CATEGORY_PROMPT, Validator::Category, Field::Category),
    };
    Some(template)
}

fn flow_order(flow: Flow, date_mode: DateMode) -> Vec<Step> {
    let steps = match flow {
        Flow::Add => vec![
            Step::AddName,
            Step::AddAmount,
            Step::AddDate,
            Step::AddCategory,
            Step::AddComment,
        ],
        Flow::Edit => vec![
            Step::EditName,
            Step::EditAmount,
            Step::EditComment,
            Step::EditDate,
            Step::EditCategory,
        ],
    };

    match date_mode {
        DateMode::Ask => steps,
        DateMode::Today => steps
            .into_iter()
            .filter(|step| !matches!(step, Step::AddDate | Step::EditDate))
            .collect(),
    }
}

#[derive(Clone, Debug)]
pub struct FlowTable {
    date_mode: DateMode,
    steps: HashMap<Step, StepDefinition>,
}

impl FlowTable {
    pub fn new(date_mode: DateMode) -> Self {
        let mut steps = HashMap::new();
        for flow in [Flow::Add, Flow::Edit] {
            let order = flow_order(flow, date_mode);
            for (index, &step) in order.iter().enumerate() {
                let Some((prompt, validator, field)) = step_template(step) else {
                    continue;
                };
                let next = match order.get(index + 1) {
                    Some(&following) => Next::Step(following),
                    None => Next::Complete,
                };
                let on_enter = match (flow, index) {
                    (Flow::Edit, 0) => Some(StepEffect::SeedFromLatestRecord),
                    _ => None,
                };
                steps.insert(
                    step,
                    StepDefinition {
                        step,
                        prompt,
                        validator,
                        field,
                        next,
                        on_enter,
                        shows_cancel_affordance: true,
                    },
                );
            }
        }

        Self { date_mode, steps }
    }

    pub fn date_mode(&self) -> DateMode {
        self.date_mode
    }

    pub fn definition(&self, step: Step) -> Option<&StepDefinition> {
        self.steps.get(&step)
    }

    pub fn entry(&self, flow: Flow) -> Step {
        match flow {
            Flow::Add => Step::AddName,
            Flow::Edit => Step::EditName,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(table: &FlowTable, flow: Flow) -> Vec<Step> {
        let mut steps = vec![table.entry(flow)];
        while let Some(definition) = table.definition(*steps.last().unwrap()) {
            match definition.next {
                Next::Step(next) => steps.push(next),
                Next::Complete => break,
            }
        }
        steps
    }

    #[test]
    fn ask_mode_collects_date_explicitly() {
        let table = FlowTable::new(DateMode::Ask);
        assert_eq!(
            walk(&table, Flow::Add),
            vec![
                Step::AddName,
                Step::AddAmount,
                Step::AddDate,
                Step::AddCategory,
                Step::AddComment
            ]
        );
        assert_eq!(
            walk(&table, Flow::Edit),
            vec![
                Step::EditName,
                Step::EditAmount,
                Step::EditComment,
                Step::EditDate,
                Step::EditCategory
            ]
        );
    }

    #[test]
    fn today_mode_skips_date_steps() {
        let table = FlowTable::new(DateMode::Today);
        assert_eq!(
            walk(&table, Flow::Add),
            vec![
                Step::AddName,
                Step::AddAmount,
                Step::AddCategory,
                Step::AddComment
            ]
        );
        assert!(table.definition(Step::AddDate).is_none());
        assert!(table.definition(Step::EditDate).is_none());
        assert_eq!(table.date_mode(), DateMode::Today);
    }

    #[test]
    fn only_edit_entry_seeds_from_store() {
        let table = FlowTable::new(DateMode::Ask);
        assert_eq!(
            table.definition(Step::EditName).unwrap().on_enter,
            Some(StepEffect::SeedFromLatestRecord)
        );
        assert_eq!(table.definition(Step::AddName).unwrap().on_enter, None);
        assert_eq!(table.definition(Step::EditCategory).unwrap().on_enter, None);
        assert!(table.definition(Step::Idle).is_none());
    }

    #[test]
    fn name_validator_accepts_alphanumeric_and_spaces() {
        assert_eq!(
            Validator::Name.validate("  Coffee beans 2 "),
            Ok("Coffee beans 2".to_string())
        );
        assert_eq!(Validator::Name.validate("Café!"), Err(ValidationError::Name));
        assert_eq!(Validator::Name.validate("   "), Err(ValidationError::Name));
        assert_eq!(Validator::Name.validate("/cancel"), Err(ValidationError::Name));
    }

    #[test]
    fn amount_validator_rejects_negatives_and_garbage() {
        assert_eq!(Validator::Amount.validate("4.50"), Ok("4.50".to_string()));
        assert_eq!(Validator::Amount.validate(" 12 "), Ok("12".to_string()));
        assert_eq!(Validator::Amount.validate("-4"), Err(ValidationError::Amount));
        assert_eq!(Validator::Amount.validate("4."), Err(ValidationError::Amount));
        assert_eq!(Validator::Amount.validate("1e3"), Err(ValidationError::Amount));
        assert_eq!(Validator::Amount.validate("٣"), Err(ValidationError::Amount));
    }

    #[test]
    fn amount_validator_rejects_values_beyond_f64() {
        let huge = "9".repeat(400);
        assert_eq!(Validator::Amount.validate(&huge), Err(ValidationError::Amount));
        assert_eq!(
            Validator::Amount.validate("1000000"),
            Ok("1000000".to_string())
        );
    }

    #[test]
    fn date_validator_normalizes_to_iso() {
        assert_eq!(
            Validator::Date.validate("2024-03-01"),
            Ok("2024-03-01".to_string())
        );
        assert_eq!(Validator::Date.validate("2024-02-30"), Err(ValidationError::Date));
        assert_eq!(Validator::Date.validate("01/03/2024"), Err(ValidationError::Date));
        assert_eq!(Validator::Date.validate("2024-3-1"), Ok("2024-03-01".to_string()));
    }

    #[test]
    fn date_validator_rejects_signed_years() {
        assert_eq!(Validator::Date.validate("+2024-03-01"), Err(ValidationError::Date));
        assert_eq!(Validator::Date.validate("-2024-03-01"), Err(ValidationError::Date));
        assert_eq!(Validator::Date.validate("12024-03-01"), Err(ValidationError::Date));
    }

    #[test]
    fn category_validator_is_exact_and_case_sensitive() {
        assert_eq!(Validator::Category.validate("Food"), Ok("Food".to_string()));
        assert_eq!(
            Validator::Category.validate("Snacks"),
            Err(ValidationError::Category)
        );
        assert_eq!(
            Validator::Category.validate("food"),
            Err(ValidationError::Category)
        );
    }

    #[test]
    fn comment_validators_differ_between_flows() {
        assert_eq!(
            Validator::Comment.validate("with friends"),
            Ok("with friends".to_string())
        );
        assert_eq!(Validator::Comment.validate("50%"), Err(ValidationError::Comment));
        assert_eq!(Validator::FreeText.validate("50%"), Ok("50%".to_string()));
        assert_eq!(Validator::FreeText.validate(" "), Err(ValidationError::Text));
    }

    #[test]
    fn date_mode_parses_config_values() {
        assert_eq!("ask".parse::<DateMode>(), Ok(DateMode::Ask));
        assert_eq!("Today".parse::<DateMode>(), Ok(DateMode::Today));
        assert!("tomorrow".parse::<DateMode>().is_err());
    }
}
