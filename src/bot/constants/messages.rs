// Error messages
pub const NO_TEXT_MESSAGE: &str =
    "❓ I'm having a bit of trouble understanding that! Please reply to me in text!";
pub const SAVE_FAILED_MESSAGE: &str =
    "Oops! I could not save the expense. Please try again!\n\nSend your last answer again to retry, or /cancel to discard it.";
pub const LOAD_FAILED_MESSAGE: &str =
    "Oops! I could not reach the expense table right now. Please try again later!";
pub const CORRUPT_EXPENSE_MESSAGE: &str =
    "Oops! Something went wrong with this expense and nothing was saved. Please start again.";
pub const NO_RECORDS_MESSAGE: &str = "There are no expenses to edit yet.";
pub const NOT_COLLECTING_MESSAGE: &str =
    "I'm not collecting any expense right now. Pick one of the commands below!";

// Validation messages
pub const INVALID_NAME_MESSAGE: &str =
    "Invalid input. Name should only contain alphanumeric characters and spaces.";
pub const INVALID_AMOUNT_MESSAGE: &str = "Invalid input. Amount should be a number.";
pub const INVALID_DATE_MESSAGE: &str =
    "Invalid date format. Please enter a date in the format YYYY-MM-DD.";
pub const INVALID_CATEGORY_MESSAGE: &str =
    "Invalid input. Category should be one of the options below.";
pub const INVALID_COMMENT_MESSAGE: &str =
    "Invalid input. Comment should only contain alphanumeric characters and spaces.";
pub const INVALID_TEXT_MESSAGE: &str = "Invalid input. Please send some text.";

// Add prompts
pub const ADD_NAME_PROMPT: &str = "What's the name of the expense?";
pub const ADD_AMOUNT_PROMPT: &str = "How much was the expense?";
pub const ADD_DATE_PROMPT: &str = "What was the date of the expense? (YYYY-MM-DD)";
pub const ADD_CATEGORY_PROMPT: &str = "What category does the expense belong to?";
pub const ADD_COMMENT_PROMPT: &str = "Do you have any comments about this expense?";

// Edit prompts
pub const EDIT_NAME_PROMPT: &str = "What's the new name of the expense?";
pub const EDIT_AMOUNT_PROMPT: &str = "What's the new amount?";
pub const EDIT_COMMENT_PROMPT: &str = "What's the new comment?";
pub const EDIT_DATE_PROMPT: &str = "What's the new date? (YYYY-MM-DD)";
pub const EDIT_CATEGORY_PROMPT: &str = "What's the new category?";

// Action messages
pub const WELCOME_MESSAGE: &str = "Welcome to the Notion Expense Tracker bot!";
pub const CANCEL_MESSAGE: &str = "Command cancelled. Here are the available commands:";
pub const EXPENSE_ADDED_MESSAGE: &str = "Expense added successfully!";
pub const EXPENSE_UPDATED_MESSAGE: &str = "Expense updated successfully!";
pub const EDIT_HEADER_MESSAGE: &str = "Here is your latest expense:\n\n";
pub const BOT_STOPPED_MESSAGE: &str = "Bot stopped";
