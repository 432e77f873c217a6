pub const COMMAND_HELP: &str = "/help";
pub const COMMAND_ADD_EXPENSE: &str = "/add_expense";
pub const COMMAND_EDIT_LAST_EXPENSE: &str = "/edit_last_expense";
pub const COMMAND_CANCEL: &str = "/cancel";
