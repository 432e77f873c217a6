use crate::bot::{
    constants::commands::{
        COMMAND_ADD_EXPENSE, COMMAND_CANCEL, COMMAND_EDIT_LAST_EXPENSE, COMMAND_HELP,
    },
    expense::{Category, ExpensePayload},
    transport::Keyboard,
};

use super::amounts::display_amount;

// Displays a single expense in a user-friendly format.
pub fn display_expense(expense: &ExpensePayload) -> String {
    format!(
        "Name: {}\nAmount: {}\nDate: {}\nCategory: {}\nComment: {}",
        expense.name,
        display_amount(expense.amount),
        expense.date.format("%Y-%m-%d"),
        expense.category,
        if expense.comment.is_empty() {
            "-"
        } else {
            &expense.comment
        },
    )
}

// Make a keyboard, button menu.
pub fn make_keyboard(options: Vec<&str>, columns: Option<usize>) -> Keyboard {
    let mut rows: Vec<Vec<String>> = Vec::new();
    if let Some(col) = columns {
        for chunk in options.chunks(col.max(1)) {
            rows.push(chunk.iter().map(|option| option.to_string()).collect());
        }
    } else {
        for option in options {
            rows.push(vec![option.to_string()]);
        }
    }

    Keyboard::new(rows)
}

// Make the idle-state menu. Editing is only offered when there is something to edit.
pub fn make_keyboard_menu(has_records: bool) -> Keyboard {
    let mut buttons = vec![COMMAND_HELP, COMMAND_ADD_EXPENSE];
    if has_records {
        buttons.push(COMMAND_EDIT_LAST_EXPENSE);
    }
    make_keyboard(buttons, Some(2))
}

// Make the cancel-only keyboard shown during a flow.
pub fn make_keyboard_cancel() -> Keyboard {
    make_keyboard(vec![COMMAND_CANCEL], None)
}

// Make category selection keyboard, with cancel on the last row.
pub fn make_keyboard_category_selection() -> Keyboard {
    let mut buttons: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
    buttons.push(COMMAND_CANCEL);
    make_keyboard(buttons, Some(2))
}
