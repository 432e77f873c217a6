use std::{fmt, str::FromStr};

use chrono::NaiveDate;

/* Expense categories.
 * The set is fixed; user input must match a category name exactly.
 */
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Food,
    Transport,
    Entertainment,
    Rent,
    Internet,
    Education,
    Utilities,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Food,
        Category::Transport,
        Category::Entertainment,
        Category::Rent,
        Category::Internet,
        Category::Education,
        Category::Utilities,
        Category::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Entertainment => "Entertainment",
            Category::Rent => "Rent",
            Category::Internet => "Internet",
            Category::Education => "Education",
            Category::Utilities => "Utilities",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    // Case-sensitive on purpose: "food" is not "Food".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Opaque handle of a record held by the record store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordId(pub String);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Typed expense properties, as written to and read from the record store.
#[derive(Clone, Debug, PartialEq)]
pub struct ExpensePayload {
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub category: Category,
    pub comment: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExpenseRecord {
    pub id: RecordId,
    pub payload: ExpensePayload,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_is_exact() {
        assert_eq!("Food".parse::<Category>(), Ok(Category::Food));
        assert_eq!("Utilities".parse::<Category>(), Ok(Category::Utilities));
        assert!("food".parse::<Category>().is_err());
        assert!("Snacks".parse::<Category>().is_err());
        assert!(" Food".parse::<Category>().is_err());
    }
}
