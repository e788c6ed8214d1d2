//! The fixed set of labels used to classify expenses.

use std::{fmt::Display, str::FromStr};

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::Error;

/// The sentinel label the filter controls use to mean "no category filter".
pub const ALL_CATEGORIES_LABEL: &str = "All Categories";

/// A category classifying what an expense was for.
///
/// The set of categories is fixed. Free-form categories are deliberately not
/// supported so that grouping and filtering always operate on a known,
/// closed set of labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Food,
    Transportation,
    Entertainment,
    Education,
    Housing,
    Utilities,
    Shopping,
    Health,
    Other,
}

impl Category {
    /// Every category, in the order they are shown in forms and filters.
    pub const ALL: [Category; 9] = [
        Category::Food,
        Category::Transportation,
        Category::Entertainment,
        Category::Education,
        Category::Housing,
        Category::Utilities,
        Category::Shopping,
        Category::Health,
        Category::Other,
    ];

    /// The display label for the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Food => "Food",
            Category::Transportation => "Transportation",
            Category::Entertainment => "Entertainment",
            Category::Education => "Education",
            Category::Housing => "Housing",
            Category::Utilities => "Utilities",
            Category::Shopping => "Shopping",
            Category::Health => "Health",
            Category::Other => "Other",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::InvalidCategory(s.to_owned()))
    }
}

impl ToSql for Category {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for Category {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let text = value.as_str()?;

        text.parse()
            .map_err(|_| FromSqlError::Other(format!("unknown category {text:?}").into()))
    }
}

#[cfg(test)]
mod category_tests {
    use super::{ALL_CATEGORIES_LABEL, Category};

    #[test]
    fn parses_every_label() {
        for category in Category::ALL {
            let parsed: Category = category
                .as_str()
                .parse()
                .expect("every display label should parse back to its category");

            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn rejects_unknown_label() {
        let result = "Groceries".parse::<Category>();

        assert!(
            result.is_err(),
            "want error for unknown category, got {result:?}"
        );
    }

    #[test]
    fn sentinel_is_not_a_category() {
        assert!(ALL_CATEGORIES_LABEL.parse::<Category>().is_err());
    }

    #[test]
    fn labels_are_unique() {
        for (i, a) in Category::ALL.iter().enumerate() {
            for b in Category::ALL.iter().skip(i + 1) {
                assert_ne!(a.as_str(), b.as_str());
            }
        }
    }
}
