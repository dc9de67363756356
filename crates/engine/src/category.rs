//! Classification labels for transactions.
//!
//! Expense categories and income types are disjoint sets; a stored
//! transaction carries exactly the one matching its kind. Parsing is
//! case-insensitive, storage is canonical.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Fixed classification set for expense transactions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpenseCategory {
    Survival,
    Growth,
    Fun,
    Restaurants,
    Mobility,
    Groceries,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [ExpenseCategory; 7] = [
        Self::Survival,
        Self::Growth,
        Self::Fun,
        Self::Restaurants,
        Self::Mobility,
        Self::Groceries,
        Self::Other,
    ];

    /// Canonical stored form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Survival => "Survival",
            Self::Growth => "Growth",
            Self::Fun => "Fun",
            Self::Restaurants => "Restaurants",
            Self::Mobility => "Mobility",
            Self::Groceries => "Groceries",
            Self::Other => "Other",
        }
    }
}

impl TryFrom<&str> for ExpenseCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| EngineError::Validation(format!("invalid expense category: {value}")))
    }
}

/// Fixed classification set for income transactions.
///
/// Stored lowercase; `refund` additionally allows a return percentage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IncomeType {
    Salary,
    Investment,
    Transfer,
    Gift,
    Other,
    Refund,
}

impl IncomeType {
    pub const ALL: [IncomeType; 6] = [
        Self::Salary,
        Self::Investment,
        Self::Transfer,
        Self::Gift,
        Self::Other,
        Self::Refund,
    ];

    /// Canonical stored form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::Investment => "investment",
            Self::Transfer => "transfer",
            Self::Gift => "gift",
            Self::Other => "other",
            Self::Refund => "refund",
        }
    }
}

impl TryFrom<&str> for IncomeType {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|income_type| income_type.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| EngineError::Validation(format!("invalid income type: {value}")))
    }
}
