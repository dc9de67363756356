//! Transaction payload validation and normalization.
//!
//! Pure functions only: a create draft or update patch either normalizes
//! into a typed field set ready for persistence or fails with a
//! [`EngineError::Validation`] naming the first offending field. No I/O
//! happens here; referential checks (linked transactions, owners) belong to
//! the ops layer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{Currency, EngineError, ExpenseCategory, IncomeType, ResultEngine, TransactionKind};

pub(crate) const MAX_DESCRIPTION_LEN: usize = 255;
pub(crate) const MAX_SOURCE_LEN: usize = 255;
pub(crate) const MAX_NOTES_LEN: usize = 500;

/// Create-mode payload, one variant per transaction type.
///
/// The variant split is what makes the category rule structural: an expense
/// payload has no place to put an income type, and vice versa.
#[derive(Clone, Debug)]
pub enum TransactionDraft {
    Income(IncomeDraft),
    Expense(ExpenseDraft),
}

#[derive(Clone, Debug)]
pub struct IncomeDraft {
    pub amount: Decimal,
    pub currency: String,
    pub date: NaiveDate,
    pub description: String,
    pub income_type: String,
    pub source: Option<String>,
    pub return_percentage: Option<f64>,
    pub linked_transaction_id: Option<Uuid>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ExpenseDraft {
    pub amount: Decimal,
    pub currency: String,
    pub date: NaiveDate,
    pub description: String,
    pub category: String,
    pub source: Option<String>,
    pub linked_transaction_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Normalized create fields, ready for persistence.
#[derive(Clone, Debug)]
pub(crate) struct NormalizedTransaction {
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency: Currency,
    pub date: NaiveDate,
    pub description: String,
    pub category: Option<ExpenseCategory>,
    pub income_type: Option<IncomeType>,
    pub return_percentage: Option<f64>,
    pub source: Option<String>,
    pub linked_transaction_id: Option<Uuid>,
    pub notes: Option<String>,
}

impl TransactionDraft {
    pub(crate) fn validate(self) -> ResultEngine<NormalizedTransaction> {
        match self {
            Self::Income(draft) => {
                let income_type = IncomeType::try_from(draft.income_type.as_str())?;
                // A return percentage is only meaningful on refunds; on any
                // other income type it is dropped without comment.
                let return_percentage = match income_type {
                    IncomeType::Refund => draft
                        .return_percentage
                        .map(validate_return_percentage)
                        .transpose()?,
                    _ => None,
                };
                Ok(NormalizedTransaction {
                    kind: TransactionKind::Income,
                    amount: validate_amount(draft.amount)?,
                    currency: Currency::try_from(draft.currency.as_str())?,
                    date: draft.date,
                    description: validate_description(&draft.description)?,
                    category: None,
                    income_type: Some(income_type),
                    return_percentage,
                    source: normalize_limited_text("source", draft.source, MAX_SOURCE_LEN)?,
                    linked_transaction_id: draft.linked_transaction_id,
                    notes: normalize_limited_text("notes", draft.notes, MAX_NOTES_LEN)?,
                })
            }
            Self::Expense(draft) => Ok(NormalizedTransaction {
                kind: TransactionKind::Expense,
                amount: validate_amount(draft.amount)?,
                currency: Currency::try_from(draft.currency.as_str())?,
                date: draft.date,
                description: validate_description(&draft.description)?,
                category: Some(ExpenseCategory::try_from(draft.category.as_str())?),
                income_type: None,
                return_percentage: None,
                source: normalize_limited_text("source", draft.source, MAX_SOURCE_LEN)?,
                linked_transaction_id: draft.linked_transaction_id,
                notes: normalize_limited_text("notes", draft.notes, MAX_NOTES_LEN)?,
            }),
        }
    }
}

/// Update-mode payload. These are the only mutable fields; anything else a
/// client sends is dropped before the payload reaches the engine.
#[derive(Clone, Debug, Default)]
pub struct TransactionPatch {
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub source: Option<String>,
    pub income_type: Option<String>,
    pub return_percentage: Option<f64>,
    pub linked_transaction_id: Option<Uuid>,
    pub notes: Option<String>,
}

/// Normalized update fields for a transaction of a known kind.
#[derive(Clone, Debug, Default)]
pub(crate) struct NormalizedPatch {
    pub amount: Option<Decimal>,
    pub currency: Option<Currency>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub category: Option<ExpenseCategory>,
    pub income_type: Option<IncomeType>,
    pub return_percentage: Option<f64>,
    pub source: Option<String>,
    pub linked_transaction_id: Option<Uuid>,
    pub notes: Option<String>,
}

impl TransactionPatch {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.currency.is_none()
            && self.date.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.source.is_none()
            && self.income_type.is_none()
            && self.return_percentage.is_none()
            && self.linked_transaction_id.is_none()
            && self.notes.is_none()
    }

    /// Validates the patch against the stored transaction's kind.
    ///
    /// `category` only applies to expense records and `incomeType` only to
    /// income records; naming the wrong one is a category/type mismatch,
    /// not a silent drop, since both fields are allow-listed.
    pub(crate) fn validate(self, kind: TransactionKind) -> ResultEngine<NormalizedPatch> {
        if self.is_empty() {
            return Err(EngineError::Validation(
                "no valid fields to update".to_string(),
            ));
        }

        let category = match (kind, self.category) {
            (_, None) => None,
            (TransactionKind::Expense, Some(raw)) => Some(ExpenseCategory::try_from(raw.as_str())?),
            (TransactionKind::Income, Some(_)) => {
                return Err(EngineError::Validation(
                    "category does not apply to income transactions; use incomeType".to_string(),
                ));
            }
        };
        let income_type = match (kind, self.income_type) {
            (_, None) => None,
            (TransactionKind::Income, Some(raw)) => Some(IncomeType::try_from(raw.as_str())?),
            (TransactionKind::Expense, Some(_)) => {
                return Err(EngineError::Validation(
                    "incomeType does not apply to expense transactions".to_string(),
                ));
            }
        };
        let return_percentage = match (kind, self.return_percentage) {
            (_, None) => None,
            (TransactionKind::Income, Some(value)) => Some(validate_return_percentage(value)?),
            (TransactionKind::Expense, Some(_)) => {
                return Err(EngineError::Validation(
                    "returnPercentage does not apply to expense transactions".to_string(),
                ));
            }
        };

        Ok(NormalizedPatch {
            amount: self.amount.map(validate_amount).transpose()?,
            currency: self
                .currency
                .as_deref()
                .map(Currency::try_from)
                .transpose()?,
            date: self.date,
            description: self
                .description
                .as_deref()
                .map(validate_description)
                .transpose()?,
            category,
            income_type,
            return_percentage,
            source: normalize_limited_text("source", self.source, MAX_SOURCE_LEN)?,
            linked_transaction_id: self.linked_transaction_id,
            notes: normalize_limited_text("notes", self.notes, MAX_NOTES_LEN)?,
        })
    }
}

fn validate_amount(amount: Decimal) -> ResultEngine<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(EngineError::Validation(
            "amount must be a positive number".to_string(),
        ));
    }
    Ok(amount)
}

fn validate_return_percentage(value: f64) -> ResultEngine<f64> {
    if !(0.0..=100.0).contains(&value) {
        return Err(EngineError::Validation(
            "returnPercentage must be between 0 and 100".to_string(),
        ));
    }
    Ok(value)
}

fn validate_description(raw: &str) -> ResultEngine<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(
            "description must not be empty".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(EngineError::Validation(format!(
            "description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

fn normalize_limited_text(
    field: &str,
    value: Option<String>,
    max_len: usize,
) -> ResultEngine<Option<String>> {
    let Some(value) = value else { return Ok(None) };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if trimmed.chars().count() > max_len {
        return Err(EngineError::Validation(format!(
            "{field} must be at most {max_len} characters"
        )));
    }
    Ok(Some(trimmed.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn income_draft() -> IncomeDraft {
        IncomeDraft {
            amount: Decimal::from(5000),
            currency: "USD".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: "Paycheck".to_string(),
            income_type: "salary".to_string(),
            source: None,
            return_percentage: None,
            linked_transaction_id: None,
            notes: None,
        }
    }

    fn expense_draft() -> ExpenseDraft {
        ExpenseDraft {
            amount: Decimal::from(120),
            currency: "PLN".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            description: "Weekly shop".to_string(),
            category: "Groceries".to_string(),
            source: None,
            linked_transaction_id: None,
            notes: None,
        }
    }

    #[test]
    fn income_normalizes_type_to_lowercase() {
        let mut draft = income_draft();
        draft.income_type = "SALARY".to_string();
        let fields = TransactionDraft::Income(draft).validate().unwrap();
        assert_eq!(fields.income_type, Some(IncomeType::Salary));
        assert_eq!(fields.category, None);
    }

    #[test]
    fn expense_category_from_the_income_set_is_rejected() {
        let mut draft = expense_draft();
        draft.category = "Salary".to_string();
        assert!(TransactionDraft::Expense(draft).validate().is_err());
    }

    #[test]
    fn income_type_from_the_expense_set_is_rejected() {
        let mut draft = income_draft();
        draft.income_type = "Groceries".to_string();
        assert!(TransactionDraft::Income(draft).validate().is_err());
    }

    #[test]
    fn nonpositive_amounts_are_rejected() {
        let mut draft = expense_draft();
        draft.amount = Decimal::ZERO;
        assert!(TransactionDraft::Expense(draft.clone()).validate().is_err());
        draft.amount = Decimal::from(-10);
        assert!(TransactionDraft::Expense(draft).validate().is_err());
    }

    #[test]
    fn return_percentage_applies_to_refunds_only() {
        let mut draft = income_draft();
        draft.income_type = "refund".to_string();
        draft.return_percentage = Some(35.0);
        let fields = TransactionDraft::Income(draft).validate().unwrap();
        assert_eq!(fields.return_percentage, Some(35.0));

        let mut draft = income_draft();
        draft.return_percentage = Some(35.0);
        let fields = TransactionDraft::Income(draft).validate().unwrap();
        assert_eq!(fields.return_percentage, None);
    }

    #[test]
    fn out_of_range_return_percentage_is_rejected() {
        let mut draft = income_draft();
        draft.income_type = "refund".to_string();
        draft.return_percentage = Some(130.0);
        assert!(TransactionDraft::Income(draft).validate().is_err());
    }

    #[test]
    fn blank_description_is_rejected() {
        let mut draft = expense_draft();
        draft.description = "   ".to_string();
        assert!(TransactionDraft::Expense(draft).validate().is_err());
    }

    #[test]
    fn overlong_notes_are_rejected() {
        let mut draft = expense_draft();
        draft.notes = Some("x".repeat(MAX_NOTES_LEN + 1));
        assert!(TransactionDraft::Expense(draft).validate().is_err());
    }

    #[test]
    fn empty_patch_is_a_validation_error() {
        let err = TransactionPatch::default()
            .validate(TransactionKind::Income)
            .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn patch_rejects_classification_of_the_other_kind() {
        let patch = TransactionPatch {
            category: Some("Groceries".to_string()),
            ..Default::default()
        };
        assert!(patch.validate(TransactionKind::Income).is_err());

        let patch = TransactionPatch {
            income_type: Some("salary".to_string()),
            ..Default::default()
        };
        assert!(patch.validate(TransactionKind::Expense).is_err());
    }

    #[test]
    fn patch_normalizes_recognized_fields() {
        let patch = TransactionPatch {
            amount: Some(Decimal::new(1999, 2)),
            currency: Some("eur".to_string()),
            description: Some("  Refund for broken kettle  ".to_string()),
            income_type: Some("REFUND".to_string()),
            return_percentage: Some(100.0),
            ..Default::default()
        };
        let fields = patch.validate(TransactionKind::Income).unwrap();
        assert_eq!(fields.currency, Some(Currency::Eur));
        assert_eq!(fields.description.as_deref(), Some("Refund for broken kettle"));
        assert_eq!(fields.income_type, Some(IncomeType::Refund));
        assert_eq!(fields.return_percentage, Some(100.0));
    }
}
