//! Transaction primitives.
//!
//! A `Transaction` is a single recorded income or expense event owned by a
//! user. Income records carry an `income_type` (and, for refunds, an
//! optional return percentage); expense records carry a `category`. The two
//! never mix on one record.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ExpenseCategory, IncomeType};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid transaction type: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency: Currency,
    pub date: NaiveDate,
    pub description: String,
    pub category: Option<ExpenseCategory>,
    pub source: Option<String>,
    pub income_type: Option<IncomeType>,
    pub return_percentage: Option<f64>,
    pub linked_transaction_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub amount: Decimal,
    pub currency: String,
    pub date: Date,
    pub description: String,
    pub category: Option<String>,
    pub source: Option<String>,
    pub income_type: Option<String>,
    pub return_percentage: Option<f64>,
    pub linked_transaction_id: Option<Uuid>,
    pub notes: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            user_id: ActiveValue::Set(tx.user_id),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount: ActiveValue::Set(tx.amount),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            date: ActiveValue::Set(tx.date),
            description: ActiveValue::Set(tx.description.clone()),
            category: ActiveValue::Set(tx.category.map(|c| c.as_str().to_string())),
            source: ActiveValue::Set(tx.source.clone()),
            income_type: ActiveValue::Set(tx.income_type.map(|t| t.as_str().to_string())),
            return_percentage: ActiveValue::Set(tx.return_percentage),
            linked_transaction_id: ActiveValue::Set(tx.linked_transaction_id),
            notes: ActiveValue::Set(tx.notes.clone()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: model.amount,
            currency: Currency::try_from(model.currency.as_str())?,
            date: model.date,
            description: model.description,
            category: model
                .category
                .as_deref()
                .map(ExpenseCategory::try_from)
                .transpose()?,
            source: model.source,
            income_type: model
                .income_type
                .as_deref()
                .map(IncomeType::try_from)
                .transpose()?,
            return_percentage: model.return_percentage,
            linked_transaction_id: model.linked_transaction_id,
            notes: model.notes,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}
