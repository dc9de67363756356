//! Transaction store operations.
//!
//! Create and delete pair the `transactions` write with the owner-side
//! `user_transactions` write inside one database transaction, so the two
//! tables never disagree. Reads filter by id **and** owner; a transaction
//! owned by someone else looks exactly like one that does not exist.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    Currency, EngineError, ResultEngine,
    transaction::{self, Transaction, TransactionKind},
    user_transactions,
    util::month_bounds,
    validate::{NormalizedTransaction, TransactionDraft, TransactionPatch},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a transaction and append it to the owner's transaction list.
    ///
    /// Validation happens before anything touches the store; the two writes
    /// then commit or roll back as a unit.
    pub async fn create_transaction(
        &self,
        user_id: Uuid,
        draft: TransactionDraft,
    ) -> ResultEngine<Transaction> {
        let fields = draft.validate()?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            if let Some(linked) = fields.linked_transaction_id {
                self.require_linked_transaction(&db_tx, user_id, linked)
                    .await?;
            }
            let tx = build_transaction(user_id, fields);
            self.insert_with_back_reference(&db_tx, &tx).await?;
            Ok(tx)
        })
    }

    /// Return a transaction only if it exists and belongs to `user_id`.
    pub async fn transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self.find_owned(&db_tx, user_id, transaction_id).await?;
            Transaction::try_from(model)
        })
    }

    /// Apply a partial update to a transaction matching both id and owner.
    pub async fn update_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
        patch: TransactionPatch,
    ) -> ResultEngine<Transaction> {
        // An empty patch never reaches the store.
        if patch.is_empty() {
            return Err(EngineError::Validation(
                "no valid fields to update".to_string(),
            ));
        }
        with_tx!(self, |db_tx| {
            let model = self.find_owned(&db_tx, user_id, transaction_id).await?;
            let kind = TransactionKind::try_from(model.kind.as_str())?;
            let fields = patch.validate(kind)?;
            if let Some(linked) = fields.linked_transaction_id {
                self.require_linked_transaction(&db_tx, user_id, linked)
                    .await?;
            }

            // A return percentage only sticks while the record is a refund,
            // whether the refund status comes from the patch or from the
            // stored row.
            let stored_income_type = model
                .income_type
                .as_deref()
                .map(crate::IncomeType::try_from)
                .transpose()?;
            let effective_income_type = fields.income_type.or(stored_income_type);
            let return_percentage = match effective_income_type {
                Some(crate::IncomeType::Refund) => fields.return_percentage,
                _ => None,
            };

            let mut active: transaction::ActiveModel = model.into();
            if let Some(value) = fields.amount {
                active.amount = ActiveValue::Set(value);
            }
            if let Some(value) = fields.currency {
                active.currency = ActiveValue::Set(value.code().to_string());
            }
            if let Some(value) = fields.date {
                active.date = ActiveValue::Set(value);
            }
            if let Some(value) = fields.description {
                active.description = ActiveValue::Set(value);
            }
            if let Some(value) = fields.category {
                active.category = ActiveValue::Set(Some(value.as_str().to_string()));
            }
            if let Some(value) = fields.income_type {
                active.income_type = ActiveValue::Set(Some(value.as_str().to_string()));
            }
            if let Some(value) = return_percentage {
                active.return_percentage = ActiveValue::Set(Some(value));
            }
            if let Some(value) = fields.source {
                active.source = ActiveValue::Set(Some(value));
            }
            if let Some(value) = fields.linked_transaction_id {
                active.linked_transaction_id = ActiveValue::Set(Some(value));
            }
            if let Some(value) = fields.notes {
                active.notes = ActiveValue::Set(Some(value));
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let model = active.update(&db_tx).await?;
            Transaction::try_from(model)
        })
    }

    /// Delete a transaction matching both id and owner and pull it from the
    /// owner's transaction list. Both removals commit or roll back as a
    /// unit; returns the deleted record.
    pub async fn delete_transaction(
        &self,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<Transaction> {
        with_tx!(self, |db_tx| {
            let model = self.find_owned(&db_tx, user_id, transaction_id).await?;
            let deleted = Transaction::try_from(model)?;
            self.remove_with_back_reference(&db_tx, user_id, transaction_id)
                .await?;
            Ok(deleted)
        })
    }

    /// Transactions dated within the calendar month containing `anchor`,
    /// ordered by date descending, then creation time descending.
    pub async fn list_month(
        &self,
        user_id: Uuid,
        anchor: NaiveDate,
    ) -> ResultEngine<Vec<Transaction>> {
        let (first, last) = month_bounds(anchor)?;
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let models = transaction::Entity::find()
                .filter(transaction::Column::UserId.eq(user_id))
                .filter(transaction::Column::Date.between(first, last))
                .order_by_desc(transaction::Column::Date)
                .order_by_desc(transaction::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            models
                .into_iter()
                .map(Transaction::try_from)
                .collect::<ResultEngine<Vec<_>>>()
        })
    }

    /// Current-month totals for the dashboard: per-currency income/expense
    /// sums plus per-category and per-income-type breakdowns.
    pub async fn monthly_summary(
        &self,
        user_id: Uuid,
        anchor: NaiveDate,
    ) -> ResultEngine<MonthlySummary> {
        let transactions = self.list_month(user_id, anchor).await?;
        Ok(summarize(anchor, &transactions))
    }

    /// The owner-side transaction list, oldest first.
    ///
    /// Kept in lockstep with the `transactions` table by
    /// [`Engine::create_transaction`] and [`Engine::delete_transaction`].
    pub async fn user_transaction_list(&self, user_id: Uuid) -> ResultEngine<Vec<Uuid>> {
        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let rows = user_transactions::Entity::find()
                .filter(user_transactions::Column::UserId.eq(user_id))
                .order_by_asc(user_transactions::Column::CreatedAt)
                .all(&db_tx)
                .await?;
            Ok(rows.into_iter().map(|row| row.transaction_id).collect())
        })
    }

    async fn find_owned(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<transaction::Model> {
        transaction::Entity::find_by_id(transaction_id)
            .filter(transaction::Column::UserId.eq(user_id))
            .one(db_tx)
            .await?
            .ok_or_else(|| {
                EngineError::NotFound(
                    "transaction not found or does not belong to user".to_string(),
                )
            })
    }

    async fn require_linked_transaction(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: Uuid,
        linked_id: Uuid,
    ) -> ResultEngine<()> {
        let exists = transaction::Entity::find_by_id(linked_id)
            .filter(transaction::Column::UserId.eq(user_id))
            .one(db_tx)
            .await?
            .is_some();
        if !exists {
            return Err(EngineError::Validation(
                "linkedTransactionId must reference an existing transaction of the same user"
                    .to_string(),
            ));
        }
        Ok(())
    }

    async fn insert_with_back_reference(
        &self,
        db_tx: &DatabaseTransaction,
        tx: &Transaction,
    ) -> ResultEngine<()> {
        let _ = transaction::ActiveModel::from(tx).insert(db_tx).await?;
        let back_reference = user_transactions::ActiveModel {
            user_id: ActiveValue::Set(tx.user_id),
            transaction_id: ActiveValue::Set(tx.id),
            created_at: ActiveValue::Set(tx.created_at),
        };
        let _ = back_reference.insert(db_tx).await?;
        Ok(())
    }

    async fn remove_with_back_reference(
        &self,
        db_tx: &DatabaseTransaction,
        user_id: Uuid,
        transaction_id: Uuid,
    ) -> ResultEngine<()> {
        let _ = user_transactions::Entity::delete_by_id((user_id, transaction_id))
            .exec(db_tx)
            .await?;
        let _ = transaction::Entity::delete_by_id(transaction_id)
            .exec(db_tx)
            .await?;
        Ok(())
    }
}

fn build_transaction(user_id: Uuid, fields: NormalizedTransaction) -> Transaction {
    let now = Utc::now();
    Transaction {
        id: Uuid::new_v4(),
        user_id,
        kind: fields.kind,
        amount: fields.amount,
        currency: fields.currency,
        date: fields.date,
        description: fields.description,
        category: fields.category,
        source: fields.source,
        income_type: fields.income_type,
        return_percentage: fields.return_percentage,
        linked_transaction_id: fields.linked_transaction_id,
        notes: fields.notes,
        created_at: now,
        updated_at: now,
    }
}

/// Per-currency totals for one calendar month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurrencyTotals {
    pub currency: Currency,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub net: Decimal,
}

/// Total for one classification label in one currency.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupTotal {
    pub label: String,
    pub currency: Currency,
    pub total: Decimal,
    pub count: u64,
}

/// Aggregated view of one calendar month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonthlySummary {
    /// The month the totals cover, as `YYYY-MM`.
    pub month: String,
    pub totals: Vec<CurrencyTotals>,
    pub expenses_by_category: Vec<GroupTotal>,
    pub income_by_type: Vec<GroupTotal>,
}

fn summarize(anchor: NaiveDate, transactions: &[Transaction]) -> MonthlySummary {
    let mut totals: BTreeMap<Currency, (Decimal, Decimal)> = BTreeMap::new();
    let mut expenses: BTreeMap<(String, Currency), (Decimal, u64)> = BTreeMap::new();
    let mut income: BTreeMap<(String, Currency), (Decimal, u64)> = BTreeMap::new();

    for tx in transactions {
        let entry = totals.entry(tx.currency).or_default();
        match tx.kind {
            TransactionKind::Income => entry.0 += tx.amount,
            TransactionKind::Expense => entry.1 += tx.amount,
        }

        let group = match tx.kind {
            TransactionKind::Expense => tx.category.map(|c| (&mut expenses, c.as_str())),
            TransactionKind::Income => tx.income_type.map(|t| (&mut income, t.as_str())),
        };
        if let Some((groups, label)) = group {
            let entry = groups.entry((label.to_string(), tx.currency)).or_default();
            entry.0 += tx.amount;
            entry.1 += 1;
        }
    }

    let into_group_totals = |groups: BTreeMap<(String, Currency), (Decimal, u64)>| {
        groups
            .into_iter()
            .map(|((label, currency), (total, count))| GroupTotal {
                label,
                currency,
                total,
                count,
            })
            .collect()
    };

    MonthlySummary {
        month: format!("{:04}-{:02}", anchor.year(), anchor.month()),
        totals: totals
            .into_iter()
            .map(|(currency, (total_income, total_expenses))| CurrencyTotals {
                currency,
                total_income,
                total_expenses,
                net: total_income - total_expenses,
            })
            .collect(),
        expenses_by_category: into_group_totals(expenses),
        income_by_type: into_group_totals(income),
    }
}
