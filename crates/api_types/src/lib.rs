//! Wire-format types for the grosz HTTP API.
//!
//! Field names are camelCase on the wire. Enum-valued fields travel as
//! plain strings so the engine's validation layer can report the offending
//! field instead of a serde parse error; the server maps them at the seam.

use serde::{Deserialize, Serialize};

pub mod transaction {
    use chrono::{DateTime, NaiveDate, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "lowercase")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    /// Create payload, tagged by transaction type.
    ///
    /// On the income variant, `category` is accepted as a legacy alias for
    /// `incomeType`.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(tag = "type", rename_all = "lowercase")]
    pub enum TransactionNew {
        #[serde(rename_all = "camelCase")]
        Income {
            amount: Decimal,
            currency: String,
            date: NaiveDate,
            description: String,
            #[serde(alias = "category")]
            income_type: String,
            #[serde(default)]
            source: Option<String>,
            #[serde(default)]
            return_percentage: Option<f64>,
            #[serde(default)]
            linked_transaction_id: Option<Uuid>,
            #[serde(default)]
            notes: Option<String>,
        },
        #[serde(rename_all = "camelCase")]
        Expense {
            amount: Decimal,
            currency: String,
            date: NaiveDate,
            description: String,
            category: String,
            #[serde(default)]
            source: Option<String>,
            #[serde(default)]
            linked_transaction_id: Option<Uuid>,
            #[serde(default)]
            notes: Option<String>,
        },
    }

    /// Update payload: any allow-listed subset. Unknown keys are ignored.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionUpdate {
        #[serde(default)]
        pub amount: Option<Decimal>,
        #[serde(default)]
        pub currency: Option<String>,
        #[serde(default)]
        pub date: Option<NaiveDate>,
        #[serde(default)]
        pub description: Option<String>,
        #[serde(default)]
        pub category: Option<String>,
        #[serde(default)]
        pub source: Option<String>,
        #[serde(default)]
        pub income_type: Option<String>,
        #[serde(default)]
        pub return_percentage: Option<f64>,
        #[serde(default)]
        pub linked_transaction_id: Option<Uuid>,
        #[serde(default)]
        pub notes: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionView {
        pub id: Uuid,
        #[serde(rename = "type")]
        pub kind: TransactionKind,
        pub amount: Decimal,
        pub currency: String,
        pub date: NaiveDate,
        pub description: String,
        pub category: Option<String>,
        pub source: Option<String>,
        pub income_type: Option<String>,
        pub return_percentage: Option<f64>,
        pub linked_transaction_id: Option<Uuid>,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub success: bool,
        pub transactions: Vec<TransactionView>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionCreatedResponse {
        pub success: bool,
        pub transaction: TransactionView,
        pub id: Uuid,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TransactionResponse {
        pub success: bool,
        pub transaction: TransactionView,
    }

    /// Abridged echo of a deleted record.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct DeletedTransaction {
        pub id: Uuid,
        pub description: String,
        pub amount: Decimal,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TransactionDeletedResponse {
        pub success: bool,
        pub message: String,
        pub deleted_transaction: DeletedTransaction,
    }
}

pub mod settings {
    use rust_decimal::Decimal;

    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct NotificationsUpdate {
        #[serde(default)]
        pub push: Option<bool>,
        #[serde(default)]
        pub email: Option<bool>,
        #[serde(default, rename = "budgetAlerts")]
        pub budget_alerts: Option<bool>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        #[serde(default, rename = "monthlyLimit")]
        pub monthly_limit: Option<Decimal>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct PrivacyUpdate {
        #[serde(default, rename = "dataRetention")]
        pub data_retention: Option<String>,
    }

    /// Partial settings update. Unknown top-level keys are ignored;
    /// recognized-but-absent fields are left untouched.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SettingsUpdate {
        #[serde(default)]
        pub default_currency: Option<String>,
        #[serde(default)]
        pub preferred_date_format: Option<String>,
        #[serde(default)]
        pub custom_name: Option<String>,
        #[serde(default)]
        pub preferred_theme: Option<String>,
        #[serde(default)]
        pub language: Option<String>,
        #[serde(default)]
        pub notifications: Option<NotificationsUpdate>,
        #[serde(default)]
        pub budget: Option<BudgetUpdate>,
        #[serde(default)]
        pub privacy: Option<PrivacyUpdate>,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NotificationsView {
        pub push: bool,
        pub email: bool,
        pub budget_alerts: bool,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetView {
        pub monthly_limit: Decimal,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PrivacyView {
        pub data_retention: String,
    }

    /// The full settings record, defaults applied.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SettingsView {
        pub default_currency: String,
        pub preferred_date_format: String,
        pub custom_name: String,
        pub preferred_theme: String,
        pub language: String,
        pub notifications: NotificationsView,
        pub budget: BudgetView,
        pub privacy: PrivacyView,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SettingsResponse {
        pub success: bool,
        pub settings: SettingsView,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct SettingsUpdatedResponse {
        pub success: bool,
        pub message: String,
        pub settings: SettingsView,
    }
}

pub mod stats {
    use rust_decimal::Decimal;

    use super::*;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CurrencyTotals {
        pub currency: String,
        pub total_income: Decimal,
        pub total_expenses: Decimal,
        pub net: Decimal,
    }

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct GroupTotal {
        pub label: String,
        pub currency: String,
        pub total: Decimal,
        pub count: u64,
    }

    /// Current-month aggregation for the dashboard.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct MonthlyStatistics {
        /// The month the totals cover, as `YYYY-MM`.
        pub month: String,
        pub totals: Vec<CurrencyTotals>,
        pub expenses_by_category: Vec<GroupTotal>,
        pub income_by_type: Vec<GroupTotal>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct StatisticsResponse {
        pub success: bool,
        pub statistics: MonthlyStatistics,
    }
}

/// Liveness probe body.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
}
