//! Statistics API endpoints.

use api_types::stats::{CurrencyTotals, GroupTotal, MonthlyStatistics, StatisticsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
};
use chrono::Utc;

use crate::{ServerError, auth, server::ServerState};
use engine::MonthlySummary;

fn view(summary: MonthlySummary) -> MonthlyStatistics {
    MonthlyStatistics {
        month: summary.month,
        totals: summary
            .totals
            .into_iter()
            .map(|t| CurrencyTotals {
                currency: t.currency.code().to_string(),
                total_income: t.total_income,
                total_expenses: t.total_expenses,
                net: t.net,
            })
            .collect(),
        expenses_by_category: summary
            .expenses_by_category
            .into_iter()
            .map(group_total)
            .collect(),
        income_by_type: summary.income_by_type.into_iter().map(group_total).collect(),
    }
}

fn group_total(total: engine::GroupTotal) -> GroupTotal {
    GroupTotal {
        label: total.label,
        currency: total.currency.code().to_string(),
        total: total.total,
        count: total.count,
    }
}

/// Current-month totals for the authenticated owner's dashboard.
pub async fn get_monthly(
    Extension(user): Extension<auth::Model>,
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Json<StatisticsResponse>, ServerError> {
    auth::require_owner(&user, &user_id)?;

    let summary = state
        .engine
        .monthly_summary(user.id, Utc::now().date_naive())
        .await?;

    Ok(Json(StatisticsResponse {
        success: true,
        statistics: view(summary),
    }))
}
