//! Settings API endpoints.

use api_types::settings::{
    BudgetView, NotificationsView, PrivacyView, SettingsResponse, SettingsUpdate,
    SettingsUpdatedResponse, SettingsView,
};
use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
};

use crate::{ServerError, auth, server::ServerState};
use engine::{Settings, SettingsPatch};

fn view(settings: Settings) -> SettingsView {
    SettingsView {
        default_currency: settings.default_currency.code().to_string(),
        preferred_date_format: settings.preferred_date_format.as_str().to_string(),
        custom_name: settings.custom_name,
        preferred_theme: settings.preferred_theme.as_str().to_string(),
        language: settings.language.as_str().to_string(),
        notifications: NotificationsView {
            push: settings.notifications.push,
            email: settings.notifications.email,
            budget_alerts: settings.notifications.budget_alerts,
        },
        budget: BudgetView {
            monthly_limit: settings.budget_monthly_limit,
        },
        privacy: PrivacyView {
            data_retention: settings.data_retention.as_str().to_string(),
        },
    }
}

fn patch(payload: SettingsUpdate) -> SettingsPatch {
    let notifications = payload.notifications.unwrap_or_default();
    let budget = payload.budget.unwrap_or_default();
    let privacy = payload.privacy.unwrap_or_default();
    SettingsPatch {
        default_currency: payload.default_currency,
        preferred_date_format: payload.preferred_date_format,
        custom_name: payload.custom_name,
        preferred_theme: payload.preferred_theme,
        language: payload.language,
        notify_push: notifications.push,
        notify_email: notifications.email,
        notify_budget_alerts: notifications.budget_alerts,
        budget_monthly_limit: budget.monthly_limit,
        data_retention: privacy.data_retention,
    }
}

pub async fn get_settings(
    Extension(user): Extension<auth::Model>,
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
) -> Result<Json<SettingsResponse>, ServerError> {
    auth::require_owner(&user, &user_id)?;

    let settings = state.engine.settings(user.id).await?;

    Ok(Json(SettingsResponse {
        success: true,
        settings: view(settings),
    }))
}

pub async fn update_settings(
    Extension(user): Extension<auth::Model>,
    State(state): State<ServerState>,
    Path(user_id): Path<String>,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<SettingsUpdatedResponse>, ServerError> {
    auth::require_owner(&user, &user_id)?;
    let Json(payload) = payload.map_err(|err| ServerError::BadRequest(err.body_text()))?;

    let settings = state.engine.update_settings(user.id, patch(payload)).await?;

    Ok(Json(SettingsUpdatedResponse {
        success: true,
        message: "Settings updated successfully".to_string(),
        settings: view(settings),
    }))
}
