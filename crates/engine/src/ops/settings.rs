//! Settings operations: read with defaults applied, update by merge.

use chrono::Utc;
use sea_orm::{ActiveValue, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    ResultEngine,
    settings::{Settings, SettingsPatch},
    user,
};

use super::{Engine, with_tx};

impl Engine {
    /// Current settings for a user, with the documented default filled in
    /// for every unset field.
    pub async fn settings(&self, user_id: Uuid) -> ResultEngine<Settings> {
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            Settings::from_user(&model)
        })
    }

    /// Validate and merge a partial settings update, returning the full
    /// updated record.
    ///
    /// The whole patch is rejected on the first invalid field; recognized
    /// but absent fields are left untouched. Every successful merge bumps
    /// the user's `updated_at`.
    pub async fn update_settings(
        &self,
        user_id: Uuid,
        patch: SettingsPatch,
    ) -> ResultEngine<Settings> {
        let change = patch.validate()?;
        with_tx!(self, |db_tx| {
            let model = self.require_user(&db_tx, user_id).await?;
            let mut active: user::ActiveModel = model.into();

            if let Some(value) = change.default_currency {
                active.default_currency = ActiveValue::Set(Some(value.code().to_string()));
            }
            if let Some(value) = change.preferred_date_format {
                active.preferred_date_format = ActiveValue::Set(Some(value.as_str().to_string()));
            }
            if let Some(value) = change.custom_name {
                active.custom_name = ActiveValue::Set(Some(value));
            }
            if let Some(value) = change.preferred_theme {
                active.preferred_theme = ActiveValue::Set(Some(value.as_str().to_string()));
            }
            if let Some(value) = change.language {
                active.language = ActiveValue::Set(Some(value.as_str().to_string()));
            }
            if let Some(value) = change.notify_push {
                active.notify_push = ActiveValue::Set(Some(value));
            }
            if let Some(value) = change.notify_email {
                active.notify_email = ActiveValue::Set(Some(value));
            }
            if let Some(value) = change.notify_budget_alerts {
                active.notify_budget_alerts = ActiveValue::Set(Some(value));
            }
            if let Some(value) = change.budget_monthly_limit {
                active.budget_monthly_limit = ActiveValue::Set(Some(value));
            }
            if let Some(value) = change.data_retention {
                active.data_retention = ActiveValue::Set(Some(value.as_str().to_string()));
            }
            active.updated_at = ActiveValue::Set(Utc::now());

            let model = active.update(&db_tx).await?;
            Settings::from_user(&model)
        })
    }
}
