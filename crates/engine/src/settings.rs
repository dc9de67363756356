//! Per-user display and behavior preferences.
//!
//! Every field has a documented default; unset database columns resolve to
//! it at read time. Updates are merges: a patch only ever touches the
//! fields it names, and the whole patch is validated before any write.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{Currency, EngineError, ResultEngine, user};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYear,
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYear,
    #[serde(rename = "YYYY-MM-DD")]
    YearMonthDay,
}

impl DateFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DayMonthYear => "DD/MM/YYYY",
            Self::MonthDayYear => "MM/DD/YYYY",
            Self::YearMonthDay => "YYYY-MM-DD",
        }
    }
}

impl TryFrom<&str> for DateFormat {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "DD/MM/YYYY" => Ok(Self::DayMonthYear),
            "MM/DD/YYYY" => Ok(Self::MonthDayYear),
            "YYYY-MM-DD" => Ok(Self::YearMonthDay),
            other => Err(EngineError::Validation(format!(
                "invalid date format: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl TryFrom<&str> for Theme {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(EngineError::Validation(format!("invalid theme: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Pl,
    Es,
    Fr,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Pl => "pl",
            Self::Es => "es",
            Self::Fr => "fr",
        }
    }
}

impl TryFrom<&str> for Language {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "en" => Ok(Self::En),
            "pl" => Ok(Self::Pl),
            "es" => Ok(Self::Es),
            "fr" => Ok(Self::Fr),
            other => Err(EngineError::Validation(format!("invalid language: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataRetention {
    #[serde(rename = "6months")]
    SixMonths,
    #[default]
    #[serde(rename = "1year")]
    OneYear,
    #[serde(rename = "2years")]
    TwoYears,
    #[serde(rename = "forever")]
    Forever,
}

impl DataRetention {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SixMonths => "6months",
            Self::OneYear => "1year",
            Self::TwoYears => "2years",
            Self::Forever => "forever",
        }
    }
}

impl TryFrom<&str> for DataRetention {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "6months" => Ok(Self::SixMonths),
            "1year" => Ok(Self::OneYear),
            "2years" => Ok(Self::TwoYears),
            "forever" => Ok(Self::Forever),
            other => Err(EngineError::Validation(format!(
                "invalid data retention policy: {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notifications {
    pub push: bool,
    pub email: bool,
    pub budget_alerts: bool,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            push: true,
            email: false,
            budget_alerts: true,
        }
    }
}

/// The full settings record, defaults applied.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub default_currency: Currency,
    pub preferred_date_format: DateFormat,
    pub custom_name: String,
    pub preferred_theme: Theme,
    pub language: Language,
    pub notifications: Notifications,
    pub budget_monthly_limit: Decimal,
    pub data_retention: DataRetention,
}

impl Settings {
    /// Builds the settings view for a user row, applying the documented
    /// default for every unset column.
    pub(crate) fn from_user(model: &user::Model) -> ResultEngine<Self> {
        let defaults = Notifications::default();
        Ok(Self {
            default_currency: model
                .default_currency
                .as_deref()
                .map(Currency::try_from)
                .transpose()?
                .unwrap_or_default(),
            preferred_date_format: model
                .preferred_date_format
                .as_deref()
                .map(DateFormat::try_from)
                .transpose()?
                .unwrap_or_default(),
            custom_name: model.custom_name.clone().unwrap_or_default(),
            preferred_theme: model
                .preferred_theme
                .as_deref()
                .map(Theme::try_from)
                .transpose()?
                .unwrap_or_default(),
            language: model
                .language
                .as_deref()
                .map(Language::try_from)
                .transpose()?
                .unwrap_or_default(),
            notifications: Notifications {
                push: model.notify_push.unwrap_or(defaults.push),
                email: model.notify_email.unwrap_or(defaults.email),
                budget_alerts: model.notify_budget_alerts.unwrap_or(defaults.budget_alerts),
            },
            budget_monthly_limit: model.budget_monthly_limit.unwrap_or_default(),
            data_retention: model
                .data_retention
                .as_deref()
                .map(DataRetention::try_from)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

pub(crate) const MAX_CUSTOM_NAME_LEN: usize = 100;

/// A partial settings update. Absent fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct SettingsPatch {
    pub default_currency: Option<String>,
    pub preferred_date_format: Option<String>,
    pub custom_name: Option<String>,
    pub preferred_theme: Option<String>,
    pub language: Option<String>,
    pub notify_push: Option<bool>,
    pub notify_email: Option<bool>,
    pub notify_budget_alerts: Option<bool>,
    pub budget_monthly_limit: Option<Decimal>,
    pub data_retention: Option<String>,
}

/// A validated settings patch, ready to merge into the user row.
#[derive(Clone, Debug, Default)]
pub(crate) struct SettingsChange {
    pub default_currency: Option<Currency>,
    pub preferred_date_format: Option<DateFormat>,
    pub custom_name: Option<String>,
    pub preferred_theme: Option<Theme>,
    pub language: Option<Language>,
    pub notify_push: Option<bool>,
    pub notify_email: Option<bool>,
    pub notify_budget_alerts: Option<bool>,
    pub budget_monthly_limit: Option<Decimal>,
    pub data_retention: Option<DataRetention>,
}

impl SettingsPatch {
    /// Validates every provided field, rejecting the whole patch on the
    /// first invalid one. A patch with nothing recognized is itself a
    /// validation error.
    pub(crate) fn validate(self) -> ResultEngine<SettingsChange> {
        let change = SettingsChange {
            default_currency: self
                .default_currency
                .as_deref()
                .map(Currency::try_from)
                .transpose()?,
            preferred_date_format: self
                .preferred_date_format
                .as_deref()
                .map(DateFormat::try_from)
                .transpose()?,
            custom_name: self
                .custom_name
                .map(|name| {
                    if name.chars().count() > MAX_CUSTOM_NAME_LEN {
                        return Err(EngineError::Validation(format!(
                            "customName must be at most {MAX_CUSTOM_NAME_LEN} characters"
                        )));
                    }
                    Ok(name)
                })
                .transpose()?,
            preferred_theme: self
                .preferred_theme
                .as_deref()
                .map(Theme::try_from)
                .transpose()?,
            language: self
                .language
                .as_deref()
                .map(Language::try_from)
                .transpose()?,
            notify_push: self.notify_push,
            notify_email: self.notify_email,
            notify_budget_alerts: self.notify_budget_alerts,
            budget_monthly_limit: self
                .budget_monthly_limit
                .map(|limit| {
                    if limit < Decimal::ZERO {
                        return Err(EngineError::Validation(
                            "budget.monthlyLimit must be a non-negative number".to_string(),
                        ));
                    }
                    Ok(limit)
                })
                .transpose()?,
            data_retention: self
                .data_retention
                .as_deref()
                .map(DataRetention::try_from)
                .transpose()?,
        };

        if change.is_empty() {
            return Err(EngineError::Validation(
                "no valid fields to update".to_string(),
            ));
        }
        Ok(change)
    }
}

impl SettingsChange {
    fn is_empty(&self) -> bool {
        self.default_currency.is_none()
            && self.preferred_date_format.is_none()
            && self.custom_name.is_none()
            && self.preferred_theme.is_none()
            && self.language.is_none()
            && self.notify_push.is_none()
            && self.notify_email.is_none()
            && self.notify_budget_alerts.is_none()
            && self.budget_monthly_limit.is_none()
            && self.data_retention.is_none()
    }
}
