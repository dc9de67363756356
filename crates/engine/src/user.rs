//! Users table: identity, credentials and the embedded preference columns.
//!
//! Preference columns are nullable; an unset column means "use the
//! documented default", which `Settings::from_user` applies at read time.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Linked identity providers, stored as a JSON string array.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct Providers(pub Vec<String>);

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub password: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    #[sea_orm(column_type = "Json")]
    pub providers: Providers,
    pub default_currency: Option<String>,
    pub preferred_date_format: Option<String>,
    pub custom_name: Option<String>,
    pub preferred_theme: Option<String>,
    pub language: Option<String>,
    pub notify_push: Option<bool>,
    pub notify_email: Option<bool>,
    pub notify_budget_alerts: Option<bool>,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))", nullable)]
    pub budget_monthly_limit: Option<Decimal>,
    pub data_retention: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transaction::Entity")]
    Transactions,
}

impl Related<super::transaction::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// A provisioned user, without credential or preference columns.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub providers: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            image: model.image,
            providers: model.providers.0,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Identity supplied by an external sign-in provider.
///
/// `password_hash` is an already-hashed credential for basic-auth access;
/// the engine never sees a cleartext password.
#[derive(Clone, Debug)]
pub struct ExternalIdentity {
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub provider: String,
    pub password_hash: Option<String>,
}
