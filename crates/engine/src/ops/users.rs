//! User lifecycle: provisioning from an external sign-in identity.

use chrono::Utc;
use sea_orm::{ActiveValue, QueryFilter, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    user::{self, ExternalIdentity, Providers, User},
};

use super::{Engine, with_tx};

impl Engine {
    /// Provision or refresh a user from an external sign-in identity.
    ///
    /// The first sign-in for an email creates the user with all preference
    /// columns unset (the documented defaults apply at read time). Repeat
    /// sign-ins merge the provider into the provider list, refresh the
    /// profile fields that were supplied and bump `updated_at`; id and
    /// email never change.
    pub async fn sign_in_identity(&self, identity: ExternalIdentity) -> ResultEngine<User> {
        let email = normalize_email(&identity.email)?;
        let provider = identity.provider.trim().to_string();
        if provider.is_empty() {
            return Err(EngineError::Validation(
                "provider must not be empty".to_string(),
            ));
        }

        with_tx!(self, |db_tx| {
            let existing = user::Entity::find()
                .filter(user::Column::Email.eq(email.clone()))
                .one(&db_tx)
                .await?;

            let model = match existing {
                None => {
                    let now = Utc::now();
                    let fresh = user::ActiveModel {
                        id: ActiveValue::Set(Uuid::new_v4()),
                        email: ActiveValue::Set(email),
                        password: ActiveValue::Set(identity.password_hash),
                        name: ActiveValue::Set(identity.name),
                        image: ActiveValue::Set(identity.image),
                        providers: ActiveValue::Set(Providers(vec![provider])),
                        created_at: ActiveValue::Set(now),
                        updated_at: ActiveValue::Set(now),
                        ..Default::default()
                    };
                    fresh.insert(&db_tx).await?
                }
                Some(model) => {
                    let mut providers = model.providers.clone();
                    if !providers.0.contains(&provider) {
                        providers.0.push(provider);
                    }
                    let mut active: user::ActiveModel = model.into();
                    active.providers = ActiveValue::Set(providers);
                    if identity.name.is_some() {
                        active.name = ActiveValue::Set(identity.name);
                    }
                    if identity.image.is_some() {
                        active.image = ActiveValue::Set(identity.image);
                    }
                    if identity.password_hash.is_some() {
                        active.password = ActiveValue::Set(identity.password_hash);
                    }
                    active.updated_at = ActiveValue::Set(Utc::now());
                    active.update(&db_tx).await?
                }
            };

            Ok(User::from(model))
        })
    }
}

fn normalize_email(raw: &str) -> ResultEngine<String> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() || !email.contains('@') {
        return Err(EngineError::Validation(
            "email must be a valid address".to_string(),
        ));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_normalized() {
        assert_eq!(
            normalize_email("  Alice@Example.COM ").unwrap(),
            "alice@example.com"
        );
        assert!(normalize_email("not-an-address").is_err());
        assert!(normalize_email("   ").is_err());
    }
}
