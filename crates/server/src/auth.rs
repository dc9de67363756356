//! Session authentication and the ownership gate.
//!
//! Requests authenticate with basic credentials resolved against the users
//! table; the matched user rides the request as an extension. Handlers then
//! gate on the `{userId}` path segment: only the owner gets through, and
//! the gate runs before any store access.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{QueryFilter, entity::prelude::*};
use uuid::Uuid;

use crate::{ServerError, server::ServerState};

/// Credential view of the users table. The engine owns the full row; auth
/// only ever reads these columns.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub password: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) async fn middleware(
    auth_header: Option<TypedHeader<Authorization<Basic>>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Some(TypedHeader(credentials)) = auth_header else {
        return Err(ServerError::Unauthorized);
    };
    if credentials.username().is_empty() || credentials.password().is_empty() {
        return Err(ServerError::Unauthorized);
    }

    let email = credentials.username().trim().to_lowercase();
    let user = Entity::find()
        .filter(Column::Email.eq(email))
        .one(&state.db)
        .await
        .map_err(|err| {
            tracing::error!("credential lookup failed: {err}");
            ServerError::Unauthorized
        })?
        .ok_or(ServerError::Unauthorized)?;

    let Some(hash) = user.password.as_deref() else {
        return Err(ServerError::Unauthorized);
    };
    let verified = bcrypt::verify(credentials.password(), hash).unwrap_or(false);
    if !verified {
        return Err(ServerError::Unauthorized);
    }

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Short-circuits with `Forbidden` unless the authenticated user owns the
/// addressed resource.
pub(crate) fn require_owner(user: &Model, user_id: &str) -> Result<(), ServerError> {
    if user.id.to_string() != user_id {
        return Err(ServerError::Forbidden);
    }
    Ok(())
}
