//! The module contains the errors the engine can produce.
//!
//! The server crate maps these onto HTTP statuses; detailed database
//! causes stay on the server side of that boundary.

use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A payload failed a field constraint. The message names the first
    /// offending field.
    #[error("{0}")]
    Validation(String),
    /// The target is absent, or owned by another user. The two cases are
    /// deliberately indistinguishable to callers.
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}
