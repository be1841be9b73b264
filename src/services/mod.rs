//! Business logic shared by the HTTP routes.
//!
//! Services are plain functions generic over the repository traits so they
//! can run against [`crate::repository::DieselRepository`] or a mock.

use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod auth;
pub mod listing;
pub mod upload;
pub mod user;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Form(String),

    #[error("{0}")]
    TypeConstraint(String),

    #[error("internal error")]
    Internal,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound("Not found!".to_string()),
            RepositoryError::ValidationError(message) => ServiceError::TypeConstraint(message),
            err => {
                log::error!("Repository error: {err}");
                ServiceError::Internal
            }
        }
    }
}
