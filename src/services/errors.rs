use thiserror::Error;

/// Generic error type used by service layer functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    /// Submitted data was rejected; the message is safe to show to the user.
    #[error("{0}")]
    Form(String),
    /// Requested resource was not found.
    #[error("not found")]
    NotFound,
    /// The recognition service could not produce items.
    #[error("{0}")]
    Recognition(String),
    /// A backend the operation depends on is unavailable or not configured.
    #[error("service unavailable")]
    Unavailable,
    /// An unexpected internal error occurred.
    #[error("internal error")]
    Internal,
}

/// Convenient alias for results returned from service functions.
pub type ServiceResult<T> = Result<T, ServiceError>;
