use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Missing param: {0}")]
    MissingParam(String),
    #[error("Invalid param: {0}")]
    InvalidParam(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Internal error")]
    ServerError,
    /// A collaborator was not wired in. Never rendered to clients.
    #[error("Missing dependency: {0}")]
    MissingDependency(&'static str),
}

impl DomainError {
    pub fn missing_param(name: impl Into<String>) -> Self {
        DomainError::MissingParam(name.into())
    }

    pub fn invalid_param(name: impl Into<String>) -> Self {
        DomainError::InvalidParam(name.into())
    }
}
