use thiserror::Error;

use crate::catalog::store::StoreError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Malformed or out-of-range query input; `field` names the parameter.
    #[error("{reason}")]
    InvalidParameter { field: &'static str, reason: String },
    #[error("{reason}")]
    InvalidInput { field: &'static str, reason: String },
    #[error("discount percentage must be in range 0..=100, got {0}")]
    InvalidPercentage(u32),
}

impl DomainError {
    pub fn invalid_parameter(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter { field, reason: reason.into() }
    }

    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput { field, reason: reason.into() }
    }

    /// Name of the offending field, when the error is about one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidParameter { field, .. } | Self::InvalidInput { field, .. } => Some(field),
            Self::InvalidPercentage(_) => None,
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("product with code {code} not found")]
    NotFound { code: String },
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    StoreFailure(String),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl From<StoreError> for ApplicationError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Conflict(message) => Self::Conflict(message),
            StoreError::Unavailable(message) | StoreError::Decode(message) => {
                Self::StoreFailure(message)
            }
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("not found: {message}")]
    NotFound { message: String, correlation_id: String },
    #[error("conflict: {message}")]
    Conflict { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl InterfaceError {
    pub fn message(&self) -> &str {
        match self {
            Self::BadRequest { message, .. }
            | Self::NotFound { message, .. }
            | Self::Conflict { message, .. }
            | Self::Internal { message, .. } => message,
        }
    }

    pub fn correlation_id(&self) -> &str {
        match self {
            Self::BadRequest { correlation_id, .. }
            | Self::NotFound { correlation_id, .. }
            | Self::Conflict { correlation_id, .. }
            | Self::Internal { correlation_id, .. } => correlation_id,
        }
    }
}

impl ApplicationError {
    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::NotFound { correlation_id: id, .. }
            | InterfaceError::Conflict { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        let correlation_id = "unassigned".to_owned();
        match value {
            ApplicationError::Domain(error) => {
                Self::BadRequest { message: error.to_string(), correlation_id }
            }
            error @ ApplicationError::NotFound { .. } => {
                Self::NotFound { message: error.to_string(), correlation_id }
            }
            ApplicationError::Conflict(message) => Self::Conflict { message, correlation_id },
            ApplicationError::StoreFailure(message) | ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id }
            }
        }
    }
}
