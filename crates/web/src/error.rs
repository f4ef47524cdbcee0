use thiserror::Error;

/// Failure modes of an external service call.
///
/// Callers distinguish a non-success status (the service answered, but not
/// with data) from transport problems, because the tools word those cases
/// differently for the user.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("unexpected response format: {0}")]
    Format(String),

    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),
}

impl ServiceError {
    pub fn is_status(&self) -> bool {
        matches!(self, ServiceError::Status { .. })
    }

    pub(crate) async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ServiceError::Status { status, body }
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
