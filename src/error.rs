use thiserror::Error;

/// orascope errors
#[derive(Error, Debug)]
pub enum OrascopeError {
    /// The executor failed. The driver error is kept as-is and can be
    /// recovered with `downcast_ref`.
    #[error("Query failed: {0}")]
    Query(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("{operation} is not implemented")]
    NotImplemented { operation: &'static str },

    #[error("Unexpected row from {query} query: {message}")]
    UnexpectedRow { query: &'static str, message: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl OrascopeError {
    pub(crate) fn query<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query(Box::new(err))
    }

    /// True for the "capability not supported" signal
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, Self::NotImplemented { .. })
    }
}
