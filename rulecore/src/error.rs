use std::time::Duration;
use thiserror::Error;

type Source = Box<dyn std::error::Error + Send + Sync + 'static>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// Failure to reach or set up the database, generally fatal at
    /// construction time.
    #[error("connection error: {0}")]
    Connection(#[source] Source),
    /// A find, insert, delete or drop was rejected by the database.
    #[error("query error: {0}")]
    Query(#[source] Source),
    /// A stored document could not be turned into a `CasbinRule`.
    #[error("decode error: {0}")]
    Decode(#[source] Source),
    #[error("{0} timed out after {1:?}")]
    Timeout(&'static str, Duration),
    /// Denotes custom application invariant; generally informative.
    #[error("application invariant violated: {0}")]
    AppInvariantViolation(String),
}

impl BackendError {
    pub fn connection(e: impl Into<Source>) -> Self {
        Self::Connection(e.into())
    }

    pub fn query(e: impl Into<Source>) -> Self {
        Self::Query(e.into())
    }

    pub fn decode(e: impl Into<Source>) -> Self {
        Self::Decode(e.into())
    }
}

#[non_exhaustive]
#[derive(Debug, Error, PartialEq)]
pub enum RuleError {
    #[error("rule record has an empty ptype")]
    EmptyPtype,
}

impl From<RuleError> for BackendError {
    fn from(e: RuleError) -> Self {
        Self::Decode(Box::new(e))
    }
}
