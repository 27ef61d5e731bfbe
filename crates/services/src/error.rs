//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by the wire client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ApiError {
    #[error("backend request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("backend returned a malformed question: {0}")]
    BadQuestion(#[from] arcade_core::QuestionError),
}

/// Errors emitted by `SessionService` for caller mistakes. Wire failures are
/// not represented here: the service degrades to local behavior instead of
/// propagating them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no question is pending an answer")]
    NoPendingQuestion,
}
