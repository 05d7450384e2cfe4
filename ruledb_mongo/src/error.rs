use mongodb::error::{
    Error,
    ErrorKind,
    WriteFailure,
};
use rulecore::error::BackendError;

pub(crate) const NAMESPACE_NOT_FOUND: i32 = 26;
pub(crate) const INDEX_OPTIONS_CONFLICT: i32 = 85;
pub(crate) const INDEX_KEY_SPECS_CONFLICT: i32 = 86;

/// The server error code carried by the error, if any.
pub(crate) fn server_code(e: &Error) -> Option<i32> {
    match e.kind.as_ref() {
        ErrorKind::Command(e) => Some(e.code),
        ErrorKind::Write(WriteFailure::WriteError(e)) => Some(e.code),
        _ => None,
    }
}

pub(crate) fn is_index_conflict(code: Option<i32>) -> bool {
    matches!(code, Some(INDEX_OPTIONS_CONFLICT | INDEX_KEY_SPECS_CONFLICT))
}

pub(crate) fn is_namespace_not_found(e: &Error) -> bool {
    match e.kind.as_ref() {
        ErrorKind::Command(e) => e.code == NAMESPACE_NOT_FOUND
            || e.message == "ns not found",
        _ => false,
    }
}

/// Errors raised while reading from a cursor are decode errors when the
/// document could not be turned into a rule, query errors otherwise.
pub(crate) fn read_error(e: Error) -> BackendError {
    match e.kind.as_ref() {
        ErrorKind::BsonDeserialization(_) => BackendError::decode(e),
        _ => BackendError::query(e),
    }
}
