use casbin::error::AdapterError;
use rulecore::error::BackendError;

pub use casbin::Error;

/// Wrap a backend failure the way casbin expects adapters to report
/// errors.
pub fn into_casbin(e: BackendError) -> Error {
    AdapterError(Box::new(e)).into()
}
