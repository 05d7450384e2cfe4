pub mod adapter;
pub mod error;

pub use adapter::RuleAdapter;
#[cfg(feature = "mongodb")]
pub use adapter::MongoAdapter;
