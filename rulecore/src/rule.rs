use serde::{Deserialize, Serialize};

/// The maximum number of positional values a single rule may carry.
/// Values past this are dropped when encoding.
pub const MAX_VALUES: usize = 6;

/// Names of the stored fields, in positional order.
pub const FIELD_NAMES: [&str; MAX_VALUES + 1] = [
    "ptype",
    "v0",
    "v1",
    "v2",
    "v3",
    "v4",
    "v5",
];

/// Names of the positional value fields only.
pub const VALUE_NAMES: [&str; MAX_VALUES] = [
    "v0",
    "v1",
    "v2",
    "v3",
    "v4",
    "v5",
];

/// The persisted form of a single casbin policy rule.
///
/// Unused trailing values are stored as empty strings, never omitted,
/// so that exact matching on every field remains meaningful.
#[derive(Clone, Debug, Default, Eq, Hash, PartialEq, Deserialize, Serialize)]
pub struct CasbinRule {
    pub ptype: String,
    #[serde(default)]
    pub v0: String,
    #[serde(default)]
    pub v1: String,
    #[serde(default)]
    pub v2: String,
    #[serde(default)]
    pub v3: String,
    #[serde(default)]
    pub v4: String,
    #[serde(default)]
    pub v5: String,
}

mod display;
mod impls;

pub use impls::{
    parse_policy_line,
    section_of,
};
