pub mod error;
pub mod filter;
pub mod platform;
pub mod rule;
pub mod traits;
