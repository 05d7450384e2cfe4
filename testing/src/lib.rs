pub mod fixture;
pub mod memory;
pub mod mock;
