//! Command handler implementations
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0

pub mod info;
pub mod memory;

pub use info::InfoHandler;
pub use memory::MemoryHandler;
