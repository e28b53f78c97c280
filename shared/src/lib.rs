//! Todo Service Shared Library
//!
//! Wire types and error kinds shared between the backend and any Rust
//! client of the API.

pub mod errors;
pub mod types;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
