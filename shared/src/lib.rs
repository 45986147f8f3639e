//! Bloglist Shared Library
//!
//! This crate contains the wire types, validation rules and pure
//! aggregate helpers shared by the backend and its clients.

pub mod errors;
pub mod stats;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use types::*;
