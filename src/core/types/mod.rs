//! Core type definition module
//!
//! Data passed across the provider capability contract.

pub mod context;
pub mod embedding;
pub mod message;
pub mod model;
pub mod requests;
pub mod responses;
pub mod status;

// Re-export all public types
pub use context::*;
pub use embedding::*;
pub use message::*;
pub use model::*;
pub use requests::*;
pub use responses::*;
pub use status::*;
