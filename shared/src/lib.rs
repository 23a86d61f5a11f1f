//! Shared types and logic for the Éden farm management platform
//!
//! This crate contains everything the backend and the browser (via WASM)
//! agree on: domain models, the irrigation recommendation engine, the
//! sector irrigation runtime, and input validation.

pub mod irrigation;
pub mod models;
pub mod runtime;
pub mod session;
pub mod types;
pub mod validation;

pub use irrigation::*;
pub use models::*;
pub use runtime::*;
pub use session::*;
pub use types::*;
pub use validation::*;
