//! HTTP handlers for the Éden API

pub mod chat;
pub mod health;
pub mod profile;
pub mod sector;
pub mod weather;

pub use chat::*;
pub use health::*;
pub use profile::*;
pub use sector::*;
pub use weather::*;
