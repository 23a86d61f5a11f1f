//! Domain models for the Éden platform

mod chat;
mod farm;
mod profile;
mod sector;
mod weather;

pub use chat::*;
pub use farm::*;
pub use profile::*;
pub use sector::*;
pub use weather::*;
