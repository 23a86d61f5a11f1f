//! Business logic services for the Éden backend

pub mod chat;
pub mod profile;
pub mod sector;
pub mod weather;

pub use chat::ChatService;
pub use profile::ProfileService;
pub use sector::SectorService;
pub use weather::WeatherService;
