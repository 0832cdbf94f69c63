//! Configuration: connection settings and orchestrator tunables.

pub mod connection;
pub mod file;

pub use connection::{Configuration, Secret, validate};
pub use file::Settings;
