//! Core types shared across the Mentora workspace: configuration, the
//! application error taxonomy, and domain models.

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, StorageBackend, SummarizerSettings, SummarizerStrategy};
pub use error::{AppError, ErrorMetadata, LogLevel};
