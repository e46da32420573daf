//! service-core: Shared infrastructure for token mapper services.
pub mod config;
pub mod error;
pub mod observability;
