//! service-core: Shared infrastructure for the card services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;

