pub mod app;
pub mod cards;
pub mod metrics;
