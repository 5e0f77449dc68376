//! Rent scenario sensitivity analysis for multifamily portfolios.
//!
//! The [`engine`] module is the pure calculation core: per-floorplan rent
//! adjustment, portfolio aggregation, and the waterfall decomposition
//! between two scenarios. The [`portfolio`] module wraps it with the stored
//! records, repository boundary, service, and HTTP router the API service
//! mounts.

pub mod config;
pub mod engine;
pub mod error;
pub mod portfolio;
pub mod telemetry;
