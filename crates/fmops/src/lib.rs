//! Supplier sourcing engine for the facility-services back office.
//!
//! The interesting machinery lives in [`workflows::sourcing`]: the RFQ
//! lifecycle controller, the quote benchmarking engine, and the atomic award
//! transaction. Everything else here is service plumbing (configuration,
//! telemetry, top-level error type).

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
