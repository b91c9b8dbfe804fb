//! Conversion-Client: boundary adapter for the points conversion service
//!
//! The performance <-> points formula lives in an external service reached
//! over HTTP+JSON. This crate owns everything on our side of that boundary:
//! wire types, the `ConversionService` trait, the reqwest client, and its
//! error normalisation.
//!
//! ## Layer 0 - Boundary
//!
//! Focus: A single failure vocabulary for every transport problem, and no
//! per-call surprises from missing configuration.
//!
//! ## Key Components
//!
//! - `ConversionService`: async lookup trait (points, performance, batch)
//! - `HttpConversionClient` / `ConversionConfig`: the real service over reqwest
//! - `fakes::LinearConversionService`: in-memory implementation for tests

mod client;
mod error;
pub mod fakes;
pub mod service;

pub use client::{
    ConversionConfig, HttpConversionClient, MAX_ATTEMPTS_CEILING, MAX_ATTEMPTS_ENV,
    SERVICE_URL_ENV, TIMEOUT_ENV,
};
pub use error::ClientError;
pub use service::{
    BatchPerformances, BatchRequest, ConversionService, Gender, PerformanceRequest,
    PointsRequest, Season,
};

/// Result type for conversion-client operations
pub type Result<T> = std::result::Result<T, ClientError>;
