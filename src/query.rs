//! Query execution.
//!
//! # Module Structure
//!
//! - [`request`]: search request types and builder
//! - [`engine`]: validation, dense/sparse ranking, and hybrid RRF fusion

pub mod engine;
pub mod request;

pub use engine::QueryEngine;
pub use request::{HybridQuery, QueryRequest, QueryRequestBuilder};
