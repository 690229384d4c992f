//! Mobility trace parsing and aggregation.
//!
//! [`TraceAggregator`] is the core: it reads an NS-2 trace once and answers
//! per-node and whole-simulation queries.

pub mod aggregator;
pub mod error;
pub mod parser;

pub use aggregator::TraceAggregator;
pub use error::TraceError;
