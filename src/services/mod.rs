//! Service layer for docreview business logic.
//!
//! Services combine the analysis pipeline with persistence and can be used
//! by the CLI or other interfaces.

pub mod review;

pub use review::{ReviewOutcome, ReviewService};
