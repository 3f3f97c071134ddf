//! Derived-state functions layered on repository snapshots.
//!
//! # Responsibility
//! - Provide pure, recompute-on-read projections for today views and
//!   dashboard summaries.
//!
//! # Invariants
//! - Nothing in this layer mutates repository state.

pub mod reporting;
