//! Validation engine module.
//!
//! Provides rule orchestration, fact threading, and result aggregation.

pub mod checker;
pub mod facts;
pub mod orchestrator;
pub mod result;
