//! ef - employee finder
//!
//! Routes free-text queries against an employee directory and returns ranked
//! candidates with transparent match reasons. The pipeline is:
//! classify → dispatch to a retrieval strategy (optionally parametrized by an
//! LLM intent extraction) → merge/score/rank → response assembly.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod finder;
pub mod intent;
pub mod model;
pub mod ranking;
pub mod router;
pub mod storage;
pub mod strategy;
pub mod test_utils;

pub use error::{EfError, Result};
