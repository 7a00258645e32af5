//! Domain logic: the ordered correction passes over an open AASX container.
//!
//! This crate owns *what* gets repaired and in which order. Container access
//! goes through the `PackageStore` trait from `aasfix-package`, so every
//! fixer can be tested against an in-memory store.

mod fixers;
mod pipeline;

pub use fixers::{Fixer, Reversibility, builtin_fixers};
pub use pipeline::{FixerOutcome, RunError, RunSummary, run};
