//! Shared data types for the aasfix workspace.
//!
//! This crate owns the pure data the fixers agree on: the catalog of
//! relationship-type renames, the fix direction, and the URI/content-type
//! constant tables of the AASX container format. It performs no I/O.

pub mod catalog;
pub mod uris;

pub use catalog::{Direction, Fix, FixCatalog};
