//! The fix catalog: an ordered list of relationship-type renames.

use crate::uris;
use std::mem;

/// A single relationship-type rename, applied wherever a relationship (or its
/// persisted definition) carries the `from` type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fix {
    pub from: String,
    pub to: String,
}

impl Fix {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Direction a run is executed in.
///
/// `Fix` repairs a file according to the standard; `Unfix` reverses the
/// reversible repairs to restore compatibility with unpatched consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Fix,
    Unfix,
}

/// An ordered, fixed list of [`Fix`] pairs known at build time.
///
/// Applying the catalog and then the reversed catalog restores the original
/// relationship types exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixCatalog {
    fixes: Vec<Fix>,
}

impl FixCatalog {
    pub fn new(fixes: Vec<Fix>) -> Self {
        Self { fixes }
    }

    /// The known AASX relationship-type corrections.
    pub fn builtin() -> Self {
        Self::new(vec![
            Fix::new(uris::AASX_ORIGIN_TYPE_BROKEN, uris::AASX_ORIGIN_TYPE),
            Fix::new(uris::AAS_SPEC_TYPE_BROKEN, uris::AAS_SPEC_TYPE),
        ])
    }

    /// Swaps `from` and `to` of every entry in place.
    pub fn reverse(&mut self) {
        for fix in &mut self.fixes {
            mem::swap(&mut fix.from, &mut fix.to);
        }
    }

    pub fn fixes(&self) -> &[Fix] {
        &self.fixes
    }
}
