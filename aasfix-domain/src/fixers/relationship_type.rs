use crate::fixers::{Fixer, Reversibility};
use aasfix_package::{PackageStore, Relationship};
use aasfix_types::FixCatalog;
use tracing::info;

/// Rewrites package-level relationship types listed in the catalog.
///
/// A relationship's type is immutable, so each match is deleted and
/// recreated with the corrected type and the same id, target and target
/// mode. Matches are collected first because the recreation mutates the
/// collection being iterated.
pub struct RelationshipTypeFixer;

impl Fixer for RelationshipTypeFixer {
    fn name(&self) -> &'static str {
        "relationship-type"
    }

    fn reversibility(&self) -> Reversibility {
        Reversibility::Reversible
    }

    fn fix(&self, package: &mut dyn PackageStore, catalog: &FixCatalog) -> anyhow::Result<u64> {
        let mut fixed = 0u64;
        for fix in catalog.fixes() {
            let broken: Vec<Relationship> = package
                .relationships()
                .into_iter()
                .filter(|rel| rel.rel_type == fix.from)
                .collect();
            for rel in broken {
                info!(id = %rel.id, from = %fix.from, to = %fix.to, "fixing incorrect relationship type");
                package.recreate_with_type(&rel, &fix.to)?;
                fixed += 1;
            }
        }
        Ok(fixed)
    }
}
