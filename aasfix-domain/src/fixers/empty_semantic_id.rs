use crate::fixers::{Fixer, Reversibility, xml_parts};
use aasfix_package::PackageStore;
use aasfix_types::FixCatalog;
use aasfix_types::uris::AAS_NS_V3;
use aasfix_xml::{Document, Element};
use anyhow::Context;
use tracing::info;

/// Deletes `semanticId` elements whose `keys` container has no `key`
/// children. Such a reference carries no information; removing it is
/// irreversible.
///
/// A `semanticId` without any `keys` container at all is left alone: the
/// deletion rule requires the empty container to be present.
pub struct EmptySemanticIdFixer;

fn is_empty_semantic_id(el: &Element) -> bool {
    if !el.is(AAS_NS_V3, "semanticId") {
        return false;
    }
    match el.find_child(AAS_NS_V3, "keys") {
        Some(keys) => keys.children_named(AAS_NS_V3, "key").next().is_none(),
        None => false,
    }
}

impl Fixer for EmptySemanticIdFixer {
    fn name(&self) -> &'static str {
        "empty-semantic-id"
    }

    fn reversibility(&self) -> Reversibility {
        Reversibility::OneWay
    }

    fn fix(&self, package: &mut dyn PackageStore, _catalog: &FixCatalog) -> anyhow::Result<u64> {
        let mut removed_total = 0u64;
        for name in xml_parts(package) {
            let content = package.read_part(&name)?;
            let mut doc =
                Document::from_bytes(&content).with_context(|| format!("parse part {name}"))?;

            let mut removed = 0u64;
            doc.root.retain_descendants(&mut |el| {
                if is_empty_semantic_id(el) {
                    removed += 1;
                    false
                } else {
                    true
                }
            });

            if removed > 0 {
                info!(part = %name, removed, "removed empty semanticId elements");
                let bytes = doc
                    .to_bytes()
                    .with_context(|| format!("serialize part {name}"))?;
                package.replace_part(&name, bytes)?;
                removed_total += removed;
            }
        }
        Ok(removed_total)
    }
}
