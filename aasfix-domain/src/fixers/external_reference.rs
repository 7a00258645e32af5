use crate::fixers::{Fixer, Reversibility, xml_parts};
use aasfix_package::PackageStore;
use aasfix_types::FixCatalog;
use aasfix_types::uris::AAS_NS_V3;
use aasfix_xml::{Document, Element};
use anyhow::Context;
use std::collections::BTreeSet;
use tracing::{info, warn};

/// Reclassifies `ExternalReference` entries that point at local submodels.
///
/// Some producers over-generalize reference classification: a shell's
/// submodel reference typed `ExternalReference` whose first key matches the
/// id of a submodel defined in the same container is really a
/// `ModelReference`. The pass first indexes every locally defined submodel
/// id across the container, then rewrites matching references. The defect is
/// asymmetric, so there is no unfix direction.
pub struct ExternalReferenceFixer;

fn collect_submodel_ids(root: &Element, ids: &mut BTreeSet<String>) {
    for submodels in root.children_named(AAS_NS_V3, "submodels") {
        for submodel in submodels.children_named(AAS_NS_V3, "submodel") {
            if let Some(id) = submodel.find_child(AAS_NS_V3, "id") {
                ids.insert(id.text());
            }
        }
    }
}

/// First key's value of a reference, or `None` for a keyless reference.
fn first_key_value(reference: &Element) -> Option<String> {
    let keys = reference.find_child(AAS_NS_V3, "keys")?;
    let key = keys.children_named(AAS_NS_V3, "key").next()?;
    Some(key.find_child(AAS_NS_V3, "value")?.text())
}

fn reclassify(root: &mut Element, part: &str, index: &BTreeSet<String>) -> u64 {
    let mut fixed = 0u64;
    for shells in root.children_named_mut(AAS_NS_V3, "assetAdministrationShells") {
        for shell in shells.children_named_mut(AAS_NS_V3, "assetAdministrationShell") {
            for submodels in shell.children_named_mut(AAS_NS_V3, "submodels") {
                for reference in submodels.children_named_mut(AAS_NS_V3, "reference") {
                    let is_external = reference
                        .find_child(AAS_NS_V3, "type")
                        .is_some_and(|t| t.text() == "ExternalReference");
                    if !is_external {
                        continue;
                    }
                    let Some(key) = first_key_value(reference) else {
                        warn!(part, "skipping external reference without keys");
                        continue;
                    };
                    if !index.contains(&key) {
                        continue;
                    }
                    info!(part, %key, "reclassifying external reference to a local submodel");
                    if let Some(type_el) = reference.find_child_mut(AAS_NS_V3, "type") {
                        type_el.set_text("ModelReference");
                        fixed += 1;
                    }
                }
            }
        }
    }
    fixed
}

impl Fixer for ExternalReferenceFixer {
    fn name(&self) -> &'static str {
        "external-reference"
    }

    fn reversibility(&self) -> Reversibility {
        Reversibility::OneWay
    }

    fn fix(&self, package: &mut dyn PackageStore, _catalog: &FixCatalog) -> anyhow::Result<u64> {
        let parts = xml_parts(package);

        // Index phase: every locally defined submodel id in the container.
        let mut index = BTreeSet::new();
        for name in &parts {
            let content = package.read_part(name)?;
            let doc =
                Document::from_bytes(&content).with_context(|| format!("parse part {name}"))?;
            collect_submodel_ids(&doc.root, &mut index);
        }

        // Correlate phase: rewrite matching shell submodel references.
        let mut fixed_total = 0u64;
        for name in &parts {
            let content = package.read_part(name)?;
            let mut doc =
                Document::from_bytes(&content).with_context(|| format!("parse part {name}"))?;
            let fixed = reclassify(&mut doc.root, name, &index);
            if fixed > 0 {
                let bytes = doc
                    .to_bytes()
                    .with_context(|| format!("serialize part {name}"))?;
                package.replace_part(name, bytes)?;
                fixed_total += fixed;
            }
        }
        Ok(fixed_total)
    }
}
