use crate::fixers::{Fixer, Reversibility, xml_parts};
use aasfix_package::PackageStore;
use aasfix_types::FixCatalog;
use aasfix_types::uris::{AAS_NS_DEPRECATED, AAS_NS_V3};
use aasfix_xml::Document;
use anyhow::Context;
use tracing::info;

/// Migrates elements from the deprecated 1.0/2.0 AAS namespaces to the
/// current 3.0 namespace.
///
/// Only the namespace component of a matched element's qualified name
/// changes; local name, attributes, children and ordering stay untouched.
/// The catalog carries no downgrade direction, so this pass is one-way.
pub struct VersionFixer;

impl Fixer for VersionFixer {
    fn name(&self) -> &'static str {
        "version"
    }

    fn reversibility(&self) -> Reversibility {
        Reversibility::OneWay
    }

    fn fix(&self, package: &mut dyn PackageStore, _catalog: &FixCatalog) -> anyhow::Result<u64> {
        let mut converted_total = 0u64;
        for name in xml_parts(package) {
            let content = package.read_part(&name)?;
            let mut doc =
                Document::from_bytes(&content).with_context(|| format!("parse part {name}"))?;

            let mut converted = 0u64;
            doc.root.walk_mut(&mut |el| {
                if el
                    .ns
                    .as_deref()
                    .is_some_and(|ns| AAS_NS_DEPRECATED.contains(&ns))
                {
                    el.ns = Some(AAS_NS_V3.to_owned());
                    converted += 1;
                }
            });

            if converted > 0 {
                info!(part = %name, converted, "converting XML to version 3");
                let bytes = doc
                    .to_bytes()
                    .with_context(|| format!("serialize part {name}"))?;
                package.replace_part(&name, bytes)?;
                converted_total += converted;
            }
        }
        Ok(converted_total)
    }
}
