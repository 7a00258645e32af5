use crate::fixers::{Fixer, Reversibility};
use aasfix_package::PackageStore;
use aasfix_types::FixCatalog;
use aasfix_types::uris::OPC_RELATIONSHIPS_NS;
use aasfix_xml::Document;
use anyhow::Context;
use tracing::info;

/// Rewrites the `Type` attribute in persisted relationship definitions.
///
/// The container keeps a redundant textual record of relationship types in
/// its `*.rels` parts. The delete+recreate of the relationship-type fixer
/// does not touch part-level definitions (e.g. the aas-spec relationship
/// under `/aasx/_rels/`), so this pass must follow it with the same catalog
/// to keep `definition.Type == relationship.rel_type` everywhere.
pub struct RelationshipDefinitionFixer;

impl Fixer for RelationshipDefinitionFixer {
    fn name(&self) -> &'static str {
        "relationship-definition"
    }

    fn reversibility(&self) -> Reversibility {
        Reversibility::Reversible
    }

    fn fix(&self, package: &mut dyn PackageStore, catalog: &FixCatalog) -> anyhow::Result<u64> {
        let mut fixed = 0u64;
        for name in package.part_names() {
            if !name.ends_with(".rels") {
                continue;
            }
            info!(part = %name, "processing relationship definition");

            let content = package.read_part(&name)?;
            let mut doc = Document::from_bytes(&content)
                .with_context(|| format!("parse relationship definition {name}"))?;

            let mut changed = 0u64;
            for fix in catalog.fixes() {
                for def in doc
                    .root
                    .children_named_mut(OPC_RELATIONSHIPS_NS, "Relationship")
                {
                    if def.attr("Type") == Some(fix.from.as_str()) {
                        info!(from = %fix.from, to = %fix.to, "fixing incorrect definition type");
                        def.set_attr("Type", &fix.to);
                        changed += 1;
                    }
                }
            }

            if changed > 0 {
                let bytes = doc
                    .to_bytes()
                    .with_context(|| format!("serialize relationship definition {name}"))?;
                package.replace_part(&name, bytes)?;
                fixed += changed;
            }
        }
        Ok(fixed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aasfix_package::MemoryPackage;
    use aasfix_types::uris;
    use pretty_assertions::assert_eq;

    const RELS_CT: &str = "application/vnd.openxmlformats-package.relationships+xml";

    fn rels_part(rel_type: &str) -> String {
        format!(
            concat!(
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
                r#"<Relationship Type="{}" Target="/aasx/data.xml" Id="R2"/>"#,
                r#"</Relationships>"#
            ),
            rel_type
        )
    }

    #[test]
    fn fixes_definitions_in_part_level_rels() {
        let mut pkg = MemoryPackage::new().with_part(
            "/aasx/_rels/aasx-origin.rels",
            RELS_CT,
            rels_part(uris::AAS_SPEC_TYPE_BROKEN),
        );

        let fixed = RelationshipDefinitionFixer
            .fix(&mut pkg, &FixCatalog::builtin())
            .expect("fix");
        assert_eq!(fixed, 1);

        let content = pkg.read_part("/aasx/_rels/aasx-origin.rels").expect("read");
        let doc = Document::from_bytes(&content).expect("parse");
        let def = doc
            .root
            .find_child(OPC_RELATIONSHIPS_NS, "Relationship")
            .expect("definition");
        assert_eq!(def.attr("Type"), Some(uris::AAS_SPEC_TYPE));
        assert_eq!(def.attr("Id"), Some("R2"));
        assert_eq!(def.attr("Target"), Some("/aasx/data.xml"));
    }

    #[test]
    fn non_rels_parts_are_ignored() {
        let xml = rels_part(uris::AAS_SPEC_TYPE_BROKEN);
        let mut pkg = MemoryPackage::new().with_part("/aasx/data.xml", "text/xml", xml.clone());

        let fixed = RelationshipDefinitionFixer
            .fix(&mut pkg, &FixCatalog::builtin())
            .expect("fix");
        assert_eq!(fixed, 0);
        assert_eq!(
            pkg.read_part("/aasx/data.xml").expect("read"),
            xml.into_bytes()
        );
    }

    #[test]
    fn unchanged_rels_part_keeps_its_original_bytes() {
        let xml = rels_part(uris::AAS_SPEC_TYPE);
        let mut pkg =
            MemoryPackage::new().with_part("/aasx/_rels/aasx-origin.rels", RELS_CT, xml.clone());

        let fixed = RelationshipDefinitionFixer
            .fix(&mut pkg, &FixCatalog::builtin())
            .expect("fix");
        assert_eq!(fixed, 0);
        assert_eq!(
            pkg.read_part("/aasx/_rels/aasx-origin.rels").expect("read"),
            xml.into_bytes()
        );
    }

    #[test]
    fn fix_then_unfix_restores_the_definition() {
        let original = rels_part(uris::AAS_SPEC_TYPE_BROKEN);
        let mut pkg =
            MemoryPackage::new().with_part("/aasx/_rels/aasx-origin.rels", RELS_CT, original);

        let catalog = FixCatalog::builtin();
        RelationshipDefinitionFixer.fix(&mut pkg, &catalog).expect("fix");

        let mut reversed = catalog.clone();
        reversed.reverse();
        RelationshipDefinitionFixer.fix(&mut pkg, &reversed).expect("unfix");

        let content = pkg.read_part("/aasx/_rels/aasx-origin.rels").expect("read");
        let doc = Document::from_bytes(&content).expect("parse");
        let def = doc
            .root
            .find_child(OPC_RELATIONSHIPS_NS, "Relationship")
            .expect("definition");
        assert_eq!(def.attr("Type"), Some(uris::AAS_SPEC_TYPE_BROKEN));
    }
}
