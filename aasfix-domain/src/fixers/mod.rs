use aasfix_package::PackageStore;
use aasfix_types::FixCatalog;

mod empty_semantic_id;
mod external_reference;
mod relationship_definition;
mod relationship_type;
mod version;

pub use empty_semantic_id::EmptySemanticIdFixer;
pub use external_reference::ExternalReferenceFixer;
pub use relationship_definition::RelationshipDefinitionFixer;
pub use relationship_type::RelationshipTypeFixer;
pub use version::VersionFixer;

/// Whether a fixer's transform can be run in the unfix direction.
///
/// A `OneWay` fixer is skipped entirely during an unfix run; applying it
/// there would silently repair a defect the user asked to reintroduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reversibility {
    Reversible,
    OneWay,
}

/// One independent correction pass. Fixers are stateless between
/// invocations; the package store is the only shared mutable state.
pub trait Fixer {
    fn name(&self) -> &'static str;

    fn reversibility(&self) -> Reversibility;

    /// Runs the pass over the open package, returning the number of
    /// corrected nodes.
    fn fix(&self, package: &mut dyn PackageStore, catalog: &FixCatalog) -> anyhow::Result<u64>;
}

/// The built-in fixers in their fixed execution order. The definition fixer
/// must follow the relationship-type fixer so the persisted `Type`
/// attributes stay consistent with the live relationships.
///
/// The empty-semantic-id fixer matches the current namespace only and runs
/// before the version fixer, so an empty `semanticId` under a deprecated
/// namespace is migrated on the first run and removed on a second one. A
/// single run converges for everything else.
pub fn builtin_fixers() -> Vec<Box<dyn Fixer>> {
    vec![
        Box::new(RelationshipTypeFixer),
        Box::new(RelationshipDefinitionFixer),
        Box::new(EmptySemanticIdFixer),
        Box::new(ExternalReferenceFixer),
        Box::new(VersionFixer),
    ]
}

/// Part names eligible for the XML-level fixers, by declared content type.
pub(crate) fn xml_parts(package: &dyn PackageStore) -> Vec<String> {
    package
        .part_names()
        .into_iter()
        .filter(|name| {
            package
                .content_type(name)
                .is_some_and(|ct| aasfix_types::uris::is_xml_content_type(&ct))
        })
        .collect()
}
