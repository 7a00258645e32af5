//! Package store for AASX containers.
//!
//! The fixers depend on the [`PackageStore`] trait rather than on container
//! internals, so they can be unit-tested against the in-memory
//! [`MemoryPackage`]. The real thing is [`OpcPackage`], which opens a
//! ZIP-based OPC container, exposes its parts and package-level
//! relationships, and rewrites the archive on [`OpcPackage::flush`].
//!
//! Part names are OPC part URIs with a leading `/` (e.g. `/aasx/data.xml`).

mod content_types;
pub mod memory;
mod opc;
mod rels;

pub use memory::MemoryPackage;
pub use opc::OpcPackage;

/// How a relationship target is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetMode {
    #[default]
    Internal,
    External,
}

/// A typed, identified link from the package to a part.
///
/// `id` is stable identity; `rel_type` cannot be mutated in place. Changing
/// it goes through [`PackageStore::recreate_with_type`], which deletes the
/// relationship and recreates it carrying the id forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub target: String,
    pub target_mode: TargetMode,
    pub rel_type: String,
}

/// Capability interface the fixers consume.
///
/// Parts are enumerated in the container's own stable order so that runs are
/// deterministic. Relationship access is create/delete only: a relationship's
/// type never changes in place.
pub trait PackageStore {
    /// Part names in container order, including relationship-definition
    /// parts, excluding the content-types stream.
    fn part_names(&self) -> Vec<String>;

    /// Declared content type of a part, if any.
    fn content_type(&self, name: &str) -> Option<String>;

    fn read_part(&self, name: &str) -> anyhow::Result<Vec<u8>>;

    /// Truncates and rewrites a part's content.
    fn replace_part(&mut self, name: &str, bytes: Vec<u8>) -> anyhow::Result<()>;

    /// Package-level relationships, in definition order.
    fn relationships(&self) -> Vec<Relationship>;

    fn delete_relationship(&mut self, id: &str) -> anyhow::Result<()>;

    fn create_relationship(&mut self, rel: Relationship) -> anyhow::Result<()>;

    /// Deletes `rel` and recreates it with `new_type`, preserving id, target
    /// and target mode, so references to the relationship by id stay valid.
    fn recreate_with_type(&mut self, rel: &Relationship, new_type: &str) -> anyhow::Result<()> {
        self.delete_relationship(&rel.id)?;
        self.create_relationship(Relationship {
            rel_type: new_type.to_owned(),
            ..rel.clone()
        })
    }
}
