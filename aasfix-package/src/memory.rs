//! In-memory package store for unit tests and embedding.

use crate::{PackageStore, Relationship};
use anyhow::{Context, bail};

/// A [`PackageStore`] holding parts and relationships in plain vectors.
///
/// Enumeration order is insertion order, which keeps tests deterministic
/// without a container on disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryPackage {
    parts: Vec<Part>,
    relationships: Vec<Relationship>,
}

#[derive(Debug, Clone)]
struct Part {
    name: String,
    content_type: String,
    content: Vec<u8>,
}

impl MemoryPackage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_part(
        mut self,
        name: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        self.parts.push(Part {
            name: name.into(),
            content_type: content_type.into(),
            content: content.into(),
        });
        self
    }

    pub fn with_relationship(mut self, rel: Relationship) -> Self {
        self.relationships.push(rel);
        self
    }
}

impl PackageStore for MemoryPackage {
    fn part_names(&self) -> Vec<String> {
        self.parts.iter().map(|p| p.name.clone()).collect()
    }

    fn content_type(&self, name: &str) -> Option<String> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.content_type.clone())
    }

    fn read_part(&self, name: &str) -> anyhow::Result<Vec<u8>> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.content.clone())
            .with_context(|| format!("no part {name}"))
    }

    fn replace_part(&mut self, name: &str, bytes: Vec<u8>) -> anyhow::Result<()> {
        let part = self
            .parts
            .iter_mut()
            .find(|p| p.name == name)
            .with_context(|| format!("no part {name}"))?;
        part.content = bytes;
        Ok(())
    }

    fn relationships(&self) -> Vec<Relationship> {
        self.relationships.clone()
    }

    fn delete_relationship(&mut self, id: &str) -> anyhow::Result<()> {
        let index = self
            .relationships
            .iter()
            .position(|r| r.id == id)
            .with_context(|| format!("no relationship with id {id}"))?;
        self.relationships.remove(index);
        Ok(())
    }

    fn create_relationship(&mut self, rel: Relationship) -> anyhow::Result<()> {
        if self.relationships.iter().any(|r| r.id == rel.id) {
            bail!("relationship id {} already exists", rel.id);
        }
        self.relationships.push(rel);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TargetMode;

    fn rel(id: &str, rel_type: &str) -> Relationship {
        Relationship {
            id: id.to_owned(),
            target: "/aasx/aasx-origin".to_owned(),
            target_mode: TargetMode::Internal,
            rel_type: rel_type.to_owned(),
        }
    }

    #[test]
    fn recreate_with_type_preserves_identity() {
        let mut pkg = MemoryPackage::new().with_relationship(rel("R1", "old-type"));
        let existing = pkg.relationships()[0].clone();
        pkg.recreate_with_type(&existing, "new-type").expect("recreate");

        let rels = pkg.relationships();
        assert_eq!(rels.len(), 1);
        assert_eq!(rels[0].id, "R1");
        assert_eq!(rels[0].rel_type, "new-type");
        assert_eq!(rels[0].target, existing.target);
        assert_eq!(rels[0].target_mode, existing.target_mode);
    }

    #[test]
    fn duplicate_relationship_id_is_rejected() {
        let mut pkg = MemoryPackage::new().with_relationship(rel("R1", "t"));
        assert!(pkg.create_relationship(rel("R1", "u")).is_err());
    }
}
