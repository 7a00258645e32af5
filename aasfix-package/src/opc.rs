//! ZIP-backed OPC container.

use crate::content_types::ContentTypes;
use crate::{PackageStore, Relationship, rels};
use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use std::io::{Cursor, Read, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const CONTENT_TYPES_STREAM: &str = "[Content_Types].xml";
const PACKAGE_RELS_PART: &str = "/_rels/.rels";

/// An open AASX container, held fully in memory until [`OpcPackage::flush`]
/// rewrites the archive at the path it was opened from.
///
/// The package-level relationship list is parsed from `/_rels/.rels` at open.
/// Relationship create/delete mutate the live list only; `flush` serializes
/// it back over that part, so the persisted definitions and the live list
/// agree again once the package is written.
#[derive(Debug)]
pub struct OpcPackage {
    path: Utf8PathBuf,
    /// `(part name with leading slash, content)` in central-directory order.
    entries: Vec<(String, Vec<u8>)>,
    content_types_raw: Vec<u8>,
    content_types: ContentTypes,
    relationships: Vec<Relationship>,
    rels_dirty: bool,
}

impl OpcPackage {
    /// Opens the container at `path` for read-write access.
    pub fn open(path: &Utf8Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("read container {path}"))?;
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .with_context(|| format!("open container {path}"))?;

        let mut entries = Vec::new();
        let mut content_types_raw = None;
        for index in 0..archive.len() {
            let mut file = archive
                .by_index(index)
                .with_context(|| format!("read entry #{index} of {path}"))?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_owned();
            let mut content = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut content)
                .with_context(|| format!("read entry {name} of {path}"))?;
            if name == CONTENT_TYPES_STREAM {
                content_types_raw = Some(content);
            } else {
                entries.push((format!("/{name}"), content));
            }
        }

        let content_types_raw = content_types_raw
            .with_context(|| format!("{path} has no {CONTENT_TYPES_STREAM} stream"))?;
        let content_types = ContentTypes::parse(&content_types_raw)?;

        let relationships = match entries.iter().find(|(name, _)| name == PACKAGE_RELS_PART) {
            Some((_, content)) => rels::parse(content)
                .with_context(|| format!("parse {PACKAGE_RELS_PART} of {path}"))?,
            None => Vec::new(),
        };

        debug!(
            container = %path,
            parts = entries.len(),
            relationships = relationships.len(),
            "opened container"
        );
        Ok(Self {
            path: path.to_owned(),
            entries,
            content_types_raw,
            content_types,
            relationships,
            rels_dirty: false,
        })
    }

    /// Rewrites the archive on disk: the content-types stream first, then
    /// every part in its original order. If the relationship list changed,
    /// `/_rels/.rels` is regenerated from it, superseding any direct edit of
    /// that part's bytes.
    pub fn flush(&mut self) -> anyhow::Result<()> {
        if self.rels_dirty {
            let serialized = rels::serialize(&self.relationships)?;
            match self
                .entries
                .iter_mut()
                .find(|(name, _)| name == PACKAGE_RELS_PART)
            {
                Some((_, content)) => *content = serialized,
                None => self.entries.insert(0, (PACKAGE_RELS_PART.to_owned(), serialized)),
            }
            self.rels_dirty = false;
        }

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        writer
            .start_file(CONTENT_TYPES_STREAM, options)
            .context("write content-types stream")?;
        writer
            .write_all(&self.content_types_raw)
            .context("write content-types stream")?;

        for (name, content) in &self.entries {
            let zip_name = name.trim_start_matches('/');
            writer
                .start_file(zip_name, options)
                .with_context(|| format!("write entry {name}"))?;
            writer
                .write_all(content)
                .with_context(|| format!("write entry {name}"))?;
        }

        let buffer = writer.finish().context("finalize container")?.into_inner();
        fs::write(&self.path, buffer).with_context(|| format!("write container {}", self.path))?;
        Ok(())
    }

    fn entry_index(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|(n, _)| n == name)
    }
}

impl PackageStore for OpcPackage {
    fn part_names(&self) -> Vec<String> {
        self.entries.iter().map(|(name, _)| name.clone()).collect()
    }

    fn content_type(&self, name: &str) -> Option<String> {
        self.content_types.content_type_for(name).map(str::to_owned)
    }

    fn read_part(&self, name: &str) -> anyhow::Result<Vec<u8>> {
        let index = self
            .entry_index(name)
            .with_context(|| format!("no part {name} in {}", self.path))?;
        Ok(self.entries[index].1.clone())
    }

    fn replace_part(&mut self, name: &str, bytes: Vec<u8>) -> anyhow::Result<()> {
        let index = self
            .entry_index(name)
            .with_context(|| format!("no part {name} in {}", self.path))?;
        self.entries[index].1 = bytes;
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
        self.rels_dirty = true;
        Ok(())
    }

    fn create_relationship(&mut self, rel: Relationship) -> anyhow::Result<()> {
        if self.relationships.iter().any(|r| r.id == rel.id) {
            bail!("relationship id {} already exists", rel.id);
        }
        self.relationships.push(rel);
        self.rels_dirty = true;
        Ok(())
    }
}
