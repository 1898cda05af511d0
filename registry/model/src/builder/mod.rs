// Licensed under the Apache-2.0 license

//! Ingestion of a `vk.xml` document into per-kind entity collections.
//!
//! The implementation is split across submodules, each an `impl
//! RegistryBuilder` block for one family of sections:
//! - `enums`: constants and enumerator blocks
//! - `types`: the `<types>` section, dispatched on attribute fingerprints
//! - `commands`: the `<commands>` section
//! - `features`: `<feature>` and `<extensions>` requirement lists
//!
//! No cross-entity resolution happens here. That is the job of
//! [`Registry::build`].

mod commands;
mod enums;
mod features;
mod types;
pub(crate) mod xml;

use std::collections::BTreeMap;

use log::debug;
use roxmltree::{Document, Node};

use crate::entity::*;
use crate::error::Result;
use crate::Registry;
use xml::{attr, check_attributes, child_elements, line, schema};

/// An `<enums>` block waiting to be attached to its enum type.
#[derive(Clone, Debug)]
pub(crate) struct EnumBlock {
    pub name: String,
    pub bitwidth: Option<u32>,
    pub entries: Vec<Entity>,
    pub line: u32,
}

/// A feature or extension together with the enumerators it declares.
#[derive(Clone, Debug)]
pub(crate) struct Pending<T> {
    pub item: T,
    pub extension_enums: Vec<Entity>,
}

/// Everything read from the document, grouped by kind, before any symbol is
/// registered.
#[derive(Clone, Debug, Default)]
pub struct RegistryBuilder {
    pub(crate) constants: Vec<Entity>,
    pub(crate) selections: Vec<EnumBlock>,
    pub(crate) bitmasks: Vec<EnumBlock>,
    pub(crate) platforms: BTreeMap<String, Platform>,
    pub(crate) tags: Vec<Tag>,
    pub(crate) includes: Vec<String>,
    pub(crate) external_types: Vec<Entity>,
    pub(crate) defines: Vec<Entity>,
    pub(crate) basetypes: Vec<Entity>,
    pub(crate) bitmask_types: Vec<Entity>,
    pub(crate) enum_types: Vec<Entity>,
    pub(crate) handles: Vec<Entity>,
    pub(crate) structs: Vec<Entity>,
    pub(crate) func_pointers: Vec<Entity>,
    pub(crate) commands: Vec<Entity>,
    pub(crate) aliases: Vec<Alias>,
    pub(crate) features: Vec<Pending<Feature>>,
    pub(crate) extensions: Vec<Pending<Extension>>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `text` as XML and ingest it.
    pub fn ingest_str(&mut self, text: &str) -> Result<()> {
        let doc = Document::parse(text)?;
        self.ingest_document(&doc)
    }

    /// Ingest every section of an already parsed document.
    pub fn ingest_document(&mut self, doc: &Document<'_>) -> Result<()> {
        let root = doc.root_element();
        if root.tag_name().name() != "registry" {
            return Err(schema(root, "root element must be <registry>"));
        }
        check_attributes(root, &[], &[])?;
        for section in child_elements(root)? {
            let tag = section.tag_name().name();
            debug!("Processing <{}> at line {}", tag, line(section));
            match tag {
                "comment" => {}
                "enums" => self.process_enums(section)?,
                "platforms" => self.process_platforms(section)?,
                "tags" => self.process_tags(section)?,
                "types" => self.process_types(section)?,
                "commands" => self.process_commands(section)?,
                "feature" => self.process_feature(section)?,
                "extensions" => self.process_extensions(section)?,
                other => {
                    return Err(schema(section, format!("unknown registry section <{other}>")))
                }
            }
        }
        Ok(())
    }

    /// Register and resolve everything ingested so far.
    pub fn build(self) -> Result<Registry> {
        Registry::build(self)
    }

    fn process_platforms(&mut self, node: Node<'_, '_>) -> Result<()> {
        check_attributes(node, &[], &["comment"])?;
        for platform in child_elements(node)? {
            if platform.tag_name().name() != "platform" {
                return Err(schema(platform, "expected <platform>"));
            }
            check_attributes(platform, &["name", "protect"], &["comment"])?;
            let name = attr(platform, "name")?;
            if self.platforms.contains_key(name) {
                return Err(schema(platform, format!("duplicate platform `{name}`")));
            }
            self.platforms.insert(
                name.to_string(),
                Platform {
                    name: name.to_string(),
                    protect: attr(platform, "protect")?.to_string(),
                },
            );
        }
        Ok(())
    }

    fn process_tags(&mut self, node: Node<'_, '_>) -> Result<()> {
        check_attributes(node, &[], &["comment"])?;
        for tag in child_elements(node)? {
            if tag.tag_name().name() != "tag" {
                return Err(schema(tag, "expected <tag>"));
            }
            check_attributes(tag, &["name", "author", "contact"], &[])?;
            self.tags.push(Tag {
                name: attr(tag, "name")?.to_string(),
                author: attr(tag, "author")?.to_string(),
                contact: attr(tag, "contact")?.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
