// Licensed under the Apache-2.0 license

//! The resolved registry and its symbol table.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use log::{debug, info};

use crate::builder::{EnumBlock, Pending, RegistryBuilder};
use crate::entity::*;
use crate::error::{RegistryError, Result};

/// The fully resolved model of one registry document.
///
/// Entities live in an arena and are addressed by [`EntityIdx`]. The symbol
/// table maps every primary name and every alias to the index of the one
/// canonical entity behind it.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    pub(crate) entities: Vec<Entity>,
    pub(crate) symbols: HashMap<String, EntityIdx>,
    pub(crate) platforms: BTreeMap<String, Platform>,
    pub(crate) tags: Vec<Tag>,
    pub(crate) includes: Vec<String>,
    pub(crate) features: Vec<Feature>,
    pub(crate) extensions: Vec<Extension>,
}

impl Registry {
    /// Parse and resolve a registry document held in memory.
    pub fn parse(text: &str) -> Result<Self> {
        let mut builder = RegistryBuilder::new();
        builder.ingest_str(text)?;
        builder.build()
    }

    /// Read, parse and resolve a registry document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| RegistryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&text)
    }

    /// Register everything the builder collected, then run the resolution,
    /// reference-marking and platform-tagging passes.
    pub fn build(builder: RegistryBuilder) -> Result<Self> {
        let mut registry = Registry::register(builder)?;
        registry.resolve()?;
        registry.mark_references()?;
        registry.bind_platforms()?;
        info!(
            "Resolved registry: {} entities, {} symbols, {} unreferenced",
            registry.entities.len(),
            registry.symbols.len(),
            registry.unreferenced().count()
        );
        Ok(registry)
    }

    fn register(builder: RegistryBuilder) -> Result<Self> {
        let RegistryBuilder {
            constants,
            selections,
            bitmasks,
            platforms,
            tags,
            includes,
            external_types,
            defines,
            basetypes,
            bitmask_types,
            enum_types,
            handles,
            structs,
            func_pointers,
            commands,
            aliases,
            features,
            extensions,
        } = builder;

        let mut registry = Registry {
            platforms,
            tags,
            includes,
            ..Default::default()
        };

        registry.insert(Entity::new(PLATFORM_PLACEHOLDER, 0, EntityKind::Placeholder))?;
        registry.insert_all("constants", constants)?;
        registry.insert_all("external types", external_types)?;
        registry.insert_all("defines", defines)?;
        registry.insert_all("basetypes", basetypes)?;
        registry.insert_all("bitmask types", bitmask_types)?;
        registry.insert_all("enum types", enum_types)?;
        for block in bitmasks {
            registry.attach_block(block, true)?;
        }
        for block in selections {
            registry.attach_block(block, false)?;
        }
        registry.insert_all("handles", handles)?;
        registry.insert_all("structs", structs)?;
        registry.insert_all("funcpointers", func_pointers)?;
        registry.insert_all("commands", commands)?;
        for alias in &aliases {
            registry.bind_alias(alias)?;
        }
        debug!("Bound {} aliases", aliases.len());

        for Pending {
            mut item,
            extension_enums,
        } in features
        {
            item.require.extension_enums = registry.insert_all("feature enums", extension_enums)?;
            registry.features.push(item);
        }
        for Pending {
            mut item,
            extension_enums,
        } in extensions
        {
            item.require.extension_enums =
                registry.insert_all("extension enums", extension_enums)?;
            registry.extensions.push(item);
        }
        Ok(registry)
    }

    fn insert(&mut self, entity: Entity) -> Result<EntityIdx> {
        if let Some(&existing) = self.symbols.get(&entity.name) {
            return Err(RegistryError::DuplicateSymbol {
                name: entity.name,
                existing: self.entities[existing].kind.label(),
                new: entity.kind.label(),
            });
        }
        let idx = self.entities.len();
        self.symbols.insert(entity.name.clone(), idx);
        self.entities.push(entity);
        Ok(idx)
    }

    fn insert_all(&mut self, what: &str, entities: Vec<Entity>) -> Result<Vec<EntityIdx>> {
        let ids = entities
            .into_iter()
            .map(|e| self.insert(e))
            .collect::<Result<Vec<_>>>()?;
        debug!("Registered {} {}", ids.len(), what);
        Ok(ids)
    }

    /// Register the entries of an `<enums>` block and hand them to the enum
    /// type of the same name.
    fn attach_block(&mut self, block: EnumBlock, bitmask: bool) -> Result<()> {
        let owner = *self
            .symbols
            .get(&block.name)
            .ok_or_else(|| RegistryError::UnresolvedReference {
                name: block.name.clone(),
                referrer: format!("<enums> block at line {}", block.line),
            })?;
        let schema = |message: String| RegistryError::SchemaViolation {
            element: "enums".into(),
            line: block.line,
            message,
        };
        match self.entities[owner].kind.as_enum_type() {
            None => {
                return Err(schema(format!(
                    "`{}` is a {}, not an enum type",
                    block.name,
                    self.entities[owner].kind.label()
                )))
            }
            Some(e) if e.body.is_some() => {
                return Err(schema(format!(
                    "enum type `{}` already has enumerators",
                    block.name
                )))
            }
            Some(_) => {}
        }
        let ids = self.insert_all(&block.name, block.entries)?;
        if let Some(enum_type) = self.entities[owner].kind.as_enum_type_mut() {
            enum_type.bitwidth = block.bitwidth;
            enum_type.body = Some(if bitmask {
                EnumBody::Bitmask(ids)
            } else {
                EnumBody::Selection(ids)
            });
        }
        Ok(())
    }

    fn bind_alias(&mut self, alias: &Alias) -> Result<()> {
        let referrer = || format!("alias `{}` at line {}", alias.name, alias.line);
        let target = *self
            .symbols
            .get(&alias.target)
            .ok_or_else(|| RegistryError::UnresolvedReference {
                name: alias.target.clone(),
                referrer: referrer(),
            })?;
        if self.entities[target].name != alias.target {
            return Err(RegistryError::UnresolvedReference {
                name: alias.target.clone(),
                referrer: format!(
                    "{} (the target is itself an alias of `{}`)",
                    referrer(),
                    self.entities[target].name
                ),
            });
        }
        if let Some(&existing) = self.symbols.get(&alias.name) {
            return Err(RegistryError::DuplicateSymbol {
                name: alias.name.clone(),
                existing: self.entities[existing].kind.label(),
                new: "alias",
            });
        }
        self.entities[target].aliases.push(alias.name.clone());
        self.symbols.insert(alias.name.clone(), target);
        Ok(())
    }

    //=========================================================================
    // Lookups
    //=========================================================================

    /// Index of the entity a name (primary or alias) refers to.
    pub fn lookup(&self, name: &str) -> Option<EntityIdx> {
        self.symbols.get(name).copied()
    }

    pub fn get(&self, name: &str) -> Option<&Entity> {
        self.lookup(name).map(|idx| &self.entities[idx])
    }

    /// The entity at `idx`. Indices come from this registry, so they are
    /// always in bounds.
    pub fn entity(&self, idx: EntityIdx) -> &Entity {
        &self.entities[idx]
    }

    /// Every canonical entity, once each, in registration order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityIdx, &Entity)> {
        self.entities.iter().enumerate()
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Number of names in the symbol table, aliases included.
    pub fn symbol_count(&self) -> usize {
        self.symbols.len()
    }

    /// True if `name` is registered as a secondary name.
    pub fn is_alias(&self, name: &str) -> bool {
        self.get(name).is_some_and(|e| e.name != name)
    }

    pub fn platforms(&self) -> &BTreeMap<String, Platform> {
        &self.platforms
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Every extension enum, features first, each in document order.
    pub fn extension_enums(&self) -> impl Iterator<Item = EntityIdx> + '_ {
        self.features
            .iter()
            .map(|f| &f.require)
            .chain(self.extensions.iter().map(|e| &e.require))
            .flat_map(|r| r.extension_enums.iter().copied())
    }

    /// Entities no feature or extension requires, in registration order.
    /// The bootstrap placeholder is not counted.
    pub fn unreferenced(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(|e| !e.referenced && !matches!(e.kind, EntityKind::Placeholder))
    }

    /// Number of canonical entities per kind label.
    pub fn kind_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for entity in &self.entities {
            *counts.entry(entity.kind.label()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(body: &str) -> Result<Registry> {
        Registry::parse(&format!("<registry>{body}</registry>"))
    }

    #[test]
    fn test_placeholder_is_registered_first() {
        let reg = registry("").unwrap();
        assert_eq!(reg.lookup(PLATFORM_PLACEHOLDER), Some(0));
        assert_eq!(reg.entity_count(), 1);
        assert_eq!(reg.unreferenced().count(), 0);
    }

    #[test]
    fn test_duplicate_across_kinds() {
        let err = registry(
            r#"<enums name="API Constants"><enum name="VkThing" value="1"/></enums>
               <types><type category="struct" name="VkThing"/></types>"#,
        )
        .unwrap_err();
        match err {
            RegistryError::DuplicateSymbol {
                name,
                existing,
                new,
            } => {
                assert_eq!(name, "VkThing");
                assert_eq!(existing, "constant");
                assert_eq!(new, "struct");
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_placeholder_name_is_taken() {
        assert!(matches!(
            registry(r#"<types><type name="vk_platform"/></types>"#),
            Err(RegistryError::DuplicateSymbol { .. })
        ));
    }

    #[test]
    fn test_alias_of_alias_rejected() {
        let err = registry(
            r#"<types>
                 <type category="struct" name="VkA"/>
                 <type category="struct" name="VkB" alias="VkA"/>
                 <type category="struct" name="VkC" alias="VkB"/>
               </types>"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::UnresolvedReference { ref name, .. } if name == "VkB"));
    }

    #[test]
    fn test_alias_onto_used_name() {
        let err = registry(
            r#"<types>
                 <type category="struct" name="VkA"/>
                 <type category="struct" name="VkB"/>
                 <type category="struct" name="VkB" alias="VkA"/>
               </types>"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateSymbol { new: "alias", .. }));
    }

    #[test]
    fn test_block_without_enum_type() {
        let err = registry(
            r#"<enums name="VkMissing" type="enum"><enum name="VK_A" value="0"/></enums>"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::UnresolvedReference { ref name, .. } if name == "VkMissing"));
    }

    #[test]
    fn test_block_attached_twice() {
        let err = registry(
            r#"<types><type category="enum" name="VkE"/></types>
               <enums name="VkE" type="enum"><enum name="VK_E_A" value="0"/></enums>
               <enums name="VkE" type="enum"><enum name="VK_E_B" value="1"/></enums>"#,
        )
        .unwrap_err();
        assert!(matches!(err, RegistryError::SchemaViolation { .. }));
    }

    #[test]
    fn test_kind_counts() {
        let reg = registry(
            r#"<types>
                 <type category="enum" name="VkE"/>
                 <type category="struct" name="VkS"/>
                 <type category="union" name="VkU"/>
               </types>
               <enums name="VkE" type="enum">
                 <enum name="VK_E_A" value="0"/>
                 <enum name="VK_E_B" value="1"/>
               </enums>"#,
        )
        .unwrap();
        let counts = reg.kind_counts();
        assert_eq!(counts["selector"], 2);
        assert_eq!(counts["struct"], 1);
        assert_eq!(counts["union"], 1);
        assert_eq!(counts["enum type"], 1);
        let e = reg.get("VkE").unwrap().kind.as_enum_type().unwrap();
        assert_eq!(e.members().len(), 2);
        assert!(!e.is_bitmask());
    }
}
