// Licensed under the Apache-2.0 license

use std::collections::{BTreeSet, HashMap};

use log::{debug, info};
use vk_registry_model::{Entity, EntityIdx, EntityKind, ExtensionValue, FlagValue, Registry};

use crate::output::{Bitmask, Constant, Enumeration, Enumerator, EnumeratorValue, NormalizedRegistry};
use crate::util::{common_prefix_len, remove_marker_word, strip_registry_prefix, underscore_style};
use crate::{NamingConfig, NamingError};

/// Longest alias chain followed before giving up.
const MAX_ALIAS_DEPTH: usize = 16;

/// Canonical base name of a type, e.g. `VkImageType` to `image_type`.
pub fn translate_type(config: &NamingConfig, raw: &str) -> Result<String, NamingError> {
    underscore_style(strip_registry_prefix(raw, &config.type_prefix)?)
}

/// Canonical base name of an enumerator or constant, e.g.
/// `VK_IMAGE_TYPE_1D` to `image_type_1d`.
pub fn translate_enumerator(config: &NamingConfig, raw: &str) -> Result<String, NamingError> {
    underscore_style(strip_registry_prefix(raw, &config.enumerator_prefix)?)
}

/// Derive canonical names for every enumeration, bitmask and constant of
/// `registry`. Each output list is sorted by canonical name.
pub fn normalize(registry: &Registry, config: &NamingConfig) -> Result<NormalizedRegistry, NamingError> {
    Normalizer::new(registry, config).run()
}

struct Normalizer<'a> {
    registry: &'a Registry,
    config: &'a NamingConfig,
    /// Raw names of alias extension enums, keyed by the entity they
    /// ultimately alias.
    extension_aliases: HashMap<EntityIdx, Vec<&'a str>>,
    /// Non-alias extension enums, keyed by the enumeration they extend.
    extension_members: HashMap<EntityIdx, Vec<EntityIdx>>,
}

impl<'a> Normalizer<'a> {
    fn new(registry: &'a Registry, config: &'a NamingConfig) -> Self {
        let mut extension_aliases: HashMap<EntityIdx, Vec<&'a str>> = HashMap::new();
        let mut extension_members: HashMap<EntityIdx, Vec<EntityIdx>> = HashMap::new();
        for idx in registry.extension_enums() {
            let entity = registry.entity(idx);
            let Some(ext) = entity.kind.as_extension_enum() else {
                continue;
            };
            if ext.value.alias().is_some() {
                if let Some(target) = Self::alias_target(registry, idx) {
                    extension_aliases
                        .entry(target)
                        .or_default()
                        .push(entity.name.as_str());
                }
            } else if let Some(extends) = ext.extends_idx {
                extension_members.entry(extends).or_default().push(idx);
            }
        }
        Self {
            registry,
            config,
            extension_aliases,
            extension_members,
        }
    }

    /// Follows alias extension enums to the first entity that is not one.
    fn alias_target(registry: &Registry, mut idx: EntityIdx) -> Option<EntityIdx> {
        for _ in 0..MAX_ALIAS_DEPTH {
            match registry.entity(idx).kind.as_extension_enum() {
                Some(ext) if ext.value.alias().is_some() => idx = ext.alias_idx?,
                _ => return Some(idx),
            }
        }
        None
    }

    fn run(&self) -> Result<NormalizedRegistry, NamingError> {
        let claimed: BTreeSet<EntityIdx> = self
            .registry
            .entities()
            .filter_map(|(_, e)| e.kind.as_bitmask_type()?.requires_idx)
            .collect();

        let mut out = NormalizedRegistry::default();
        for (idx, entity) in self.registry.entities() {
            match &entity.kind {
                EntityKind::EnumType(_) if !claimed.contains(&idx) => {
                    let base = translate_type(self.config, &entity.name)?;
                    out.enumerations.push(self.enumeration(idx, &base)?);
                }
                EntityKind::BitmaskType(bitmask) => {
                    let base = translate_type(self.config, &entity.name)?;
                    let enumeration = bitmask
                        .requires_idx
                        .map(|bits| self.enumeration(bits, &base))
                        .transpose()?;
                    out.bitmasks.push(Bitmask {
                        name: base,
                        raw_name: entity.name.clone(),
                        aliases: self.type_aliases(entity)?,
                        guard: guard(entity),
                        flags_type: bitmask.flags_type.clone(),
                        enumeration,
                    });
                }
                EntityKind::Constant(constant) => {
                    if let Some(c) = self.constant(idx, &constant.value)? {
                        out.constants.push(c);
                    }
                }
                EntityKind::ExtensionEnum(ext) if ext.extends.is_none() => {
                    if let ExtensionValue::Value(value) = &ext.value {
                        if let Some(c) = self.constant(idx, value)? {
                            out.constants.push(c);
                        }
                    }
                }
                _ => {}
            }
        }

        out.enumerations
            .sort_by(|a, b| (&a.name, &a.raw_name).cmp(&(&b.name, &b.raw_name)));
        out.bitmasks
            .sort_by(|a, b| (&a.name, &a.raw_name).cmp(&(&b.name, &b.raw_name)));
        out.constants
            .sort_by(|a, b| (&a.name, &a.raw_name).cmp(&(&b.name, &b.raw_name)));
        info!(
            "Normalized {} enumerations, {} bitmasks, {} constants",
            out.enumerations.len(),
            out.bitmasks.len(),
            out.constants.len()
        );
        Ok(out)
    }

    fn type_aliases(&self, entity: &Entity) -> Result<Vec<String>, NamingError> {
        let mut aliases = entity
            .aliases
            .iter()
            .map(|a| translate_type(self.config, a))
            .collect::<Result<Vec<_>, _>>()?;
        aliases.sort();
        aliases.dedup();
        Ok(aliases)
    }

    /// Raw alias names of an enumerator or constant: those bound in the
    /// symbol table plus alias extension enums pointing at it.
    fn raw_aliases(&self, idx: EntityIdx) -> impl Iterator<Item = &'a str> + '_ {
        let registry: &'a Registry = self.registry;
        registry
            .entity(idx)
            .aliases
            .iter()
            .map(String::as_str)
            .chain(self.extension_aliases.get(&idx).into_iter().flatten().copied())
    }

    /// Enumerators lose the longest word-aligned prefix they share with
    /// `prefix_base`, the canonical name of the enumeration or of the
    /// bitmask it backs.
    fn enumeration(&self, idx: EntityIdx, prefix_base: &str) -> Result<Enumeration, NamingError> {
        let entity = self.registry.entity(idx);
        let bits = entity.kind.as_enum_type().is_some_and(|e| e.is_bitmask());
        let base = translate_type(self.config, &entity.name)?;

        let mut members: Vec<EntityIdx> = entity
            .kind
            .as_enum_type()
            .map(|e| e.members().to_vec())
            .unwrap_or_default();
        if let Some(added) = self.extension_members.get(&idx) {
            members.extend(added);
        }

        let translated = members
            .iter()
            .map(|&m| translate_enumerator(self.config, &self.registry.entity(m).name))
            .collect::<Result<Vec<_>, _>>()?;
        let enum_prefix = format!("{prefix_base}_");
        let candidates: Vec<&str> = std::iter::once(enum_prefix.as_str())
            .chain(translated.iter().map(String::as_str))
            .collect();
        let prefix = &enum_prefix[..common_prefix_len(&candidates)];

        let strip = |name: &str| -> String {
            let name = name.strip_prefix(prefix).unwrap_or(name);
            let name = if bits {
                remove_marker_word(name, &self.config.bit_marker)
            } else {
                name.to_string()
            };
            self.config.fix_name(&name)
        };

        let mut enumerators = Vec::with_capacity(members.len());
        for (&m, name) in members.iter().zip(&translated) {
            let member = self.registry.entity(m);
            let mut aliases = self
                .raw_aliases(m)
                .map(|raw| -> Result<String, NamingError> {
                    Ok(strip(&translate_enumerator(self.config, raw)?))
                })
                .collect::<Result<Vec<_>, _>>()?;
            aliases.sort();
            aliases.dedup();
            enumerators.push(Enumerator {
                name: strip(name),
                raw_name: member.name.clone(),
                aliases,
                value: enumerator_value(member),
            });
        }

        debug!(
            "{}: stripped `{prefix}` from {} enumerators",
            entity.name,
            enumerators.len()
        );
        Ok(Enumeration {
            name: base,
            raw_name: entity.name.clone(),
            aliases: self.type_aliases(entity)?,
            guard: guard(entity),
            enumerators,
        })
    }

    fn constant(&self, idx: EntityIdx, value: &str) -> Result<Option<Constant>, NamingError> {
        let entity = self.registry.entity(idx);
        if self.config.skip_constants.contains(&entity.name) {
            return Ok(None);
        }
        let mut aliases = self
            .raw_aliases(idx)
            .map(|raw| translate_enumerator(self.config, raw))
            .collect::<Result<Vec<_>, _>>()?;
        aliases.sort();
        aliases.dedup();
        Ok(Some(Constant {
            name: translate_enumerator(self.config, &entity.name)?,
            raw_name: entity.name.clone(),
            aliases,
            guard: guard(entity),
            value: value.to_string(),
        }))
    }
}

fn guard(entity: &Entity) -> Option<String> {
    entity.platform.as_ref().map(|p| p.protect.clone())
}

fn enumerator_value(entity: &Entity) -> EnumeratorValue {
    match &entity.kind {
        EntityKind::Selector(s) => EnumeratorValue::Value(s.value.clone()),
        EntityKind::Flag(flag) => match &flag.value {
            FlagValue::Bitpos(b) => EnumeratorValue::Bitpos(b.clone()),
            FlagValue::Value(v) => EnumeratorValue::Value(v.clone()),
        },
        EntityKind::ExtensionEnum(ext) => match &ext.value {
            ExtensionValue::Value(v) => EnumeratorValue::Value(v.clone()),
            ExtensionValue::Bitpos(b) => EnumeratorValue::Bitpos(b.clone()),
            ExtensionValue::Offset {
                offset,
                extnumber,
                dir,
            } => EnumeratorValue::Offset {
                offset: offset.clone(),
                extnumber: extnumber.clone(),
                dir: dir.clone(),
            },
            // Alias extension enums never become enumerators.
            ExtensionValue::Alias(target) => EnumeratorValue::Value(target.clone()),
        },
        _ => EnumeratorValue::Value(String::new()),
    }
}
