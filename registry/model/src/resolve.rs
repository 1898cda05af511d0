// Licensed under the Apache-2.0 license

//! Cross-reference resolution, liveness marking and platform tagging.
//!
//! This module contains the `impl Registry` block run once every symbol is
//! registered. Each pass walks the arena, so an entity reachable under
//! several names is visited exactly once.

use std::collections::HashMap;

use log::{debug, warn};

use crate::entity::*;
use crate::error::{RegistryError, Result};
use crate::Registry;

/// Links discovered for one entity while the arena is borrowed immutably.
enum Resolved {
    Nothing,
    Bitmask(Option<EntityIdx>),
    ExtensionEnum {
        extends: Option<EntityIdx>,
        alias: Option<EntityIdx>,
    },
}

fn find(
    symbols: &HashMap<String, EntityIdx>,
    name: &str,
    referrer: impl FnOnce() -> String,
) -> Result<EntityIdx> {
    symbols
        .get(name)
        .copied()
        .ok_or_else(|| RegistryError::UnresolvedReference {
            name: name.to_string(),
            referrer: referrer(),
        })
}

impl Registry {
    fn resolve_name(&self, name: &str, referrer: impl FnOnce() -> String) -> Result<EntityIdx> {
        find(&self.symbols, name, referrer)
    }

    /// Resolves `name` and checks the kind of what it names, reporting a
    /// mismatch against the element that made the reference.
    fn resolve_kind(
        &self,
        name: &str,
        element: &str,
        wanted: &str,
        referrer: impl FnOnce() -> String,
        accept: impl FnOnce(&EntityKind) -> bool,
    ) -> Result<EntityIdx> {
        let referrer = referrer();
        let idx = self.resolve_name(name, || referrer.clone())?;
        let target = &self.entities[idx];
        if !accept(&target.kind) {
            return Err(RegistryError::SchemaViolation {
                element: element.into(),
                line: target.line,
                message: format!(
                    "{referrer} names `{name}`, which is a {} rather than {wanted}",
                    target.kind.label()
                ),
            });
        }
        Ok(idx)
    }

    fn resolve_member(&self, owner: &str, member: &Member) -> Result<()> {
        let referrer = || format!("`{}` of `{owner}`", member.name);
        self.resolve_name(member.ty.base_name(), referrer)?;
        for len in member.ty.named_lengths() {
            self.resolve_kind(
                len,
                "member",
                "a constant",
                || format!("array length of `{}` in `{owner}`", member.name),
                |kind| match kind {
                    EntityKind::Constant(_) => true,
                    EntityKind::ExtensionEnum(e) => matches!(e.value, ExtensionValue::Value(_)),
                    _ => false,
                },
            )?;
        }
        if let Some(values) = &member.values {
            self.resolve_kind(
                values,
                "member",
                "an enumerator",
                || format!("values of `{}` in `{owner}`", member.name),
                |kind| matches!(kind, EntityKind::Selector(_) | EntityKind::ExtensionEnum(_)),
            )?;
        }
        Ok(())
    }

    /// Enum types are the only things enumerators can be added to, and the
    /// only thing a bitmask's `requires` may name.
    fn resolve_enum_type(&self, name: &str, referrer: impl FnOnce() -> String) -> Result<EntityIdx> {
        self.resolve_kind(name, "enum", "an enum type", referrer, |kind| {
            kind.as_enum_type().is_some()
        })
    }

    fn resolve_entity(&self, entity: &Entity) -> Result<Resolved> {
        let owner = entity.name.as_str();
        match &entity.kind {
            EntityKind::Struct(s) => {
                for parent in &s.structextends {
                    self.resolve_name(parent, || format!("structextends of `{owner}`"))?;
                }
                for member in &s.members {
                    self.resolve_member(owner, member)?;
                }
            }
            EntityKind::Handle(h) => {
                for parent in &h.parents {
                    self.resolve_name(parent, || format!("parent of handle `{owner}`"))?;
                }
            }
            EntityKind::BitmaskType(b) => {
                self.resolve_name(&b.flags_type, || format!("flags type of `{owner}`"))?;
                let requires = match &b.requires {
                    Some(name) => {
                        Some(self.resolve_enum_type(name, || format!("requires of `{owner}`"))?)
                    }
                    None => None,
                };
                return Ok(Resolved::Bitmask(requires));
            }
            EntityKind::Basetype(Basetype { ty: Some(ty) }) => {
                self.resolve_name(ty, || format!("basetype `{owner}`"))?;
            }
            EntityKind::Command(c) => {
                for code in c.successcodes.iter().chain(&c.errorcodes) {
                    self.resolve_name(code, || format!("result codes of `{owner}`"))?;
                }
                for name in c.return_type.referenced_names() {
                    self.resolve_name(name, || format!("return type of `{owner}`"))?;
                }
                for param in &c.params {
                    self.resolve_member(owner, param)?;
                }
            }
            EntityKind::ExtensionEnum(e) => {
                let extends = match &e.extends {
                    Some(name) => Some(self.resolve_enum_type(name, || {
                        format!("extends of `{owner}` in `{}`", e.origin)
                    })?),
                    None => None,
                };
                let alias = match e.value.alias() {
                    Some(target) => Some(self.resolve_name(target, || {
                        format!("alias of `{owner}` in `{}`", e.origin)
                    })?),
                    None => None,
                };
                return Ok(Resolved::ExtensionEnum { extends, alias });
            }
            _ => {}
        }
        Ok(Resolved::Nothing)
    }

    /// Bind every named cross-reference. Any name without a symbol is fatal.
    pub(crate) fn resolve(&mut self) -> Result<()> {
        for idx in 0..self.entities.len() {
            let resolved = self.resolve_entity(&self.entities[idx])?;
            match (resolved, &mut self.entities[idx].kind) {
                (Resolved::Bitmask(requires), EntityKind::BitmaskType(b)) => {
                    b.requires_idx = requires;
                }
                (Resolved::ExtensionEnum { extends, alias }, EntityKind::ExtensionEnum(e)) => {
                    e.extends_idx = extends;
                    e.alias_idx = alias;
                }
                _ => {}
            }
        }
        debug!("Resolved {} entities", self.entities.len());
        Ok(())
    }

    /// Mark everything a feature or extension requires as referenced.
    pub(crate) fn mark_references(&mut self) -> Result<()> {
        let groups = self
            .features
            .iter()
            .map(|f| (format!("feature `{}`", f.name), &f.require))
            .chain(
                self.extensions
                    .iter()
                    .map(|e| (format!("extension `{}`", e.name), &e.require)),
            );
        let mut marked = vec![];
        for (origin, require) in groups {
            for name in require
                .types
                .iter()
                .chain(&require.commands)
                .chain(&require.enums)
            {
                marked.push(find(&self.symbols, name, || origin.clone())?);
            }
            for &idx in &require.extension_enums {
                if let Some(target) = self.entities[idx]
                    .kind
                    .as_extension_enum()
                    .and_then(|e| e.alias_idx)
                {
                    marked.push(target);
                }
            }
        }
        for idx in marked {
            self.entities[idx].referenced = true;
        }
        debug!(
            "{} entities not required by any feature or extension",
            self.unreferenced().count()
        );
        Ok(())
    }

    /// Tag the types and commands of platform-bound extensions with the
    /// platform's guard.
    pub(crate) fn bind_platforms(&mut self) -> Result<()> {
        for ext in &self.extensions {
            let Some(platform_name) = &ext.platform else {
                continue;
            };
            let platform = self.platforms.get(platform_name).ok_or_else(|| {
                RegistryError::UnresolvedReference {
                    name: platform_name.clone(),
                    referrer: format!("platform of extension `{}`", ext.name),
                }
            })?;
            if ext.supported == "disabled" {
                warn!(
                    "Disabled extension {} still binds platform {}",
                    ext.name, platform.name
                );
            }
            for name in ext.require.types.iter().chain(&ext.require.commands) {
                let idx = find(&self.symbols, name, || format!("extension `{}`", ext.name))?;
                let entity = &mut self.entities[idx];
                match &entity.platform {
                    Some(existing) if existing.extension != ext.name => {
                        return Err(RegistryError::DuplicatePlatformBinding {
                            name: entity.name.clone(),
                            first: existing.extension.clone(),
                            second: ext.name.clone(),
                        });
                    }
                    Some(_) => {}
                    None => {
                        entity.platform = Some(PlatformBinding {
                            platform: platform.name.clone(),
                            protect: platform.protect.clone(),
                            extension: ext.name.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
