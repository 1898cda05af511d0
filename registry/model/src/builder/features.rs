// Licensed under the Apache-2.0 license

//! `<feature>` and `<extensions>` sections and their `<require>` groups.

use super::*;
use super::enums::exactly_one;
use super::xml::{bool_attr, list_attr, opt_attr};

const EXTENSION_ATTRIBUTES: [&str; 11] = [
    "comment",
    "platform",
    "type",
    "requires",
    "requiresCore",
    "author",
    "contact",
    "promotedto",
    "deprecatedby",
    "obsoletedby",
    "provisional",
];

const REQUIRE_ENUM_ATTRIBUTES: [&str; 8] = [
    "comment",
    "value",
    "bitpos",
    "alias",
    "offset",
    "extends",
    "extnumber",
    "dir",
];

impl RegistryBuilder {
    pub(super) fn process_feature(&mut self, node: Node<'_, '_>) -> Result<()> {
        check_attributes(node, &["api", "name", "number"], &["comment"])?;
        let name = attr(node, "name")?;
        let (require, extension_enums) = process_requires(node, name)?;
        self.features.push(Pending {
            item: Feature {
                api: attr(node, "api")?.to_string(),
                name: name.to_string(),
                number: attr(node, "number")?.to_string(),
                require,
            },
            extension_enums,
        });
        Ok(())
    }

    pub(super) fn process_extensions(&mut self, node: Node<'_, '_>) -> Result<()> {
        check_attributes(node, &[], &["comment"])?;
        for ext in child_elements(node)? {
            if ext.tag_name().name() != "extension" {
                return Err(schema(ext, "expected <extension>"));
            }
            check_attributes(ext, &["name", "number", "supported"], &EXTENSION_ATTRIBUTES)?;
            let name = attr(ext, "name")?;
            let (require, extension_enums) = process_requires(ext, name)?;
            self.extensions.push(Pending {
                item: Extension {
                    name: name.to_string(),
                    number: attr(ext, "number")?.to_string(),
                    supported: attr(ext, "supported")?.to_string(),
                    platform: opt_attr(ext, "platform"),
                    ext_type: opt_attr(ext, "type"),
                    requires: list_attr(ext, "requires"),
                    requires_core: opt_attr(ext, "requiresCore"),
                    author: opt_attr(ext, "author"),
                    contact: opt_attr(ext, "contact"),
                    promotedto: opt_attr(ext, "promotedto"),
                    deprecatedby: opt_attr(ext, "deprecatedby"),
                    obsoletedby: opt_attr(ext, "obsoletedby"),
                    provisional: bool_attr(ext, "provisional")?,
                    require,
                },
                extension_enums,
            });
        }
        debug!("Read {} extensions", self.extensions.len());
        Ok(())
    }
}

/// Collect the `<require>` groups of a feature or extension named `origin`.
/// New enumerators come back as unregistered entities.
fn process_requires(node: Node<'_, '_>, origin: &str) -> Result<(Requirements, Vec<Entity>)> {
    let mut require = Requirements::default();
    let mut extension_enums = vec![];
    for group in child_elements(node)? {
        if group.tag_name().name() != "require" {
            return Err(schema(group, "expected <require>"));
        }
        check_attributes(group, &[], &["comment", "extension", "feature"])?;
        for item in child_elements(group)? {
            match item.tag_name().name() {
                "comment" => {}
                "type" => {
                    check_attributes(item, &["name"], &["comment"])?;
                    require.types.push(attr(item, "name")?.to_string());
                }
                "command" => {
                    check_attributes(item, &["name"], &["comment"])?;
                    require.commands.push(attr(item, "name")?.to_string());
                }
                "enum" => {
                    check_attributes(item, &["name"], &REQUIRE_ENUM_ATTRIBUTES)?;
                    match extension_value(item)? {
                        Some(value) => extension_enums.push(Entity::new(
                            attr(item, "name")?,
                            line(item),
                            EntityKind::ExtensionEnum(ExtensionEnum {
                                extends: opt_attr(item, "extends"),
                                value,
                                origin: origin.to_string(),
                                extends_idx: None,
                                alias_idx: None,
                            }),
                        )),
                        None => require.enums.push(attr(item, "name")?.to_string()),
                    }
                }
                other => return Err(schema(item, format!("unexpected <{other}> in <require>"))),
            }
        }
    }
    Ok((require, extension_enums))
}

/// The value specification of a `<require><enum>`, or `None` for a plain
/// reference to an enumerator declared elsewhere.
fn extension_value(node: Node<'_, '_>) -> Result<Option<ExtensionValue>> {
    const VALUE_KEYS: [&str; 4] = ["value", "bitpos", "offset", "alias"];
    if !VALUE_KEYS.iter().any(|k| node.attribute(*k).is_some()) {
        return Ok(None);
    }
    let key = exactly_one(node, &VALUE_KEYS)?;
    if key != "offset" && (node.attribute("extnumber").is_some() || node.attribute("dir").is_some())
    {
        return Err(schema(node, "`extnumber` and `dir` require `offset`"));
    }
    let value = attr(node, key)?.to_string();
    Ok(Some(match key {
        "value" => ExtensionValue::Value(value),
        "bitpos" => ExtensionValue::Bitpos(value),
        "offset" => ExtensionValue::Offset {
            offset: value,
            extnumber: opt_attr(node, "extnumber"),
            dir: opt_attr(node, "dir"),
        },
        _ => ExtensionValue::Alias(value),
    }))
}
