// Licensed under the Apache-2.0 license

//! `<enums>` blocks: the API constants, selections and bitmasks.

use super::*;
use super::xml::opt_attr;

/// Exactly one of `keys` must be present on `node`. Returns the key found.
pub(super) fn exactly_one<'k>(node: Node<'_, '_>, keys: &[&'k str]) -> Result<&'k str> {
    let present: Vec<&'k str> = keys
        .iter()
        .copied()
        .filter(|k| node.attribute(*k).is_some())
        .collect();
    match present.as_slice() {
        [one] => Ok(*one),
        _ => Err(schema(
            node,
            format!("expected exactly one of `{}`", keys.join("`, `")),
        )),
    }
}

impl RegistryBuilder {
    pub(super) fn process_enums(&mut self, node: Node<'_, '_>) -> Result<()> {
        check_attributes(node, &["name"], &["comment", "type", "bitwidth"])?;
        let name = attr(node, "name")?;
        if name == API_CONSTANTS {
            return self.process_constants(node);
        }
        let bitwidth = match node.attribute("bitwidth") {
            Some(width) => Some(
                width
                    .parse::<u32>()
                    .map_err(|_| schema(node, format!("invalid bitwidth `{width}`")))?,
            ),
            None => None,
        };
        let block = EnumBlock {
            name: name.to_string(),
            bitwidth,
            entries: vec![],
            line: line(node),
        };
        match attr(node, "type")? {
            "enum" => self.process_selection(node, block),
            "bitmask" => self.process_bitmask(node, block),
            other => Err(schema(node, format!("unknown enums type `{other}`"))),
        }
    }

    fn process_constants(&mut self, node: Node<'_, '_>) -> Result<()> {
        for item in child_elements(node)? {
            if item.tag_name().name() != "enum" {
                return Err(schema(item, "expected <enum>"));
            }
            check_attributes(item, &["name"], &["value", "alias", "comment", "type"])?;
            let name = attr(item, "name")?;
            match exactly_one(item, &["value", "alias"])? {
                "value" => self.constants.push(Entity::new(
                    name,
                    line(item),
                    EntityKind::Constant(Constant {
                        value: attr(item, "value")?.to_string(),
                    }),
                )),
                _ => self.push_alias(item, name)?,
            }
        }
        debug!("Read {} API constants", self.constants.len());
        Ok(())
    }

    fn process_selection(&mut self, node: Node<'_, '_>, mut block: EnumBlock) -> Result<()> {
        for item in child_elements(node)? {
            match item.tag_name().name() {
                "comment" | "unused" => continue,
                "enum" => {}
                other => return Err(schema(item, format!("unexpected <{other}>"))),
            }
            check_attributes(item, &["name"], &["value", "alias", "comment"])?;
            let name = attr(item, "name")?;
            match exactly_one(item, &["value", "alias"])? {
                "value" => block.entries.push(Entity::new(
                    name,
                    line(item),
                    EntityKind::Selector(Selector {
                        value: attr(item, "value")?.to_string(),
                    }),
                )),
                _ => self.push_alias(item, name)?,
            }
        }
        self.selections.push(block);
        Ok(())
    }

    fn process_bitmask(&mut self, node: Node<'_, '_>, mut block: EnumBlock) -> Result<()> {
        for item in child_elements(node)? {
            match item.tag_name().name() {
                "comment" | "unused" => continue,
                "enum" => {}
                other => return Err(schema(item, format!("unexpected <{other}>"))),
            }
            check_attributes(item, &["name"], &["bitpos", "value", "alias", "comment"])?;
            let name = attr(item, "name")?;
            let value = match exactly_one(item, &["bitpos", "value", "alias"])? {
                "bitpos" => FlagValue::Bitpos(attr(item, "bitpos")?.to_string()),
                "value" => FlagValue::Value(attr(item, "value")?.to_string()),
                _ => {
                    self.push_alias(item, name)?;
                    continue;
                }
            };
            block.entries.push(Entity::new(
                name,
                line(item),
                EntityKind::Flag(Flag { value }),
            ));
        }
        self.bitmasks.push(block);
        Ok(())
    }

    /// Record `name` as an alias of the node's `alias` attribute.
    pub(super) fn push_alias(&mut self, node: Node<'_, '_>, name: &str) -> Result<()> {
        let target = opt_attr(node, "alias")
            .ok_or_else(|| schema(node, "missing required attribute `alias`"))?;
        self.aliases.push(Alias {
            name: name.to_string(),
            target,
            line: line(node),
        });
        Ok(())
    }
}
