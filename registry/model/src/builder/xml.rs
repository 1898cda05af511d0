// Licensed under the Apache-2.0 license

//! Small helpers over `roxmltree` nodes shared by every section parser.

use roxmltree::Node;
use vk_registry_declarator::{parse_declarator, Declarator};

use crate::error::{RegistryError, Result};

pub(crate) fn line(node: Node<'_, '_>) -> u32 {
    node.document().text_pos_at(node.range().start).row
}

pub(crate) fn schema(node: Node<'_, '_>, message: impl Into<String>) -> RegistryError {
    RegistryError::SchemaViolation {
        element: node.tag_name().name().to_string(),
        line: line(node),
        message: message.into(),
    }
}

/// Reject a missing required attribute or any attribute outside
/// `required` and `optional`.
pub(crate) fn check_attributes(
    node: Node<'_, '_>,
    required: &[&str],
    optional: &[&str],
) -> Result<()> {
    for name in required {
        if node.attribute(*name).is_none() {
            return Err(schema(
                node,
                format!("missing required attribute `{name}`"),
            ));
        }
    }
    for attr in node.attributes() {
        let name = attr.name();
        if !required.contains(&name) && !optional.contains(&name) {
            return Err(schema(node, format!("unexpected attribute `{name}`")));
        }
    }
    Ok(())
}

/// A required attribute.
pub(crate) fn attr<'a>(node: Node<'a, '_>, name: &str) -> Result<&'a str> {
    node.attribute(name)
        .ok_or_else(|| schema(node, format!("missing required attribute `{name}`")))
}

pub(crate) fn opt_attr(node: Node<'_, '_>, name: &str) -> Option<String> {
    node.attribute(name).map(str::to_string)
}

/// Split a comma-separated attribute into its items. An absent attribute
/// yields an empty list.
pub(crate) fn list_attr(node: Node<'_, '_>, name: &str) -> Vec<String> {
    node.attribute(name)
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn parse_bool(node: Node<'_, '_>, attribute: &str, value: &str) -> Result<bool> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(RegistryError::MalformedBooleanLiteral {
            attribute: attribute.to_string(),
            value: value.to_string(),
            line: line(node),
        }),
    }
}

/// An optional boolean attribute, `false` when absent.
pub(crate) fn bool_attr(node: Node<'_, '_>, name: &str) -> Result<bool> {
    match node.attribute(name) {
        Some(value) => parse_bool(node, name, value),
        None => Ok(false),
    }
}

/// An optional comma-separated list of booleans.
pub(crate) fn bool_list_attr(node: Node<'_, '_>, name: &str) -> Result<Vec<bool>> {
    match node.attribute(name) {
        Some(value) => value
            .split(',')
            .map(|v| parse_bool(node, name, v.trim()))
            .collect(),
        None => Ok(vec![]),
    }
}

/// Element children of `node`. Whitespace-only text, XML comments and
/// processing instructions are skipped; any other text is a schema violation.
pub(crate) fn child_elements<'a, 'i>(node: Node<'a, 'i>) -> Result<Vec<Node<'a, 'i>>> {
    let mut elements = vec![];
    for child in node.children() {
        if child.is_element() {
            elements.push(child);
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            if !text.trim().is_empty() {
                return Err(schema(node, format!("unexpected text {:?}", text.trim())));
            }
        }
    }
    Ok(elements)
}

/// The flattened text of a subtree. A `<comment>` element contributes a
/// single blank and every element boundary separates tokens.
pub(crate) fn subtext(node: Node<'_, '_>) -> String {
    let mut out = String::new();
    for child in node.children() {
        if child.is_text() {
            out.push_str(child.text().unwrap_or_default());
        } else if child.is_element() {
            out.push(' ');
            if child.tag_name().name() != "comment" {
                out.push_str(&subtext(child));
                out.push(' ');
            }
        }
    }
    out
}

/// Text of the first `<tag>` child, which must hold nothing but text.
pub(crate) fn subelement_text(node: Node<'_, '_>, tag: &str) -> Result<String> {
    let child = find_child(node, tag)
        .ok_or_else(|| schema(node, format!("missing <{tag}> child")))?;
    let mut children = child.children();
    match (children.next(), children.next()) {
        (Some(text), None) if text.is_text() => Ok(text.text().unwrap_or_default().to_string()),
        _ => Err(schema(child, "expected a single text child")),
    }
}

pub(crate) fn find_child<'a, 'i>(node: Node<'a, 'i>, tag: &str) -> Option<Node<'a, 'i>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == tag)
}

/// Run the declarator parser over the flattened text of `node`.
pub(crate) fn declarator(node: Node<'_, '_>, context: impl Into<String>) -> Result<Declarator> {
    parse_declarator(&subtext(node)).map_err(|source| RegistryError::Declarator {
        context: context.into(),
        line: line(node),
        source,
    })
}
