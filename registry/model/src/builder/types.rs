// Licensed under the Apache-2.0 license

//! The `<types>` section.
//!
//! A `<type>` element's kind is decided by its category and its
//! *fingerprint*: the exact set of classifying attributes present, spelled
//! with one letter each. The accepted fingerprints are a closed table, so a
//! registry revision that introduces a new combination fails loudly instead
//! of being silently misread.

use super::xml::{
    bool_attr, bool_list_attr, declarator, find_child, list_attr, opt_attr, subelement_text,
};
use super::*;
use vk_registry_declarator::TypeId;

const FINGERPRINT_ATTRIBUTES: [(&str, char); 7] = [
    ("name", 'n'),
    ("category", 'c'),
    ("requires", 'r'),
    ("alias", 'a'),
    ("parent", 'p'),
    ("returnedonly", 'R'),
    ("structextends", 's'),
];

const MEMBER_ATTRIBUTES: [&str; 7] = [
    "comment",
    "len",
    "altlen",
    "optional",
    "noautovalidity",
    "externsync",
    "values",
];

const CATEGORIES: [&str; 9] = [
    "include",
    "define",
    "basetype",
    "bitmask",
    "handle",
    "enum",
    "struct",
    "union",
    "funcpointer",
];

pub(crate) fn fingerprint(node: Node<'_, '_>) -> String {
    FINGERPRINT_ATTRIBUTES
        .iter()
        .filter(|(attr, _)| node.attribute(*attr).is_some())
        .map(|(_, letter)| *letter)
        .collect()
}

impl RegistryBuilder {
    pub(super) fn process_types(&mut self, node: Node<'_, '_>) -> Result<()> {
        check_attributes(node, &[], &["comment"])?;
        for ty in child_elements(node)? {
            match ty.tag_name().name() {
                "comment" => continue,
                "type" => {}
                other => return Err(schema(ty, format!("unexpected <{other}> in <types>"))),
            }
            let mut allowed: Vec<&str> = FINGERPRINT_ATTRIBUTES.iter().map(|(a, _)| *a).collect();
            allowed.push("comment");
            check_attributes(ty, &[], &allowed)?;
            self.process_type(ty)?;
        }
        debug!(
            "Read {} structs, {} handles, {} enum types, {} bitmask types",
            self.structs.len(),
            self.handles.len(),
            self.enum_types.len(),
            self.bitmask_types.len()
        );
        Ok(())
    }

    fn process_type(&mut self, node: Node<'_, '_>) -> Result<()> {
        let fp = fingerprint(node);
        let Some(category) = node.attribute("category") else {
            return match fp.as_str() {
                "n" | "nr" => self.process_external_type(node),
                _ => Err(schema(
                    node,
                    format!("unrecognized type fingerprint `{fp}` without a category"),
                )),
            };
        };
        match (category, fp.as_str()) {
            ("include", "nc") => {
                self.includes.push(attr(node, "name")?.to_string());
                Ok(())
            }
            ("define", "nc") => {
                let name = attr(node, "name")?;
                self.defines
                    .push(Entity::new(name, line(node), EntityKind::Define));
                Ok(())
            }
            ("define", "c" | "cr") => {
                let name = subelement_text(node, "name")?;
                self.defines
                    .push(Entity::new(name, line(node), EntityKind::Define));
                Ok(())
            }
            ("basetype", "c") => self.process_basetype(node),
            ("bitmask" | "handle" | "enum" | "struct" | "union", "nca") => {
                let name = attr(node, "name")?;
                self.push_alias(node, name)
            }
            ("bitmask", "c" | "cr") => self.process_bitmask_type(node),
            ("handle", "c" | "cp") => self.process_handle(node),
            ("enum", "nc") => {
                let name = attr(node, "name")?;
                self.enum_types.push(Entity::new(
                    name,
                    line(node),
                    EntityKind::EnumType(EnumType::default()),
                ));
                Ok(())
            }
            ("struct" | "union", "nc" | "ncR" | "ncs" | "ncRs") => self.process_struct(node),
            ("funcpointer", "c" | "cr") => {
                let name = subelement_text(node, "name")?;
                self.func_pointers
                    .push(Entity::new(name, line(node), EntityKind::FuncPointer));
                Ok(())
            }
            (category, _) if CATEGORIES.contains(&category) => Err(schema(
                node,
                format!("fingerprint `{fp}` is not valid for category `{category}`"),
            )),
            (category, _) => Err(schema(node, format!("unknown type category `{category}`"))),
        }
    }

    fn process_external_type(&mut self, node: Node<'_, '_>) -> Result<()> {
        if !child_elements(node)?.is_empty() {
            return Err(schema(node, "external type must be empty"));
        }
        self.external_types.push(Entity::new(
            attr(node, "name")?,
            line(node),
            EntityKind::ExternalType(ExternalType {
                requires: opt_attr(node, "requires"),
            }),
        ));
        Ok(())
    }

    fn process_basetype(&mut self, node: Node<'_, '_>) -> Result<()> {
        let name = subelement_text(node, "name")?;
        let ty = match find_child(node, "type") {
            Some(_) => Some(subelement_text(node, "type")?),
            None => None,
        };
        self.basetypes.push(Entity::new(
            name,
            line(node),
            EntityKind::Basetype(Basetype { ty }),
        ));
        Ok(())
    }

    fn process_bitmask_type(&mut self, node: Node<'_, '_>) -> Result<()> {
        let name = subelement_text(node, "name")?;
        let flags_type = subelement_text(node, "type")?;
        self.bitmask_types.push(Entity::new(
            name,
            line(node),
            EntityKind::BitmaskType(BitmaskType {
                flags_type,
                requires: opt_attr(node, "requires"),
                requires_idx: None,
            }),
        ));
        Ok(())
    }

    fn process_handle(&mut self, node: Node<'_, '_>) -> Result<()> {
        let name = subelement_text(node, "name")?;
        let dispatchable = match subelement_text(node, "type")?.as_str() {
            "VK_DEFINE_HANDLE" => true,
            "VK_DEFINE_NON_DISPATCHABLE_HANDLE" => false,
            other => {
                return Err(schema(
                    node,
                    format!("handle `{name}` has unknown handle macro `{other}`"),
                ))
            }
        };
        self.handles.push(Entity::new(
            name,
            line(node),
            EntityKind::Handle(Handle {
                dispatchable,
                parents: list_attr(node, "parent"),
            }),
        ));
        Ok(())
    }

    fn process_struct(&mut self, node: Node<'_, '_>) -> Result<()> {
        let name = attr(node, "name")?;
        let mut members = vec![];
        for member in child_elements(node)? {
            match member.tag_name().name() {
                "comment" => continue,
                "member" => {}
                other => return Err(schema(member, format!("unexpected <{other}> in `{name}`"))),
            }
            check_attributes(member, &[], &MEMBER_ATTRIBUTES)?;
            let decl = declarator(member, format!("member of `{name}`"))?;
            let values = opt_attr(member, "values");
            if values.is_some()
                && !(decl.name == "sType" && decl.ty == TypeId::name("VkStructureType"))
            {
                return Err(schema(
                    member,
                    format!(
                        "`values` is only allowed on the VkStructureType sType member, found on `{}`",
                        decl.name
                    ),
                ));
            }
            let externsync = if member.attribute("externsync").is_some() {
                Some(ExternSync::Flag(bool_attr(member, "externsync")?))
            } else {
                None
            };
            members.push(Member {
                name: decl.name,
                ty: decl.ty,
                len: opt_attr(member, "len"),
                altlen: opt_attr(member, "altlen"),
                optional: bool_list_attr(member, "optional")?,
                noautovalidity: bool_attr(member, "noautovalidity")?,
                externsync,
                values,
            });
        }
        self.structs.push(Entity::new(
            name,
            line(node),
            EntityKind::Struct(Struct {
                is_union: attr(node, "category")? == "union",
                returnedonly: bool_attr(node, "returnedonly")?,
                structextends: list_attr(node, "structextends"),
                members,
            }),
        ));
        Ok(())
    }
}
