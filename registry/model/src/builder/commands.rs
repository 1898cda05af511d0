// Licensed under the Apache-2.0 license

//! The `<commands>` section.

use super::*;
use super::xml::{bool_attr, bool_list_attr, declarator, list_attr, opt_attr, subtext};

const COMMAND_ATTRIBUTES: [&str; 7] = [
    "comment",
    "queues",
    "successcodes",
    "errorcodes",
    "cmdbufferlevel",
    "renderpass",
    "pipeline",
];

const PARAM_ATTRIBUTES: [&str; 6] = [
    "len",
    "altlen",
    "optional",
    "noautovalidity",
    "externsync",
    "comment",
];

impl RegistryBuilder {
    pub(super) fn process_commands(&mut self, node: Node<'_, '_>) -> Result<()> {
        check_attributes(node, &[], &["comment"])?;
        for command in child_elements(node)? {
            if command.tag_name().name() != "command" {
                return Err(schema(command, "expected <command>"));
            }
            if command.attribute("alias").is_some() {
                check_attributes(command, &["name", "alias"], &["comment"])?;
                if !child_elements(command)?.is_empty() {
                    return Err(schema(command, "command alias must not have children"));
                }
                let name = attr(command, "name")?;
                self.push_alias(command, name)?;
            } else {
                self.process_command(command)?;
            }
        }
        debug!("Read {} commands", self.commands.len());
        Ok(())
    }

    fn process_command(&mut self, node: Node<'_, '_>) -> Result<()> {
        check_attributes(node, &[], &COMMAND_ATTRIBUTES)?;
        let mut proto = None;
        let mut params = vec![];
        let mut implicitexternsyncparams = None;
        for child in child_elements(node)? {
            match child.tag_name().name() {
                "proto" => {
                    check_attributes(child, &[], &[])?;
                    if proto.is_some() {
                        return Err(schema(child, "duplicate <proto>"));
                    }
                    proto = Some(declarator(child, "command prototype")?);
                }
                "param" => params.push(child),
                "implicitexternsyncparams" => {
                    check_attributes(child, &[], &[])?;
                    if implicitexternsyncparams.is_some() {
                        return Err(schema(child, "duplicate <implicitexternsyncparams>"));
                    }
                    implicitexternsyncparams = Some(subtext(child).trim().to_string());
                }
                other => return Err(schema(child, format!("unexpected <{other}> in <command>"))),
            }
        }
        let proto = proto.ok_or_else(|| schema(node, "missing <proto>"))?;
        let params = params
            .into_iter()
            .map(|param| Self::process_param(param, &proto.name))
            .collect::<Result<Vec<_>>>()?;

        self.commands.push(Entity::new(
            proto.name,
            line(node),
            EntityKind::Command(Command {
                return_type: proto.ty,
                params,
                queues: list_attr(node, "queues"),
                successcodes: list_attr(node, "successcodes"),
                errorcodes: list_attr(node, "errorcodes"),
                cmdbufferlevel: list_attr(node, "cmdbufferlevel"),
                renderpass: opt_attr(node, "renderpass"),
                pipeline: opt_attr(node, "pipeline"),
                implicitexternsyncparams,
            }),
        ));
        Ok(())
    }

    fn process_param(node: Node<'_, '_>, command: &str) -> Result<Member> {
        check_attributes(node, &[], &PARAM_ATTRIBUTES)?;
        let decl = declarator(node, format!("parameter of `{command}`"))?;
        let externsync = match node.attribute("externsync") {
            Some("true" | "false") => Some(ExternSync::Flag(bool_attr(node, "externsync")?)),
            Some(expr) => Some(ExternSync::Expr(expr.to_string())),
            None => None,
        };
        Ok(Member {
            name: decl.name,
            ty: decl.ty,
            len: opt_attr(node, "len"),
            altlen: opt_attr(node, "altlen"),
            optional: bool_list_attr(node, "optional")?,
            noautovalidity: bool_attr(node, "noautovalidity")?,
            externsync,
            values: None,
        })
    }
}
