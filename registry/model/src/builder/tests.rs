// Licensed under the Apache-2.0 license

use super::*;
use crate::error::RegistryError;
use vk_registry_declarator::{ArrayLen, TypeId};

fn ingest(body: &str) -> Result<RegistryBuilder> {
    let mut builder = RegistryBuilder::new();
    builder.ingest_str(&format!("<registry>\n{body}\n</registry>"))?;
    Ok(builder)
}

fn schema_message(result: Result<RegistryBuilder>) -> String {
    match result {
        Err(RegistryError::SchemaViolation { message, .. }) => message,
        Err(other) => panic!("expected a schema violation, got {other}"),
        Ok(_) => panic!("expected a schema violation, got success"),
    }
}

#[test]
fn test_root_must_be_registry() {
    let mut builder = RegistryBuilder::new();
    let err = builder.ingest_str("<types/>").unwrap_err();
    assert!(matches!(err, RegistryError::SchemaViolation { .. }));

    let err = builder.ingest_str(r#"<registry version="1"/>"#).unwrap_err();
    assert!(err.to_string().contains("unexpected attribute `version`"));
}

#[test]
fn test_unknown_section() {
    assert_eq!(
        schema_message(ingest("<vendorids/>")),
        "unknown registry section <vendorids>"
    );
}

#[test]
fn test_malformed_xml() {
    let mut builder = RegistryBuilder::new();
    assert!(matches!(
        builder.ingest_str("<registry><types></registry>"),
        Err(RegistryError::Xml(_))
    ));
}

#[test]
fn test_constants() {
    let builder = ingest(
        r#"<enums name="API Constants" comment="misc">
             <enum value="256" name="VK_MAX_PHYSICAL_DEVICE_NAME_SIZE"/>
             <enum value="(~0U)" name="VK_REMAINING_MIP_LEVELS"/>
             <enum name="VK_LUID_SIZE_KHR" alias="VK_LUID_SIZE"/>
           </enums>"#,
    )
    .unwrap();
    assert_eq!(builder.constants.len(), 2);
    assert_eq!(
        builder.constants[1].kind,
        EntityKind::Constant(Constant {
            value: "(~0U)".into()
        })
    );
    assert_eq!(builder.aliases.len(), 1);
    assert_eq!(builder.aliases[0].target, "VK_LUID_SIZE");
}

#[test]
fn test_constant_needs_exactly_one_of_value_alias() {
    let msg = schema_message(ingest(
        r#"<enums name="API Constants"><enum name="VK_X" value="1" alias="VK_Y"/></enums>"#,
    ));
    assert_eq!(msg, "expected exactly one of `value`, `alias`");
    assert!(ingest(r#"<enums name="API Constants"><enum name="VK_X"/></enums>"#).is_err());
}

#[test]
fn test_selection_and_bitmask_blocks() {
    let builder = ingest(
        r#"<enums name="VkImageLayout" type="enum">
             <enum value="0" name="VK_IMAGE_LAYOUT_UNDEFINED"/>
             <unused start="1"/>
             <comment>general</comment>
             <enum value="1" name="VK_IMAGE_LAYOUT_GENERAL"/>
           </enums>
           <enums name="VkAccessFlagBits2" type="bitmask" bitwidth="64">
             <enum bitpos="0" name="VK_ACCESS_2_INDIRECT_COMMAND_READ_BIT"/>
             <enum value="0" name="VK_ACCESS_2_NONE"/>
             <enum name="VK_ACCESS_2_NONE_KHR" alias="VK_ACCESS_2_NONE"/>
           </enums>"#,
    )
    .unwrap();
    assert_eq!(builder.selections.len(), 1);
    assert_eq!(builder.selections[0].entries.len(), 2);
    let bits = &builder.bitmasks[0];
    assert_eq!(bits.bitwidth, Some(64));
    assert_eq!(bits.entries.len(), 2);
    assert_eq!(
        bits.entries[0].kind,
        EntityKind::Flag(Flag {
            value: FlagValue::Bitpos("0".into())
        })
    );
    assert_eq!(builder.aliases[0].name, "VK_ACCESS_2_NONE_KHR");
}

#[test]
fn test_flag_with_two_values_rejected() {
    assert!(ingest(
        r#"<enums name="VkF" type="bitmask"><enum bitpos="0" value="1" name="VK_F"/></enums>"#
    )
    .is_err());
    assert_eq!(
        schema_message(ingest(r#"<enums name="VkF" type="flags"/>"#)),
        "unknown enums type `flags`"
    );
}

#[test]
fn test_platforms_and_tags() {
    let builder = ingest(
        r#"<platforms comment="guards">
             <platform name="xlib" protect="VK_USE_PLATFORM_XLIB_KHR" comment="X Window System"/>
           </platforms>
           <tags>
             <tag name="KHR" author="Khronos" contact="someone"/>
           </tags>"#,
    )
    .unwrap();
    assert_eq!(builder.platforms["xlib"].protect, "VK_USE_PLATFORM_XLIB_KHR");
    assert_eq!(builder.tags[0].name, "KHR");

    let msg = schema_message(ingest(
        r#"<platforms>
             <platform name="xlib" protect="A"/>
             <platform name="xlib" protect="B"/>
           </platforms>"#,
    ));
    assert_eq!(msg, "duplicate platform `xlib`");
}

#[test]
fn test_type_fingerprints() {
    let builder = ingest(
        r#"<types comment="all of them">
             <type name="vk_platform2" category="include">#include "vk_platform.h"</type>
             <type requires="vk_platform" name="uint32_t"/>
             <type name="int"/>
             <type category="define">#define <name>VK_API_VERSION</name> 1</type>
             <type category="define" requires="VK_MAKE_API_VERSION">#define <name>VK_API_VERSION_1_0</name></type>
             <type category="define" name="VK_DEFINE_HANDLE">macro</type>
             <type category="basetype">typedef <type>uint32_t</type> <name>VkFlags</name>;</type>
             <type category="basetype">struct <name>ANativeWindow</name>;</type>
             <type requires="VkFenceCreateFlagBits" category="bitmask">typedef <type>VkFlags</type> <name>VkFenceCreateFlags</name>;</type>
             <type category="bitmask">typedef <type>VkFlags</type> <name>VkQueryPoolCreateFlags</name>;</type>
             <type category="bitmask" name="VkFooFlagsKHR" alias="VkFooFlags"/>
             <type category="handle"><type>VK_DEFINE_HANDLE</type>(<name>VkInstance</name>)</type>
             <type category="handle" parent="VkDevice,VkCommandPool"><type>VK_DEFINE_NON_DISPATCHABLE_HANDLE</type>(<name>VkFence</name>)</type>
             <type name="VkFenceCreateFlagBits" category="enum"/>
             <type category="funcpointer">typedef void (VKAPI_PTR *<name>PFN_vkVoidFunction</name>)(void);</type>
             <type category="struct" name="VkBaseOutStructure" returnedonly="true"/>
             <type category="union" name="VkClearValue"/>
             <type category="struct" name="VkExt" structextends="VkA,VkB"/>
             <type category="struct" name="VkBoth" returnedonly="false" structextends="VkA"/>
           </types>"#,
    )
    .unwrap();
    assert_eq!(builder.includes, vec!["vk_platform2"]);
    assert_eq!(builder.external_types.len(), 2);
    assert_eq!(builder.defines.len(), 3);
    assert_eq!(builder.basetypes.len(), 2);
    assert_eq!(
        builder.basetypes[1].kind,
        EntityKind::Basetype(Basetype { ty: None })
    );
    assert_eq!(builder.bitmask_types.len(), 2);
    assert_eq!(builder.aliases.len(), 1);
    assert_eq!(builder.handles.len(), 2);
    assert_eq!(
        builder.handles[1].kind,
        EntityKind::Handle(Handle {
            dispatchable: false,
            parents: vec!["VkDevice".into(), "VkCommandPool".into()],
        })
    );
    assert_eq!(builder.enum_types.len(), 1);
    assert_eq!(builder.func_pointers[0].name, "PFN_vkVoidFunction");
    assert_eq!(builder.structs.len(), 4);
    let ext = builder.structs[2].kind.as_struct().unwrap();
    assert_eq!(ext.structextends, vec!["VkA", "VkB"]);
    assert!(builder.structs[0].kind.as_struct().unwrap().returnedonly);
    assert!(builder.structs[1].kind.as_struct().unwrap().is_union);
}

#[test]
fn test_bad_fingerprints() {
    assert_eq!(
        schema_message(ingest(
            r#"<types><type category="struct" name="VkS" parent="VkT"/></types>"#
        )),
        "fingerprint `ncp` is not valid for category `struct`"
    );
    assert_eq!(
        schema_message(ingest(
            r#"<types><type category="enum" name="VkE" requires="VkF"/></types>"#
        )),
        "fingerprint `ncr` is not valid for category `enum`"
    );
    assert_eq!(
        schema_message(ingest(r#"<types><type name="X" alias="Y"/></types>"#)),
        "unrecognized type fingerprint `na` without a category"
    );
    assert_eq!(
        schema_message(ingest(r#"<types><type category="class" name="X"/></types>"#)),
        "unknown type category `class`"
    );
    assert_eq!(
        schema_message(ingest(r#"<types><type name="X" api="vulkan"/></types>"#)),
        "unexpected attribute `api`"
    );
}

#[test]
fn test_handle_macro_checked() {
    let msg = schema_message(ingest(
        r#"<types><type category="handle"><type>VK_DEFINE_OBJECT</type>(<name>VkX</name>)</type></types>"#,
    ));
    assert!(msg.contains("unknown handle macro `VK_DEFINE_OBJECT`"), "{msg}");
}

#[test]
fn test_struct_members() {
    let builder = ingest(
        r#"<types>
             <type category="struct" name="VkApplicationInfo">
               <member values="VK_STRUCTURE_TYPE_APPLICATION_INFO"><type>VkStructureType</type> <name>sType</name></member>
               <member optional="true">const <type>void</type>*     <name>pNext</name></member>
               <member len="null-terminated">const <type>char</type>* <name>pApplicationName</name><comment>may be NULL</comment></member>
               <member externsync="true"><type>uint32_t</type> <name>count</name></member>
               <member><type>char</type> <name>deviceName</name>[<enum>VK_MAX_PHYSICAL_DEVICE_NAME_SIZE</enum>]</member>
               <member noautovalidity="true" optional="false,true">const <type>char</type>* const* <name>ppNames</name></member>
             </type>
           </types>"#,
    )
    .unwrap();
    let s = builder.structs[0].kind.as_struct().unwrap();
    assert_eq!(s.members.len(), 6);
    assert_eq!(
        s.members[0].values.as_deref(),
        Some("VK_STRUCTURE_TYPE_APPLICATION_INFO")
    );
    assert_eq!(s.members[1].ty, TypeId::name("void").pointer_to_const());
    assert_eq!(s.members[1].optional, vec![true]);
    assert_eq!(s.members[2].len.as_deref(), Some("null-terminated"));
    assert_eq!(s.members[3].externsync, Some(ExternSync::Flag(true)));
    assert_eq!(
        s.members[4].ty,
        TypeId::name("char").array(ArrayLen::Named("VK_MAX_PHYSICAL_DEVICE_NAME_SIZE".into()))
    );
    assert!(s.members[5].noautovalidity);
    assert_eq!(s.members[5].optional, vec![false, true]);
}

#[test]
fn test_values_only_on_stype() {
    let msg = schema_message(ingest(
        r#"<types>
             <type category="struct" name="VkS">
               <member values="VK_X"><type>uint32_t</type> <name>count</name></member>
             </type>
           </types>"#,
    ));
    assert!(msg.starts_with("`values` is only allowed"), "{msg}");
}

#[test]
fn test_member_bad_boolean() {
    let err = ingest(
        r#"<types>
             <type category="struct" name="VkS">
               <member optional="maybe"><type>uint32_t</type> <name>count</name></member>
             </type>
           </types>"#,
    )
    .unwrap_err();
    match err {
        RegistryError::MalformedBooleanLiteral {
            attribute, value, ..
        } => {
            assert_eq!(attribute, "optional");
            assert_eq!(value, "maybe");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn test_member_bad_declarator() {
    let err = ingest(
        r#"<types>
             <type category="struct" name="VkS">
               <member><type>uint32_t</type> <name>flags</name>:8</member>
             </type>
           </types>"#,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Declarator { ref context, line: 4, .. } if context == "member of `VkS`"
    ));
}

#[test]
fn test_commands() {
    let builder = ingest(
        r#"<commands comment="all">
             <command successcodes="VK_SUCCESS" errorcodes="VK_ERROR_OUT_OF_HOST_MEMORY,VK_ERROR_DEVICE_LOST" queues="graphics,compute" renderpass="both" cmdbufferlevel="primary">
               <proto><type>VkResult</type> <name>vkQueueWaitIdle</name></proto>
               <param externsync="true"><type>VkQueue</type> <name>queue</name></param>
               <param externsync="pCreateInfo-&gt;surface"><type>VkSwapchainCreateInfoKHR</type>* <name>pCreateInfo</name></param>
               <param optional="false,true"><type>uint32_t</type>* <name>pCount</name></param>
               <implicitexternsyncparams>
                 <param>the sname used to create queue</param>
               </implicitexternsyncparams>
             </command>
             <command name="vkQueueWaitIdleKHR" alias="vkQueueWaitIdle"/>
           </commands>"#,
    )
    .unwrap();
    assert_eq!(builder.commands.len(), 1);
    let cmd = builder.commands[0].kind.as_command().unwrap();
    assert_eq!(builder.commands[0].name, "vkQueueWaitIdle");
    assert_eq!(cmd.return_type, TypeId::name("VkResult"));
    assert_eq!(cmd.errorcodes.len(), 2);
    assert_eq!(cmd.queues, vec!["graphics", "compute"]);
    assert_eq!(cmd.renderpass.as_deref(), Some("both"));
    assert_eq!(cmd.params[0].externsync, Some(ExternSync::Flag(true)));
    assert_eq!(
        cmd.params[1].externsync,
        Some(ExternSync::Expr("pCreateInfo->surface".into()))
    );
    assert_eq!(cmd.params[2].optional, vec![false, true]);
    assert_eq!(
        cmd.implicitexternsyncparams.as_deref(),
        Some("the sname used to create queue")
    );
    assert_eq!(builder.aliases[0].name, "vkQueueWaitIdleKHR");
}

#[test]
fn test_command_schema() {
    assert_eq!(
        schema_message(ingest(
            r#"<commands><command><param><type>int</type> <name>x</name></param></command></commands>"#
        )),
        "missing <proto>"
    );
    assert_eq!(
        schema_message(ingest(
            r#"<commands><command name="vkA" alias="vkB" queues="graphics"/></commands>"#
        )),
        "unexpected attribute `queues`"
    );
    assert_eq!(
        schema_message(ingest(
            r#"<commands><command name="vkA" alias="vkB"><proto><type>void</type> <name>vkA</name></proto></command></commands>"#
        )),
        "command alias must not have children"
    );
}

#[test]
fn test_feature_and_extensions() {
    let builder = ingest(
        r#"<feature api="vulkan" name="VK_VERSION_1_1" number="1.1" comment="core">
             <require comment="promoted">
               <type name="VkPeerMemoryFeatureFlags"/>
               <command name="vkGetDeviceGroupPeerMemoryFeatures"/>
               <enum name="VK_MAX_DEVICE_GROUP_SIZE"/>
               <enum extends="VkStructureType" extnumber="71" offset="0" name="VK_STRUCTURE_TYPE_X"/>
               <enum bitpos="3" extends="VkPipelineCreateFlagBits" name="VK_PIPELINE_CREATE_Y_BIT"/>
             </require>
           </feature>
           <extensions comment="vendors">
             <extension name="VK_KHR_surface" number="1" type="instance" author="KHR" contact="c" supported="vulkan" provisional="false">
               <require>
                 <enum value="25" name="VK_KHR_SURFACE_SPEC_VERSION"/>
                 <enum value="&quot;VK_KHR_surface&quot;" name="VK_KHR_SURFACE_EXTENSION_NAME"/>
                 <enum offset="0" dir="-" extends="VkResult" name="VK_ERROR_SURFACE_LOST_KHR"/>
                 <enum extends="VkStructureType" name="VK_STRUCTURE_TYPE_Z_KHR" alias="VK_STRUCTURE_TYPE_X"/>
               </require>
             </extension>
             <extension name="VK_KHR_xlib_surface" number="5" supported="vulkan" platform="xlib" requires="VK_KHR_surface">
               <require><type name="VkXlibSurfaceCreateInfoKHR"/></require>
             </extension>
           </extensions>"#,
    )
    .unwrap();
    let feature = &builder.features[0];
    assert_eq!(feature.item.number, "1.1");
    assert_eq!(feature.item.require.types, vec!["VkPeerMemoryFeatureFlags"]);
    assert_eq!(feature.item.require.enums, vec!["VK_MAX_DEVICE_GROUP_SIZE"]);
    assert_eq!(feature.extension_enums.len(), 2);
    assert_eq!(
        feature.extension_enums[0].kind.as_extension_enum().unwrap().value,
        ExtensionValue::Offset {
            offset: "0".into(),
            extnumber: Some("71".into()),
            dir: None
        }
    );

    let surface = &builder.extensions[0];
    assert_eq!(surface.item.ext_type.as_deref(), Some("instance"));
    assert!(!surface.item.provisional);
    let enums: Vec<_> = surface
        .extension_enums
        .iter()
        .map(|e| e.kind.as_extension_enum().unwrap())
        .collect();
    assert_eq!(enums.len(), 4);
    assert_eq!(enums[0].extends, None);
    assert_eq!(enums[0].origin, "VK_KHR_surface");
    assert_eq!(
        enums[1].value,
        ExtensionValue::Value("\"VK_KHR_surface\"".into())
    );
    assert_eq!(enums[3].value.alias(), Some("VK_STRUCTURE_TYPE_X"));

    let xlib = &builder.extensions[1];
    assert_eq!(xlib.item.platform.as_deref(), Some("xlib"));
    assert_eq!(xlib.item.requires, vec!["VK_KHR_surface"]);
}

#[test]
fn test_require_schema() {
    assert_eq!(
        schema_message(ingest(
            r#"<feature api="vulkan" name="F" number="1.0"><remove/></feature>"#
        )),
        "expected <require>"
    );
    assert_eq!(
        schema_message(ingest(
            r#"<feature api="vulkan" name="F" number="1.0"><require><enum name="X" value="1" dir="-"/></require></feature>"#
        )),
        "`extnumber` and `dir` require `offset`"
    );
    assert_eq!(
        schema_message(ingest(
            r#"<extensions><extension name="E" number="1"/></extensions>"#
        )),
        "missing required attribute `supported`"
    );
}
