// Licensed under the Apache-2.0 license

//! Entity types held by the [`Registry`](crate::Registry) arena.
//!
//! ## Architecture Overview
//!
//! ```text
//! Registry
//! ├── entities: Vec<Entity>            # arena, addressed by EntityIdx
//! │   └── kind: EntityKind             # per-kind payload
//! ├── symbols: HashMap<String, EntityIdx>
//! │   └── primary names and aliases both map to the one canonical entity
//! ├── platforms, tags, includes
//! └── features, extensions             # requirement lists
//! ```

use vk_registry_declarator::TypeId;

/// Index into the entity arena. Entities are added but never deleted, so
/// an index stays valid for the life of the registry.
pub type EntityIdx = usize;

/// Name of the bootstrap symbol registered before anything else.
pub const PLATFORM_PLACEHOLDER: &str = "vk_platform";

/// Name of the `<enums>` block holding the API constants.
pub const API_CONSTANTS: &str = "API Constants";

//=============================================================================
// Entity
//=============================================================================

/// A named, symbol-table-registered construct.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    /// Primary name. Unique across the symbol table.
    pub name: String,
    /// Secondary names bound to this same entity, in binding order.
    pub aliases: Vec<String>,
    /// Platform guard, set by the platform-tagging pass.
    pub platform: Option<PlatformBinding>,
    /// Set when a feature or extension requires this entity.
    pub referenced: bool,
    /// Line of the declaring element, for diagnostics.
    pub line: u32,
    pub kind: EntityKind,
}

impl Entity {
    pub fn new(name: impl Into<String>, line: u32, kind: EntityKind) -> Self {
        Self {
            name: name.into(),
            aliases: vec![],
            platform: None,
            referenced: false,
            line,
            kind,
        }
    }

    /// True if `name` is this entity's primary name or one of its aliases.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EntityKind {
    Placeholder,
    Constant(Constant),
    ExternalType(ExternalType),
    Define,
    Basetype(Basetype),
    BitmaskType(BitmaskType),
    Handle(Handle),
    EnumType(EnumType),
    Struct(Struct),
    FuncPointer,
    Command(Command),
    Selector(Selector),
    Flag(Flag),
    ExtensionEnum(ExtensionEnum),
}

impl EntityKind {
    /// Short lowercase label used in diagnostics and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Placeholder => "placeholder",
            EntityKind::Constant(_) => "constant",
            EntityKind::ExternalType(_) => "external type",
            EntityKind::Define => "define",
            EntityKind::Basetype(_) => "basetype",
            EntityKind::BitmaskType(_) => "bitmask type",
            EntityKind::Handle(_) => "handle",
            EntityKind::EnumType(_) => "enum type",
            EntityKind::Struct(s) if s.is_union => "union",
            EntityKind::Struct(_) => "struct",
            EntityKind::FuncPointer => "funcpointer",
            EntityKind::Command(_) => "command",
            EntityKind::Selector(_) => "selector",
            EntityKind::Flag(_) => "flag",
            EntityKind::ExtensionEnum(_) => "extension enum",
        }
    }

    pub fn as_enum_type(&self) -> Option<&EnumType> {
        if let EntityKind::EnumType(e) = self {
            Some(e)
        } else {
            None
        }
    }

    pub fn as_enum_type_mut(&mut self) -> Option<&mut EnumType> {
        if let EntityKind::EnumType(e) = self {
            Some(e)
        } else {
            None
        }
    }

    pub fn as_bitmask_type(&self) -> Option<&BitmaskType> {
        if let EntityKind::BitmaskType(b) = self {
            Some(b)
        } else {
            None
        }
    }

    pub fn as_extension_enum(&self) -> Option<&ExtensionEnum> {
        if let EntityKind::ExtensionEnum(e) = self {
            Some(e)
        } else {
            None
        }
    }

    pub fn as_struct(&self) -> Option<&Struct> {
        if let EntityKind::Struct(s) = self {
            Some(s)
        } else {
            None
        }
    }

    pub fn as_command(&self) -> Option<&Command> {
        if let EntityKind::Command(c) = self {
            Some(c)
        } else {
            None
        }
    }
}

//=============================================================================
// Per-kind payloads
//=============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct Constant {
    pub value: String,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExternalType {
    /// Header providing the type, e.g. `vk_platform` or `X11/Xlib.h`.
    pub requires: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Basetype {
    /// Underlying type, absent for opaque platform types.
    pub ty: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BitmaskType {
    /// `VkFlags` or `VkFlags64`.
    pub flags_type: String,
    /// Enumeration holding the flag bits.
    pub requires: Option<String>,
    /// `requires`, resolved.
    pub requires_idx: Option<EntityIdx>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Handle {
    /// `VK_DEFINE_HANDLE` rather than `VK_DEFINE_NON_DISPATCHABLE_HANDLE`.
    pub dispatchable: bool,
    pub parents: Vec<String>,
}

/// An enumeration type. Owns at most one block of enumerators.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnumType {
    pub body: Option<EnumBody>,
    pub bitwidth: Option<u32>,
}

impl EnumType {
    /// Enumerators of the attached block, in document order.
    pub fn members(&self) -> &[EntityIdx] {
        match &self.body {
            Some(EnumBody::Selection(ids)) | Some(EnumBody::Bitmask(ids)) => ids,
            None => &[],
        }
    }

    pub fn is_bitmask(&self) -> bool {
        matches!(self.body, Some(EnumBody::Bitmask(_)))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EnumBody {
    /// Indices of `Selector` entities.
    Selection(Vec<EntityIdx>),
    /// Indices of `Flag` entities.
    Bitmask(Vec<EntityIdx>),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Struct {
    pub is_union: bool,
    pub returnedonly: bool,
    pub structextends: Vec<String>,
    pub members: Vec<Member>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Command {
    pub return_type: TypeId,
    pub params: Vec<Member>,
    pub queues: Vec<String>,
    pub successcodes: Vec<String>,
    pub errorcodes: Vec<String>,
    pub cmdbufferlevel: Vec<String>,
    pub renderpass: Option<String>,
    pub pipeline: Option<String>,
    pub implicitexternsyncparams: Option<String>,
}

/// A struct member or a command parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Member {
    pub name: String,
    pub ty: TypeId,
    pub len: Option<String>,
    pub altlen: Option<String>,
    /// One flag per indirection level, outermost first.
    pub optional: Vec<bool>,
    pub noautovalidity: bool,
    pub externsync: Option<ExternSync>,
    /// Enumerator the member must equal (`sType` discriminants).
    pub values: Option<String>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExternSync {
    Flag(bool),
    /// Names the externally synchronized sub-object, e.g. `pInfo->dst`.
    Expr(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Selector {
    pub value: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum FlagValue {
    Bitpos(String),
    Value(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Flag {
    pub value: FlagValue,
}

/// An enumerator added by a feature or an extension.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtensionEnum {
    /// Enumeration being extended. Absent for extension constants.
    pub extends: Option<String>,
    pub value: ExtensionValue,
    /// Owning feature or extension name.
    pub origin: String,
    /// `extends`, resolved.
    pub extends_idx: Option<EntityIdx>,
    /// Alias target, resolved.
    pub alias_idx: Option<EntityIdx>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExtensionValue {
    Value(String),
    Bitpos(String),
    Offset {
        offset: String,
        extnumber: Option<String>,
        dir: Option<String>,
    },
    Alias(String),
}

impl ExtensionValue {
    pub fn alias(&self) -> Option<&str> {
        if let ExtensionValue::Alias(target) = self {
            Some(target)
        } else {
            None
        }
    }
}

//=============================================================================
// Non-symbol records
//=============================================================================

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Platform {
    pub name: String,
    /// Preprocessor guard, e.g. `VK_USE_PLATFORM_WIN32_KHR`.
    pub protect: String,
}

/// The guard attached to an entity by a platform-bound extension.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PlatformBinding {
    pub platform: String,
    pub protect: String,
    pub extension: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Tag {
    pub name: String,
    pub author: String,
    pub contact: String,
}

/// A secondary name waiting to be bound to its target.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Alias {
    pub name: String,
    pub target: String,
    pub line: u32,
}

/// Names pulled in by the `<require>` groups of a feature or extension.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Requirements {
    pub types: Vec<String>,
    pub commands: Vec<String>,
    /// Plain references to enumerators declared elsewhere.
    pub enums: Vec<String>,
    /// `ExtensionEnum` entities declared here, in document order.
    pub extension_enums: Vec<EntityIdx>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    pub api: String,
    pub name: String,
    pub number: String,
    pub require: Requirements,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extension {
    pub name: String,
    pub number: String,
    pub supported: String,
    pub platform: Option<String>,
    pub ext_type: Option<String>,
    pub requires: Vec<String>,
    pub requires_core: Option<String>,
    pub author: Option<String>,
    pub contact: Option<String>,
    pub promotedto: Option<String>,
    pub deprecatedby: Option<String>,
    pub obsoletedby: Option<String>,
    pub provisional: bool,
    pub require: Requirements,
}
