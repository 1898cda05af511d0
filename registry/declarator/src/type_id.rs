// Licensed under the Apache-2.0 license

//! Type trees produced by the declarator parser.

use std::fmt;

/// Element count of an array declarator.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum ArrayLen {
    /// A literal integer, kept as written.
    Literal(String),
    /// An identifier that must name a constant.
    Named(String),
}

impl ArrayLen {
    pub fn as_str(&self) -> &str {
        match self {
            ArrayLen::Literal(s) | ArrayLen::Named(s) => s,
        }
    }
}

impl fmt::Display for ArrayLen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declared type. Every node exclusively owns its child.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum TypeId {
    Name(String),
    Pointer(Box<TypeId>),
    PointerToConst(Box<TypeId>),
    Array(Box<TypeId>, ArrayLen),
    ArrayOfConst(Box<TypeId>, ArrayLen),
}

impl TypeId {
    pub fn name(name: impl Into<String>) -> Self {
        TypeId::Name(name.into())
    }

    pub fn pointer(self) -> Self {
        TypeId::Pointer(Box::new(self))
    }

    pub fn pointer_to_const(self) -> Self {
        TypeId::PointerToConst(Box::new(self))
    }

    pub fn array(self, len: ArrayLen) -> Self {
        TypeId::Array(Box::new(self), len)
    }

    pub fn array_of_const(self, len: ArrayLen) -> Self {
        TypeId::ArrayOfConst(Box::new(self), len)
    }

    /// The innermost type name.
    pub fn base_name(&self) -> &str {
        match self {
            TypeId::Name(name) => name,
            TypeId::Pointer(inner)
            | TypeId::PointerToConst(inner)
            | TypeId::Array(inner, _)
            | TypeId::ArrayOfConst(inner, _) => inner.base_name(),
        }
    }

    /// Every identifier this type refers to: the base name first, then any
    /// named array lengths from the innermost level outwards.
    pub fn referenced_names(&self) -> Vec<&str> {
        let mut names = vec![self.base_name()];
        names.extend(self.named_lengths());
        names
    }

    /// Array lengths given as identifiers, innermost level first.
    pub fn named_lengths(&self) -> Vec<&str> {
        match self {
            TypeId::Name(_) => vec![],
            TypeId::Pointer(inner) | TypeId::PointerToConst(inner) => inner.named_lengths(),
            TypeId::Array(inner, len) | TypeId::ArrayOfConst(inner, len) => {
                let mut names = inner.named_lengths();
                if let ArrayLen::Named(len) = len {
                    names.push(len);
                }
                names
            }
        }
    }

    /// Number of pointer levels, counted from the outside in.
    pub fn indirection(&self) -> usize {
        match self {
            TypeId::Name(_) => 0,
            TypeId::Pointer(inner) | TypeId::PointerToConst(inner) => 1 + inner.indirection(),
            TypeId::Array(inner, _) | TypeId::ArrayOfConst(inner, _) => inner.indirection(),
        }
    }
}

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeId::Name(name) => write!(f, "{name}"),
            TypeId::Pointer(inner) => write!(f, "{inner}*"),
            TypeId::PointerToConst(inner) => write!(f, "{inner} const *"),
            TypeId::Array(inner, len) => write!(f, "{inner}[{len}]"),
            TypeId::ArrayOfConst(inner, len) => write!(f, "const {inner}[{len}]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(TypeId::name("char").pointer_to_const().to_string(), "char const *");
        assert_eq!(TypeId::name("void").pointer().pointer().to_string(), "void**");
        assert_eq!(
            TypeId::name("float")
                .array(ArrayLen::Literal("4".into()))
                .to_string(),
            "float[4]"
        );
        assert_eq!(
            TypeId::name("char")
                .array_of_const(ArrayLen::Named("VK_UUID_SIZE".into()))
                .to_string(),
            "const char[VK_UUID_SIZE]"
        );
    }

    #[test]
    fn test_referenced_names() {
        let ty = TypeId::name("char").array(ArrayLen::Named("VK_MAX_DESCRIPTION_SIZE".into()));
        assert_eq!(ty.referenced_names(), vec!["char", "VK_MAX_DESCRIPTION_SIZE"]);
        assert_eq!(ty.base_name(), "char");

        let ty = TypeId::name("uint8_t").array(ArrayLen::Literal("16".into()));
        assert_eq!(ty.referenced_names(), vec!["uint8_t"]);
        assert!(ty.named_lengths().is_empty());
    }

    #[test]
    fn test_named_lengths() {
        let ty = TypeId::name("float")
            .array(ArrayLen::Named("VK_ROWS".into()))
            .array(ArrayLen::Literal("4".into()))
            .array(ArrayLen::Named("VK_COLS".into()));
        assert_eq!(ty.named_lengths(), vec!["VK_ROWS", "VK_COLS"]);
        assert_eq!(ty.referenced_names(), vec!["float", "VK_ROWS", "VK_COLS"]);
        assert!(TypeId::name("void").pointer().named_lengths().is_empty());
    }

    #[test]
    fn test_indirection() {
        assert_eq!(TypeId::name("int").indirection(), 0);
        assert_eq!(TypeId::name("char").pointer_to_const().pointer_to_const().indirection(), 2);
    }
}
