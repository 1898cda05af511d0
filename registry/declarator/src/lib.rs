// Licensed under the Apache-2.0 license

//! Declarator parser for the C fragments embedded in `vk.xml`.
//!
//! Struct members, command prototypes and command parameters in the registry
//! are written as C declarations split across markup, e.g.
//! `const <type>char</type>* <name>pName</name>`. Once the markup is
//! flattened to text, [`parse_declarator`] turns it into a [`TypeId`] tree
//! and the declared name.
//!
//! This is not a C parser. Only the shapes below are recognized, and the
//! whole token stream must match one of them exactly:
//!
//! ```text
//! T n                 Name
//! T * n               Pointer(Name)
//! const T * n         PointerToConst(Name)
//! T ** n              Pointer(Pointer(Name))
//! T n[N]              Array(Name, N)
//! const T n[N]        ArrayOfConst(Name, N)
//! const T * const * n PointerToConst(PointerToConst(Name))
//! ```
//!
//! ```
//! use vk_registry_declarator::{parse_declarator, TypeId};
//! let decl = parse_declarator("const char* pName").unwrap();
//! assert_eq!(decl.ty, TypeId::name("char").pointer_to_const());
//! assert_eq!(decl.name, "pName");
//! ```

mod token;
mod type_id;

pub use token::{tokenize, Token};
pub use type_id::{ArrayLen, TypeId};

use thiserror::Error;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DeclaratorError {
    #[error("unexpected character at offset {offset} in declarator `{text}`")]
    UnexpectedCharacter { text: String, offset: usize },
    #[error("declarator `{text}` matches no known declaration shape ({tokens})")]
    GrammarMismatch { text: String, tokens: String },
}

/// A parsed declaration: the declared type and the declared identifier.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Declarator {
    pub ty: TypeId,
    pub name: String,
}

fn array_len(tok: &Token<'_>) -> ArrayLen {
    match tok {
        Token::Number(n) => ArrayLen::Literal(n.to_string()),
        Token::Ident(n) => ArrayLen::Named(n.to_string()),
        _ => unreachable!("array length guarded by pattern"),
    }
}

/// Match a token stream against the closed set of declaration shapes.
pub fn match_shape(tokens: &[Token<'_>]) -> Option<Declarator> {
    use Token::*;

    let (ty, name) = match tokens {
        [Ident(ty), Ident(name)] => (TypeId::name(*ty), name),
        [Ident(ty), Star, Ident(name)] => (TypeId::name(*ty).pointer(), name),
        [Const, Ident(ty), Star, Ident(name)] => (TypeId::name(*ty).pointer_to_const(), name),
        [Ident(ty), Star, Star, Ident(name)] => (TypeId::name(*ty).pointer().pointer(), name),
        [Ident(ty), Ident(name), LBracket, len @ (Ident(_) | Number(_)), RBracket] => {
            (TypeId::name(*ty).array(array_len(len)), name)
        }
        [Const, Ident(ty), Ident(name), LBracket, len @ (Ident(_) | Number(_)), RBracket] => {
            (TypeId::name(*ty).array_of_const(array_len(len)), name)
        }
        [Const, Ident(ty), Star, Const, Star, Ident(name)] => (
            TypeId::name(*ty).pointer_to_const().pointer_to_const(),
            name,
        ),
        _ => return None,
    };
    Some(Declarator {
        ty,
        name: name.to_string(),
    })
}

/// Tokenize `text` and match it against the known declaration shapes.
pub fn parse_declarator(text: &str) -> Result<Declarator, DeclaratorError> {
    let tokens = tokenize(text)?;
    match_shape(&tokens).ok_or_else(|| DeclaratorError::GrammarMismatch {
        text: text.trim().to_string(),
        tokens: token::describe(&tokens),
    })
}
