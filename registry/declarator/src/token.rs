// Licensed under the Apache-2.0 license

//! Tokenizer for C declarator text.

use std::fmt;

use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, preceded, repeat, terminated};
use winnow::prelude::*;
use winnow::token::{one_of, take_while};
use winnow::ModalResult;

use crate::DeclaratorError;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Token<'s> {
    Ident(&'s str),
    Number(&'s str),
    Const,
    Star,
    LBracket,
    RBracket,
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s) => write!(f, "IDENTIFIER({s})"),
            Token::Number(s) => write!(f, "NUMBER({s})"),
            Token::Const => write!(f, "CONST"),
            Token::Star => write!(f, "ASTERISK"),
            Token::LBracket => write!(f, "LBRACKET"),
            Token::RBracket => write!(f, "RBRACKET"),
        }
    }
}

fn word<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    (
        one_of(|c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
        .take()
        .parse_next(input)
}

/// One token, or `None` for the `struct` keyword which carries no meaning here.
fn token<'s>(input: &mut &'s str) -> ModalResult<Option<Token<'s>>> {
    alt((
        word.map(|w| match w {
            "struct" => None,
            "const" => Some(Token::Const),
            _ => Some(Token::Ident(w)),
        }),
        digit1.map(|d| Some(Token::Number(d))),
        '*'.value(Some(Token::Star)),
        '['.value(Some(Token::LBracket)),
        ']'.value(Some(Token::RBracket)),
    ))
    .parse_next(input)
}

fn tokens<'s>(input: &mut &'s str) -> ModalResult<Vec<Token<'s>>> {
    let toks: Vec<Option<Token<'s>>> =
        terminated(repeat(0.., preceded(multispace0, token)), multispace0).parse_next(input)?;
    Ok(toks.into_iter().flatten().collect())
}

/// Split declarator text into tokens. The whole input must be consumed.
pub fn tokenize(text: &str) -> Result<Vec<Token<'_>>, DeclaratorError> {
    tokens
        .parse(text)
        .map_err(|e| DeclaratorError::UnexpectedCharacter {
            text: text.to_string(),
            offset: e.offset(),
        })
}

/// Render a token stream the way diagnostics print it.
pub fn describe(tokens: &[Token<'_>]) -> String {
    tokens
        .iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
