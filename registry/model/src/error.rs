// Licensed under the Apache-2.0 license

use std::path::PathBuf;

use thiserror::Error;
use vk_registry_declarator::DeclaratorError;

/// Every way ingestion or resolution can fail. All of them are fatal.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("line {line}: <{element}>: {message}")]
    SchemaViolation {
        element: String,
        line: u32,
        message: String,
    },
    #[error("line {line}: bad declaration in {context}: {source}")]
    Declarator {
        context: String,
        line: u32,
        #[source]
        source: DeclaratorError,
    },
    #[error("unknown symbol `{name}` referenced by {referrer}")]
    UnresolvedReference { name: String, referrer: String },
    #[error("duplicate symbol `{name}`: already a {existing}, declared again as {new}")]
    DuplicateSymbol {
        name: String,
        existing: &'static str,
        new: &'static str,
    },
    #[error("`{name}` is bound to a platform by extension `{first}` and again by `{second}`")]
    DuplicatePlatformBinding {
        name: String,
        first: String,
        second: String,
    },
    #[error("line {line}: attribute `{attribute}` must be `true` or `false`, found `{value}`")]
    MalformedBooleanLiteral {
        attribute: String,
        value: String,
        line: u32,
    },
}

pub type Result<T> = std::result::Result<T, RegistryError>;
