// Licensed under the Apache-2.0 license

//! Canonical naming for a resolved Vulkan registry.
//!
//! The normalizer turns the registry's native names (`VkImageType`,
//! `VK_IMAGE_TYPE_1D`) into lowercase identifiers (`image_type`, `n1d`)
//! suitable for driving a code generator, and groups them into
//! enumeration, bitmask and constant records.
//!
//! ## Usage
//!
//! ```
//! use vk_registry_model::Registry;
//! use vk_registry_naming::{normalize, NamingConfig};
//!
//! let registry = Registry::parse(
//!     r#"<registry>
//!          <types><type name="VkLogicOp" category="enum"/></types>
//!          <enums name="VkLogicOp" type="enum">
//!            <enum value="0" name="VK_LOGIC_OP_CLEAR"/>
//!            <enum value="1" name="VK_LOGIC_OP_AND"/>
//!          </enums>
//!        </registry>"#,
//! )
//! .unwrap();
//! let out = normalize(&registry, &NamingConfig::with_defaults()).unwrap();
//! let names: Vec<_> = out.enumerations[0].enumerators.iter().map(|e| &e.name).collect();
//! assert_eq!(names, ["clear", "and_"]);
//! ```
//!
//! ## Module Organization
//!
//! - [`util`]: identifier segmentation and prefix helpers
//! - [`config`]: prefixes, keywords and skip lists ([`NamingConfig`])
//! - [`output`]: normalized records and their text rendering

pub mod config;
pub mod output;
pub mod util;

mod normalize;

pub use config::NamingConfig;
pub use normalize::{normalize, translate_enumerator, translate_type};
pub use output::{Bitmask, Constant, Enumeration, Enumerator, EnumeratorValue, NormalizedRegistry};

/// Errors raised while deriving canonical names.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum NamingError {
    #[error("`{name}` does not start with `{prefix}`")]
    MissingPrefix { name: String, prefix: String },
    #[error("unexpected character {ch:?} in `{name}`")]
    UnexpectedCharacter { name: String, ch: char },
    #[error("invalid naming configuration: {0}")]
    Config(String),
}
