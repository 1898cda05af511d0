// Licensed under the Apache-2.0 license

//! Configuration for name normalization.
//!
//! [`NamingConfig`] holds every constant the normalizer uses: the registry
//! prefixes to strip, the keyword set that needs escaping, the marker word
//! removed from bitmask flags, and the constants left out of the output.
//! It can be built in code or loaded from TOML; fields missing from the
//! TOML keep their defaults.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::NamingError;

/// Configuration for name transformations.
///
/// # Example
///
/// ```
/// use vk_registry_naming::NamingConfig;
///
/// let config = NamingConfig::with_defaults();
/// assert_eq!(config.fix_name("or"), "or_");
/// assert_eq!(config.fix_name("1d"), "n1d");
///
/// let config = NamingConfig::with_defaults().add_keyword("type");
/// assert_eq!(config.fix_name("type"), "type_");
///
/// let config = NamingConfig::from_toml(r#"keywords = ["match"]"#).unwrap();
/// assert_eq!(config.fix_name("match"), "match_");
/// assert_eq!(config.fix_name("or"), "or");
/// assert_eq!(config.type_prefix, "Vk");
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConfig {
    /// Prefix every type name carries, e.g. `Vk`.
    pub type_prefix: String,
    /// Prefix every enumerator and constant carries, e.g. `VK_`.
    pub enumerator_prefix: String,
    /// Names that collide with keywords of the target language.
    pub keywords: BTreeSet<String>,
    /// Appended to a name found in `keywords`.
    pub keyword_suffix: String,
    /// Prepended to a name starting with a digit.
    pub digit_prefix: String,
    /// Word removed from bitmask flag names, matched case-insensitively.
    pub bit_marker: String,
    /// Raw constant names left out of the output.
    pub skip_constants: BTreeSet<String>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl NamingConfig {
    /// The conventions of the Vulkan registry.
    pub fn with_defaults() -> Self {
        Self {
            type_prefix: "Vk".to_string(),
            enumerator_prefix: "VK_".to_string(),
            keywords: ["and", "xor", "or", "inline", "protected"]
                .into_iter()
                .map(String::from)
                .collect(),
            keyword_suffix: "_".to_string(),
            digit_prefix: "n".to_string(),
            bit_marker: "bit".to_string(),
            skip_constants: ["VK_TRUE", "VK_FALSE"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }

    /// A configuration that strips no prefix and escapes nothing.
    pub fn none() -> Self {
        Self {
            type_prefix: String::new(),
            enumerator_prefix: String::new(),
            keywords: BTreeSet::new(),
            keyword_suffix: String::new(),
            digit_prefix: String::new(),
            bit_marker: String::new(),
            skip_constants: BTreeSet::new(),
        }
    }

    /// Load a configuration from TOML text. Unset fields keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self, NamingError> {
        toml::from_str(text).map_err(|e| NamingError::Config(e.to_string()))
    }

    /// Add a keyword to escape.
    pub fn add_keyword(mut self, keyword: &str) -> Self {
        self.keywords.insert(keyword.to_string());
        self
    }

    /// Leave the raw constant `name` out of the output.
    pub fn skip_constant(mut self, name: &str) -> Self {
        self.skip_constants.insert(name.to_string());
        self
    }

    pub fn type_prefix(mut self, prefix: &str) -> Self {
        self.type_prefix = prefix.to_string();
        self
    }

    pub fn enumerator_prefix(mut self, prefix: &str) -> Self {
        self.enumerator_prefix = prefix.to_string();
        self
    }

    /// Escape keyword collisions and leading digits.
    pub fn fix_name(&self, name: &str) -> String {
        if self.keywords.contains(name) {
            format!("{name}{}", self.keyword_suffix)
        } else if name.starts_with(|c: char| c.is_ascii_digit()) {
            format!("{}{name}", self.digit_prefix)
        } else {
            name.to_string()
        }
    }
}
