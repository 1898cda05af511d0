// Licensed under the Apache-2.0 license

//! Utility functions for name conversion.
//!
//! Registry names come in two conventions: CamelCase type names
//! (`VkImageType`) and SCREAMING_SNAKE enumerator names
//! (`VK_IMAGE_TYPE_1D`). Both are segmented the same way and rejoined as
//! lowercase words separated by underscores.

use crate::NamingError;

/// Splits an identifier into words.
///
/// A new word starts after every underscore and at every lowercase to
/// uppercase transition. Empty pieces are dropped. Digits never start a word
/// on their own, so `ROTATE_90` and `Device8Bit` split as `ROTATE`, `90` and
/// `Device8`, `Bit`.
///
/// # Examples
/// ```
/// use vk_registry_naming::util::split_identifier;
/// assert_eq!(split_identifier("ExampleLongType").unwrap(), ["Example", "Long", "Type"]);
/// assert_eq!(split_identifier("IMAGE__TYPE_1D").unwrap(), ["IMAGE", "TYPE", "1D"]);
/// ```
pub fn split_identifier(name: &str) -> Result<Vec<&str>, NamingError> {
    let mut pieces = vec![];
    let mut start = 0;
    let mut prev = None;
    for (i, c) in name.char_indices() {
        if !(c.is_ascii_alphanumeric() || c == '_') {
            return Err(NamingError::UnexpectedCharacter {
                name: name.to_string(),
                ch: c,
            });
        }
        if c == '_' {
            pieces.push(&name[start..i]);
            start = i + 1;
        } else if prev.is_some_and(|p: char| p.is_ascii_lowercase()) && c.is_ascii_uppercase() {
            pieces.push(&name[start..i]);
            start = i;
        }
        prev = Some(c);
    }
    pieces.push(&name[start..]);
    pieces.retain(|p| !p.is_empty());
    Ok(pieces)
}

/// Rejoins the words of `name` in lowercase, separated by underscores.
///
/// # Examples
/// ```
/// use vk_registry_naming::util::underscore_style;
/// assert_eq!(underscore_style("ExampleLongType").unwrap(), "example_long_type");
/// assert_eq!(underscore_style("SURFACE_TRANSFORM_ROTATE_90_BIT_KHR").unwrap(), "surface_transform_rotate_90_bit_khr");
/// ```
pub fn underscore_style(name: &str) -> Result<String, NamingError> {
    Ok(split_identifier(name)?
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_"))
}

/// Removes `prefix` from the start of `name`, failing if it is not there.
pub fn strip_registry_prefix<'a>(name: &'a str, prefix: &str) -> Result<&'a str, NamingError> {
    name.strip_prefix(prefix)
        .ok_or_else(|| NamingError::MissingPrefix {
            name: name.to_string(),
            prefix: prefix.to_string(),
        })
}

/// Length of the longest common prefix of `names` that ends right after an
/// underscore.
///
/// Characters are compared only up to the length of the shortest name. The
/// cut is then moved back to just after the nearest underscore at or before
/// it, so a word is never split.
///
/// # Examples
/// ```
/// use vk_registry_naming::util::common_prefix_len;
/// let names = ["example_long_type_", "example_long_type_alpha", "example_long_type_beta"];
/// assert_eq!(common_prefix_len(&names), "example_long_type_".len());
/// assert_eq!(common_prefix_len(&["cull_mode_flags_", "cull_mode_front_bit"]), "cull_mode_".len());
/// ```
pub fn common_prefix_len(names: &[&str]) -> usize {
    let Some((first, rest)) = names.split_first() else {
        return 0;
    };
    let shortest = names.iter().map(|n| n.len()).min().unwrap_or(0);
    let first = first.as_bytes();
    let mut len = 0;
    while len < shortest && rest.iter().all(|n| n.as_bytes()[len] == first[len]) {
        len += 1;
    }
    first[..len]
        .iter()
        .rposition(|&b| b == b'_')
        .map_or(0, |i| i + 1)
}

/// Drops the last underscore-separated word equal to `marker`
/// (case-insensitive), as long as another word remains.
///
/// # Examples
/// ```
/// use vk_registry_naming::util::remove_marker_word;
/// assert_eq!(remove_marker_word("graphics_bit", "bit"), "graphics");
/// assert_eq!(remove_marker_word("identity_bit_khr", "bit"), "identity_khr");
/// assert_eq!(remove_marker_word("bit", "bit"), "bit");
/// ```
pub fn remove_marker_word(name: &str, marker: &str) -> String {
    let mut words: Vec<&str> = name.split('_').collect();
    if words.len() > 1 {
        if let Some(pos) = words.iter().rposition(|w| w.eq_ignore_ascii_case(marker)) {
            words.remove(pos);
        }
    }
    words.join("_")
}
