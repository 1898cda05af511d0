// Licensed under the Apache-2.0 license

//! Normalized output records and their text rendering.
//!
//! ```text
//! Registry → NormalizedRegistry
//!            ├── Enumeration[]  → enumerations without a bitmask
//!            ├── Bitmask[]      → one per bitmask type, with its flag bits
//!            └── Constant[]     → API constants and extension constants
//! ```
//!
//! Every record keeps the raw registry name next to the canonical one. The
//! text form produced by [`std::fmt::Display`] looks like:
//!
//! ```text
//! enum image_type (VkImageType)
//!     alias image_type_ext
//!     n1d = 0 (VK_IMAGE_TYPE_1D)
//!         alias n1d_ext
//! bitmask queue_flags (VkQueueFlags): VkFlags
//!     graphics = bitpos 0 (VK_QUEUE_GRAPHICS_BIT)
//! const max_extension_name_size = 256 (VK_MAX_EXTENSION_NAME_SIZE)
//! ```

use std::fmt;

use serde::Serialize;

//=============================================================================
// Records
//=============================================================================

/// Value of an enumerator, as written in the registry.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumeratorValue {
    Value(String),
    Bitpos(String),
    /// Extension-relative value. The final number depends on the owning
    /// extension's number unless `extnumber` overrides it.
    Offset {
        offset: String,
        extnumber: Option<String>,
        dir: Option<String>,
    },
}

impl fmt::Display for EnumeratorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnumeratorValue::Value(v) => write!(f, "{v}"),
            EnumeratorValue::Bitpos(b) => write!(f, "bitpos {b}"),
            EnumeratorValue::Offset {
                offset,
                extnumber,
                dir,
            } => {
                write!(f, "{}offset {offset}", dir.as_deref().unwrap_or(""))?;
                if let Some(extnumber) = extnumber {
                    write!(f, " extnumber {extnumber}")?;
                }
                Ok(())
            }
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Enumerator {
    pub name: String,
    pub raw_name: String,
    /// Canonical names of enumerators aliasing this one, sorted.
    pub aliases: Vec<String>,
    pub value: EnumeratorValue,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Enumeration {
    pub name: String,
    pub raw_name: String,
    pub aliases: Vec<String>,
    /// Preprocessor guard of the owning platform, if any.
    pub guard: Option<String>,
    /// In registry order: block members first, then extension additions.
    pub enumerators: Vec<Enumerator>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Bitmask {
    pub name: String,
    pub raw_name: String,
    pub aliases: Vec<String>,
    pub guard: Option<String>,
    /// Underlying integer type, `VkFlags` or `VkFlags64`.
    pub flags_type: String,
    /// The flag bits. Absent when the bitmask names no enumeration.
    pub enumeration: Option<Enumeration>,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Constant {
    pub name: String,
    pub raw_name: String,
    pub aliases: Vec<String>,
    pub guard: Option<String>,
    pub value: String,
}

/// Everything the normalizer produces, each list sorted by canonical name.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct NormalizedRegistry {
    pub enumerations: Vec<Enumeration>,
    pub bitmasks: Vec<Bitmask>,
    pub constants: Vec<Constant>,
}

impl NormalizedRegistry {
    pub fn enumeration(&self, name: &str) -> Option<&Enumeration> {
        self.enumerations.iter().find(|e| e.name == name)
    }

    pub fn bitmask(&self, name: &str) -> Option<&Bitmask> {
        self.bitmasks.iter().find(|b| b.name == name)
    }

    pub fn constant(&self, name: &str) -> Option<&Constant> {
        self.constants.iter().find(|c| c.name == name)
    }
}

impl Enumeration {
    pub fn enumerator(&self, name: &str) -> Option<&Enumerator> {
        self.enumerators.iter().find(|e| e.name == name)
    }
}

//=============================================================================
// Text rendering
//=============================================================================

const INDENT: &str = "    ";

fn write_aliases(f: &mut fmt::Formatter<'_>, indent: &str, aliases: &[String]) -> fmt::Result {
    for alias in aliases {
        writeln!(f, "{indent}alias {alias}")?;
    }
    Ok(())
}

fn write_guard(f: &mut fmt::Formatter<'_>, guard: &Option<String>) -> fmt::Result {
    if let Some(guard) = guard {
        writeln!(f, "{INDENT}guard {guard}")?;
    }
    Ok(())
}

fn write_enumerators(f: &mut fmt::Formatter<'_>, enumeration: &Enumeration) -> fmt::Result {
    for e in &enumeration.enumerators {
        writeln!(f, "{INDENT}{} = {} ({})", e.name, e.value, e.raw_name)?;
        write_aliases(f, &INDENT.repeat(2), &e.aliases)?;
    }
    Ok(())
}

impl fmt::Display for Enumeration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "enum {} ({})", self.name, self.raw_name)?;
        write_aliases(f, INDENT, &self.aliases)?;
        write_guard(f, &self.guard)?;
        write_enumerators(f, self)
    }
}

impl fmt::Display for Bitmask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "bitmask {} ({}): {}", self.name, self.raw_name, self.flags_type)?;
        write_aliases(f, INDENT, &self.aliases)?;
        write_guard(f, &self.guard)?;
        if let Some(bits) = &self.enumeration {
            write_enumerators(f, bits)?;
        }
        Ok(())
    }
}

impl fmt::Display for Constant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "const {} = {} ({})", self.name, self.value, self.raw_name)?;
        write_aliases(f, INDENT, &self.aliases)?;
        write_guard(f, &self.guard)
    }
}

impl fmt::Display for NormalizedRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.enumerations {
            write!(f, "{e}")?;
        }
        for b in &self.bitmasks {
            write!(f, "{b}")?;
        }
        for c in &self.constants {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_type() -> Enumeration {
        Enumeration {
            name: "image_type".into(),
            raw_name: "VkImageType".into(),
            aliases: vec!["image_type_ext".into()],
            guard: None,
            enumerators: vec![Enumerator {
                name: "n1d".into(),
                raw_name: "VK_IMAGE_TYPE_1D".into(),
                aliases: vec!["n1d_ext".into()],
                value: EnumeratorValue::Value("0".into()),
            }],
        }
    }

    #[test]
    fn test_enumeration_text() {
        assert_eq!(
            image_type().to_string(),
            "enum image_type (VkImageType)\n\
             \x20   alias image_type_ext\n\
             \x20   n1d = 0 (VK_IMAGE_TYPE_1D)\n\
             \x20       alias n1d_ext\n"
        );
    }

    #[test]
    fn test_bitmask_text() {
        let bitmask = Bitmask {
            name: "xlib_surface_create_flags_khr".into(),
            raw_name: "VkXlibSurfaceCreateFlagsKHR".into(),
            aliases: vec![],
            guard: Some("VK_USE_PLATFORM_XLIB_KHR".into()),
            flags_type: "VkFlags".into(),
            enumeration: None,
        };
        assert_eq!(
            bitmask.to_string(),
            "bitmask xlib_surface_create_flags_khr (VkXlibSurfaceCreateFlagsKHR): VkFlags\n\
             \x20   guard VK_USE_PLATFORM_XLIB_KHR\n"
        );
    }

    #[test]
    fn test_value_text() {
        assert_eq!(EnumeratorValue::Bitpos("3".into()).to_string(), "bitpos 3");
        assert_eq!(
            EnumeratorValue::Offset {
                offset: "1".into(),
                extnumber: Some("12".into()),
                dir: Some("-".into()),
            }
            .to_string(),
            "-offset 1 extnumber 12"
        );
    }

    #[test]
    fn test_lookup() {
        let registry = NormalizedRegistry {
            enumerations: vec![image_type()],
            ..Default::default()
        };
        let e = registry.enumeration("image_type").unwrap();
        assert_eq!(e.enumerator("n1d").unwrap().raw_name, "VK_IMAGE_TYPE_1D");
        assert!(registry.bitmask("image_type").is_none());
        assert!(registry.constant("n1d").is_none());
    }
}
