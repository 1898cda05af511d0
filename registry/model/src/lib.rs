// Licensed under the Apache-2.0 license

//! Resolved symbolic model of a Vulkan `vk.xml` API registry.
//!
//! Building a [`Registry`] runs three stages over the whole document:
//!
//! 1. [`RegistryBuilder`] classifies every section into typed entities,
//!    validating a closed attribute schema per element kind.
//! 2. [`Registry::build`] registers every entity under its name, binds
//!    aliases and resolves every cross-reference.
//! 3. Liveness marking and platform tagging run over the feature and
//!    extension requirement lists.
//!
//! Any inconsistency is fatal and reported as a [`RegistryError`].
//!
//! ```
//! use vk_registry_model::Registry;
//!
//! let registry = Registry::parse(
//!     r#"<registry>
//!          <types>
//!            <type category="struct" name="VkExtent2D"/>
//!            <type category="struct" name="VkExtent2DKHR" alias="VkExtent2D"/>
//!          </types>
//!        </registry>"#,
//! )
//! .unwrap();
//! assert_eq!(registry.lookup("VkExtent2DKHR"), registry.lookup("VkExtent2D"));
//! ```

pub mod builder;
pub mod entity;
mod error;
mod registry;
mod resolve;

pub use builder::RegistryBuilder;
pub use entity::*;
pub use error::{RegistryError, Result};
pub use registry::Registry;
pub use vk_registry_declarator::{ArrayLen, TypeId};
