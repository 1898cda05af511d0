// Licensed under the Apache-2.0 license

//! Ingests and resolves a registry without normalizing it.

use anyhow::{Context, Result};
use log::info;
use std::path::Path;
use vk_registry_model::Registry;

pub(crate) fn summary(registry: &Registry) -> String {
    let mut text = format!(
        "{} entities, {} symbols, {} features, {} extensions\n",
        registry.entity_count(),
        registry.symbol_count(),
        registry.features().len(),
        registry.extensions().len()
    );
    for (kind, count) in registry.kind_counts() {
        text.push_str(&format!("  {kind}: {count}\n"));
    }
    text
}

pub(crate) fn check(path: &Path, list_unreferenced: bool) -> Result<()> {
    let registry =
        Registry::load(path).with_context(|| format!("loading registry {}", path.display()))?;
    print!("{}", summary(&registry));

    let unreferenced: Vec<_> = registry.unreferenced().collect();
    info!("{} entities are not required by any feature or extension", unreferenced.len());
    if list_unreferenced {
        for entity in unreferenced {
            println!("unreferenced {} {}", entity.kind.label(), entity.name);
        }
    }
    Ok(())
}
