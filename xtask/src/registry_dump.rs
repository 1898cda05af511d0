// Licensed under the Apache-2.0 license

//! Runs the whole pipeline and dumps the normalized names.

use anyhow::{Context, Result};
use std::path::Path;
use vk_registry_model::Registry;
use vk_registry_naming::{normalize, NamingConfig, NormalizedRegistry};

use crate::Format;

fn load_config(path: Option<&Path>) -> Result<NamingConfig> {
    let Some(path) = path else {
        return Ok(NamingConfig::with_defaults());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading naming config {}", path.display()))?;
    NamingConfig::from_toml(&text).with_context(|| format!("parsing {}", path.display()))
}

pub(crate) fn render(normalized: &NormalizedRegistry, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(normalized.to_string()),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(normalized)?;
            json.push('\n');
            Ok(json)
        }
    }
}

pub(crate) fn dump(
    path: &Path,
    format: Format,
    output: Option<&Path>,
    naming_config: Option<&Path>,
) -> Result<()> {
    let config = load_config(naming_config)?;
    let registry =
        Registry::load(path).with_context(|| format!("loading registry {}", path.display()))?;
    let normalized = normalize(&registry, &config)
        .with_context(|| format!("normalizing names of {}", path.display()))?;
    let text = render(&normalized, format)?;

    if let Some(output_path) = output {
        std::fs::write(output_path, &text)
            .with_context(|| format!("writing {}", output_path.display()))?;
        println!("Output written to: {}", output_path.display());
    } else {
        print!("{}", text);
    }
    Ok(())
}
