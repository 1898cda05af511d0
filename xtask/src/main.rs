// Licensed under the Apache-2.0 license

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;
use simple_logger::SimpleLogger;

mod registry_check;
mod registry_dump;

#[derive(Parser)]
#[command(name = "xtask", version, about, long_about = None)]
struct Xtask {
    #[command(subcommand)]
    xtask: Commands,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub(crate) enum Format {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize a registry and print the enumerations, bitmasks and constants
    RegistryDump {
        /// Path to vk.xml
        path: PathBuf,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// TOML file overriding the default naming configuration
        #[arg(long, value_name = "FILE")]
        naming_config: Option<PathBuf>,

        /// Enable debug logging
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },
    /// Ingest and resolve a registry, then print a summary
    RegistryCheck {
        /// Path to vk.xml
        path: PathBuf,

        /// List entities no feature or extension requires
        #[arg(long, default_value_t = false)]
        list_unreferenced: bool,

        /// Enable debug logging
        #[arg(short, long, default_value_t = false)]
        verbose: bool,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let _ = SimpleLogger::new().with_level(level).init();
}

fn main() {
    let cli = Xtask::parse();
    let result = match &cli.xtask {
        Commands::RegistryDump {
            path,
            format,
            output,
            naming_config,
            verbose,
        } => {
            init_logging(*verbose);
            registry_dump::dump(path, *format, output.as_deref(), naming_config.as_deref())
        }
        Commands::RegistryCheck {
            path,
            list_unreferenced,
            verbose,
        } => {
            init_logging(*verbose);
            registry_check::check(path, *list_unreferenced)
        }
    };
    result.unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}
