use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use apkg_convert_lib::{Config, Converter};

/// Shared state for CLI commands
pub struct App {
    pub config: Config,
    pub use_color: bool,
}

impl App {
    /// Load configuration and decide on terminal colors
    pub fn new(config_path: Option<&Path>, no_color: bool) -> Result<Self> {
        let config = Config::load_or_default(config_path).context("Failed to load configuration")?;

        let use_color = !no_color && config.color.unwrap_or(true) && std::io::stdout().is_terminal();

        Ok(Self { config, use_color })
    }

    /// Open a converter for an input package
    pub fn converter(&self, input: &Path) -> Result<Converter> {
        Converter::new(PathBuf::from(input))
            .with_context(|| format!("Cannot open '{}'", input.display()))
    }
}
