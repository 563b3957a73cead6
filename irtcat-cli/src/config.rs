/// Config file loading and creation for the irtcat CLI.
///
/// Config lives at ~/.config/irtcat/config.toml.
/// All fields are optional — CLI args override config values, config values
/// override the engine defaults.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Deserialize, Default)]
pub struct IrtcatConfig {
    pub bank: Option<PathBuf>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub stopping_se: Option<f64>,
    pub start_theta: Option<f64>,
    pub replications: Option<usize>,
    pub seed: Option<u64>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# irtcat configuration
# All values here can be overridden by CLI flags.

# Item bank file (JSON array of items, or { \"items\": [...] })
# bank = \"/path/to/item-bank.json\"

# Minimum number of items before the test may stop on precision
# min_items = 20

# Hard ceiling on the number of items
# max_items = 30

# Stop once the standard error is at or below this value
# stopping_se = 0.3

# Fixed starting theta, used when the command line gives none of
# --start-theta, --age or --education
# start_theta = 0.0

# Simulation: replications per true theta, and RNG seed
# replications = 100
# seed = 1
";

/// Returns the default config path: ~/.config/irtcat/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home).join(".config").join("irtcat").join("config.toml")
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> IrtcatConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => parse_config(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => IrtcatConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

pub fn parse_config(content: &str) -> Result<IrtcatConfig, toml::de::Error> {
    toml::from_str(content)
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_parses_to_defaults() {
        let cfg = parse_config(DEFAULT_CONFIG_TEMPLATE).unwrap();
        assert!(cfg.bank.is_none());
        assert!(cfg.min_items.is_none());
        assert!(cfg.stopping_se.is_none());
    }

    #[test]
    fn test_parse_values() {
        let cfg = parse_config("min_items = 10\nmax_items = 25\nstopping_se = 0.25\nseed = 7\n").unwrap();
        assert_eq!(cfg.min_items, Some(10));
        assert_eq!(cfg.max_items, Some(25));
        assert_eq!(cfg.stopping_se, Some(0.25));
        assert_eq!(cfg.seed, Some(7));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let cfg = load_config(Path::new("/nonexistent/irtcat/config.toml"));
        assert!(cfg.max_items.is_none());
    }
}
