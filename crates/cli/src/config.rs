//! Input files for the CLI: flag definition files and the server config.
//!
//! # Example (`flagpress.toml`)
//!
//! ```toml
//! bind = "127.0.0.1"
//! port = 8080
//!
//! [[distributions]]
//! key = "web-sdk-key"
//! flags = "flags/web.toml"
//! salt = "c0ffee"
//!
//! # Recognized, but nothing published until a flags file is supplied.
//! [[distributions]]
//! key = "mobile-sdk-key"
//! ```

use std::path::{Path, PathBuf};

use flagpress_core::FlagSet;
use flagpress_model::Preferences;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not parse '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("invalid distribution '{0}': expected KEY=FLAGS_FILE")]
    BadDistribution(String),

    #[error("distribution '{0}' is listed more than once")]
    DuplicateKey(String),
}

/// `flagpress.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServeConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
    #[serde(default)]
    pub distributions: Vec<Distribution>,
}

/// One `[[distributions]]` entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub key: String,
    /// Flag definition file. Without one the key is only reserved.
    pub flags: Option<PathBuf>,
    pub salt: Option<String>,
    pub base_url: Option<String>,
}

impl Distribution {
    pub fn preferences(&self) -> Option<Preferences> {
        if self.salt.is_none() && self.base_url.is_none() {
            return None;
        }
        Some(Preferences {
            base_url: self.base_url.clone(),
            salt: self.salt.clone(),
            ..Preferences::default()
        })
    }
}

impl ServeConfig {
    /// Read a config file. Relative flag paths are resolved against the
    /// directory containing it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = read(path)?;
        let mut config: ServeConfig =
            toml::from_str(&content).map_err(|e| ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        for dist in &mut config.distributions {
            if let Some(flags) = &dist.flags {
                if flags.is_relative() {
                    dist.flags = Some(base.join(flags));
                }
            }
        }
        Ok(config)
    }

    /// Append `KEY=FLAGS_FILE` distributions given on the command line and
    /// reject duplicate keys.
    pub fn merge_args(&mut self, args: &[String]) -> Result<(), ConfigError> {
        for arg in args {
            let (key, file) = arg
                .split_once('=')
                .filter(|(k, f)| !k.is_empty() && !f.is_empty())
                .ok_or_else(|| ConfigError::BadDistribution(arg.clone()))?;
            self.distributions.push(Distribution {
                key: key.to_owned(),
                flags: Some(PathBuf::from(file)),
                salt: None,
                base_url: None,
            });
        }

        let mut seen = std::collections::HashSet::new();
        for dist in &self.distributions {
            if !seen.insert(dist.key.as_str()) {
                return Err(ConfigError::DuplicateKey(dist.key.clone()));
            }
        }
        Ok(())
    }
}

/// Load a flag definition file. `.toml` files are read as TOML, anything
/// else as JSON.
pub fn load_flags(path: &Path) -> Result<FlagSet, ConfigError> {
    let content = read(path)?;
    let parsed = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| e.to_string()),
        _ => serde_json::from_str(&content).map_err(|e| e.to_string()),
    };
    parsed.map_err(|message| ConfigError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

fn read(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}
