//! # MediPredict Configuration
//!
//! Layered configuration loading for MediPredict services. Sources are merged
//! in order, later sources overriding earlier ones:
//!
//! 1. serde defaults declared on the target struct
//! 2. configuration files (YAML, TOML or JSON, picked by extension)
//! 3. environment variables, `PREFIX__SECTION__KEY`
//!
//! ## Usage
//!
//! ```rust,no_run
//! use serde::Deserialize;
//!
//! #[derive(Deserialize)]
//! struct ServiceConfig {
//!     port: u16,
//! }
//!
//! let config: ServiceConfig = mp_config::ConfigBuilder::new()
//!     .add_optional_file("config/risk-api")
//!     .add_env_with_prefix("RISK_API")
//!     .build()
//!     .unwrap();
//! ```

use config::{Config, Environment, File};
use mp_error::{MpError, Result};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Separator between the env prefix, sections and keys.
pub const ENV_SEPARATOR: &str = "__";

/// Separator between items of an env value declared with
/// [`ConfigBuilder::list_key`].
pub const LIST_SEPARATOR: &str = ",";

/// Loads a configuration file, inferring its format from the extension.
pub fn load_from_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<T> {
    ConfigBuilder::new().add_file(path.as_ref()).build()
}

/// Loads a configuration file and applies `PREFIX__*` environment overrides.
pub fn load_with_env<T: DeserializeOwned>(path: impl AsRef<Path>, prefix: &str) -> Result<T> {
    ConfigBuilder::new()
        .add_file(path.as_ref())
        .add_env_with_prefix(prefix)
        .build()
}

/// Loads `config/<service_name>.{yaml,toml,json}` relative to the working
/// directory, with environment overrides under the upper-cased service name.
///
/// The file is optional, so a service can be configured from the
/// environment alone.
pub fn load<T: DeserializeOwned>(service_name: &str) -> Result<T> {
    ConfigBuilder::new()
        .add_optional_file(Path::new("config").join(service_name))
        .add_env_with_prefix(&env_prefix(service_name))
        .build()
}

/// Derives the env prefix for a service name: `risk-api` becomes `RISK_API`.
#[must_use]
pub fn env_prefix(service_name: &str) -> String {
    service_name
        .chars()
        .map(|c| if c == '-' { '_' } else { c.to_ascii_uppercase() })
        .collect()
}

#[derive(Debug, Clone)]
enum Source {
    File { path: PathBuf, required: bool },
    Env { prefix: String },
}

/// Builder for layered configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    sources: Vec<Source>,
    list_keys: Vec<String>,
}

impl ConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a required file. A path without an extension is looked up with
    /// each supported extension.
    #[must_use]
    pub fn add_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::File {
            path: path.into(),
            required: true,
        });
        self
    }

    /// Adds a file that is skipped when it does not exist.
    #[must_use]
    pub fn add_optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(Source::File {
            path: path.into(),
            required: false,
        });
        self
    }

    /// Adds environment variables named `PREFIX__KEY` or
    /// `PREFIX__SECTION__KEY`.
    #[must_use]
    pub fn add_env_with_prefix(mut self, prefix: &str) -> Self {
        self.sources.push(Source::Env {
            prefix: prefix.to_string(),
        });
        self
    }

    /// Declares a dotted key, e.g. `cors.allowed_origins`, whose env value is
    /// a comma-separated list.
    ///
    /// Env values are parsed as booleans and numbers where possible; only
    /// declared keys are split into lists.
    #[must_use]
    pub fn list_key(mut self, key: &str) -> Self {
        self.list_keys.push(key.to_string());
        self
    }

    /// Merges all sources and deserializes the result.
    pub fn build<T: DeserializeOwned>(self) -> Result<T> {
        let mut builder = Config::builder();

        for source in self.sources {
            match source {
                Source::File { path, required } => {
                    tracing::debug!(path = %path.display(), required, "adding config file");
                    let file = if path.extension().is_some() {
                        File::from(path.as_path())
                    } else {
                        // `with_name` tries every registered extension.
                        File::with_name(&path.to_string_lossy())
                    };
                    builder = builder.add_source(file.required(required));
                }
                Source::Env { prefix } => {
                    let mut env = Environment::with_prefix(&prefix)
                        .prefix_separator(ENV_SEPARATOR)
                        .separator(ENV_SEPARATOR)
                        .try_parsing(true);
                    // Without declared keys a list separator would split every value.
                    if !self.list_keys.is_empty() {
                        env = env.list_separator(LIST_SEPARATOR);
                        for key in &self.list_keys {
                            env = env.with_list_parse_key(key);
                        }
                    }
                    builder = builder.add_source(env);
                }
            }
        }

        builder
            .build()
            .and_then(|merged| merged.try_deserialize())
            .map_err(|e| MpError::config(e.to_string()))
    }
}
