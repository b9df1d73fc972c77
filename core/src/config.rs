//! Configuration shared by embedded server implementations.

use std::num::ParseIntError;

use thiserror::Error;

/// Environment variable holding the port to bind (`0` picks a free one).
pub const PORT_VAR: &str = "HARNESS_PORT";
/// Environment variable holding the path the application is mounted under.
pub const PATH_VAR: &str = "HARNESS_PATH";

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("invalid {var} value {value:?}: {source}")]
    InvalidPort {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Where an embedded server listens.
///
/// Defaults to a random free port (`0`) and the root path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedConfiguration {
    port: u16,
    path: String,
}

impl Default for EmbeddedConfiguration {
    fn default() -> Self {
        Self {
            port: 0,
            path: "/".to_string(),
        }
    }
}

impl EmbeddedConfiguration {
    pub fn builder() -> EmbeddedConfigurationBuilder {
        EmbeddedConfigurationBuilder::default()
    }

    /// Read `HARNESS_PORT` and `HARNESS_PATH`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();
        if let Some(value) = lookup(PORT_VAR) {
            let port = value.trim().parse().map_err(|source| ConfigError::InvalidPort {
                var: PORT_VAR,
                value: value.clone(),
                source,
            })?;
            builder = builder.port(port);
        }
        if let Some(path) = lookup(PATH_VAR) {
            builder = builder.path(path);
        }
        Ok(builder.build())
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

#[derive(Debug, Clone, Default)]
pub struct EmbeddedConfigurationBuilder {
    inner: EmbeddedConfiguration,
}

impl EmbeddedConfigurationBuilder {
    pub fn port(mut self, port: u16) -> Self {
        self.inner.port = port;
        self
    }

    /// Mount path. A missing leading `/` is added and a trailing `/` is kept
    /// only for the root.
    pub fn path(mut self, path: impl AsRef<str>) -> Self {
        self.inner.path = normalize_path(path.as_ref());
        self
    }

    pub fn build(self) -> EmbeddedConfiguration {
        self.inner
    }
}

fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}
