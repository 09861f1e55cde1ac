//! Credential loading for provider adapters
//!
//! Credentials live in a simple `key=value` file supplied by the user.
//! Loading is two-step: read the raw file, then resolve it against an
//! adapter's declared options so each value is re-keyed by the internal
//! `dest` name the engine forwards to its HTTP layer.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

use tracing::{debug, warn};

use crate::adapter::ProviderAdapter;
use crate::error::PluginError;

/// Raw contents of a `key=value` credentials file.
#[derive(Debug, Clone)]
pub struct ProviderCredentials {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl ProviderCredentials {
    /// Load a credentials file.
    ///
    /// Blank lines and `#` comments are ignored, keys and values are
    /// trimmed, and a later duplicate key wins.
    ///
    /// # Security
    ///
    /// Warns when the file is readable by group or others on Unix (should
    /// be 0600 or 0400).
    pub fn load(path: &Path) -> Result<Self, PluginError> {
        #[cfg(unix)]
        {
            if let Ok(metadata) = fs::metadata(path) {
                let file_mode = metadata.permissions().mode() & 0o777;
                if file_mode & 0o077 != 0 {
                    warn!(
                        path = %path.display(),
                        mode = format!("{:o}", file_mode),
                        "Credentials file has overly permissive permissions (should be 0600 or 0400)"
                    );
                }
            }
        }

        let content = fs::read_to_string(path).map_err(|e| PluginError::Credentials {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, PluginError> {
        let mut values = HashMap::new();

        for (line_no, line) in content.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(PluginError::Credentials {
                    path: path.display().to_string(),
                    message: format!("line {} is not in key=value form", line_no + 1),
                });
            };
            values.insert(key.trim().to_string(), value.trim().to_string());
        }

        debug!(path = %path.display(), keys = values.len(), "Loaded credentials file");
        Ok(Self {
            path: path.to_path_buf(),
            values,
        })
    }

    /// Path the credentials were loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Raw value for a file key, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Resolve the file against an adapter's declared options.
    ///
    /// Every declared option must be present under its `key`; the resulting
    /// values are re-keyed by the option's `dest` name. Field contents are
    /// not validated, the registrar API is the authority on what is valid.
    pub fn resolve(
        &self,
        adapter: &dyn ProviderAdapter,
    ) -> Result<ResolvedCredentials, PluginError> {
        let mut values = HashMap::new();

        for option in adapter.provider_options() {
            let value = self
                .values
                .get(&option.key)
                .ok_or_else(|| PluginError::MissingOption {
                    key: option.key.clone(),
                    path: self.path.display().to_string(),
                })?;
            values.insert(option.dest, value.clone());
        }

        Ok(ResolvedCredentials {
            provider: adapter.provider_name(),
            values,
        })
    }
}

/// Credential values keyed by the internal field names the engine forwards
/// to the HTTP layer.
#[derive(Debug, Clone)]
pub struct ResolvedCredentials {
    provider: &'static str,
    values: HashMap<String, String>,
}

impl ResolvedCredentials {
    /// Name of the provider these credentials were resolved for.
    pub fn provider(&self) -> &str {
        self.provider
    }

    /// Value stored under an internal `dest` field name.
    pub fn get(&self, dest: &str) -> Option<&str> {
        self.values.get(dest).map(String::as_str)
    }
}
