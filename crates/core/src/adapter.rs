//! Provider adapter capability and option descriptors
//!
//! A provider adapter declares which named credential options its registrar
//! needs, identifies itself by a short lowercase name the engine dispatches
//! on, and may override how an HTTP failure during zone identifier lookup is
//! reported to the user.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::error::{HttpApiError, PluginError};

/// Default wait between record creation and validation, in seconds.
pub const DEFAULT_PROPAGATION_SECONDS: u32 = 120;

/// One named credential option a provider requires.
///
/// The `key` is how the option appears in the user's credentials file; the
/// `dest` is the internal field name the engine stores and forwards the
/// value under. Field contents are not validated here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderOption {
    /// Key under which the option appears in the credentials file.
    pub key: String,
    /// Human-readable description shown in help output.
    pub description: String,
    /// Internal field name the engine stores the value under.
    pub dest: String,
}

impl ProviderOption {
    /// Create an option descriptor.
    pub fn new(
        key: impl Into<String>,
        description: impl Into<String>,
        dest: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
            dest: dest.into(),
        }
    }
}

/// One command-line option contributed to the host framework's parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParserArgument {
    /// Option name, without any provider prefix.
    pub name: String,
    /// Help text.
    pub help: String,
    /// Default value, if any.
    pub default: Option<String>,
}

impl ParserArgument {
    /// Create an argument with a default value.
    pub fn new(name: impl Into<String>, help: impl Into<String>, default: Option<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            default,
        }
    }

    /// The propagation-wait argument every DNS plugin inherits.
    pub fn propagation_seconds(default: u32) -> Self {
        Self::new(
            "propagation-seconds",
            "The number of seconds to wait for DNS to propagate before asking the ACME server \
             to verify the DNS record",
            Some(default.to_string()),
        )
    }

    /// A path-valued argument with no default.
    pub fn path(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self::new(name, help, None)
    }
}

/// Capability implemented by registrar-specific provider adapters.
///
/// The automation engine accepts any implementation; dispatch happens by
/// provider name through [`ProviderRegistry`].
pub trait ProviderAdapter: Send + Sync {
    /// Fixed lowercase identifier used for lookup and dispatch.
    ///
    /// Must match the name the automation engine expects for this registrar;
    /// a mismatch is a configuration bug, not a recoverable condition.
    fn provider_name(&self) -> &'static str;

    /// Named credential options this provider requires.
    fn provider_options(&self) -> Vec<ProviderOption>;

    /// One-line description shown in plugin listings.
    fn description(&self) -> &'static str;

    /// Longer help text shown in verbose output.
    fn more_info(&self) -> &'static str;

    /// Command-line options to register with the host parser.
    ///
    /// The base surface is the propagation wait; adapters append their own
    /// options on top.
    fn parser_arguments(&self, default_propagation_seconds: u32) -> Vec<ParserArgument> {
        vec![ParserArgument::propagation_seconds(default_propagation_seconds)]
    }

    /// Translate an HTTP failure during zone identifier lookup into the
    /// plugin error reported to the user.
    ///
    /// The default form carries no hint; adapters override this to append
    /// registrar-specific guidance for failures they recognize.
    fn handle_http_error(&self, error: &HttpApiError, domain: &str) -> PluginError {
        PluginError::ZoneLookup {
            domain: domain.to_string(),
            error: error.to_string(),
            hint: None,
        }
    }
}

/// Registry of provider adapters keyed by provider name.
#[derive(Default)]
pub struct ProviderRegistry {
    adapters: HashMap<&'static str, Arc<dyn ProviderAdapter>>,
}

impl ProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter under its provider name.
    ///
    /// A later registration with the same name replaces the earlier one.
    pub fn register(&mut self, adapter: Arc<dyn ProviderAdapter>) {
        let name = adapter.provider_name();
        debug!(provider = name, "Registered provider adapter");
        self.adapters.insert(name, adapter);
    }

    /// Look up an adapter by its exact provider name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(name).cloned()
    }

    /// Names of all registered providers, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.adapters.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
