//! Error vocabulary shared by the automation engine and provider adapters
//!
//! [`HttpApiError`] is the transport-level failure surface handed to adapter
//! error-translation hooks. [`PluginError`] is what the certificate client
//! reports to the end user. [`DnsError`] covers record operations.

use std::fmt;

use thiserror::Error;

/// HTTP-layer failure surfaced from a registrar API call.
///
/// The `Display` form of a status failure follows the conventional
/// `"<code> <class> Error: <reason> for url: <url>"` shape. Adapter hooks
/// match on that textual form, so it must stay stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HttpApiError {
    /// The server answered with a non-success status code.
    Status {
        /// HTTP status code.
        code: u16,
        /// Canonical reason phrase ("Unauthorized", "Bad Gateway", ...).
        reason: String,
        /// Full request URL.
        url: String,
    },
    /// The request failed before any response arrived.
    Transport(String),
}

impl fmt::Display for HttpApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status { code, reason, url } => {
                let class = match code {
                    400..=499 => "Client",
                    500..=599 => "Server",
                    _ => "HTTP",
                };
                write!(f, "{} {} Error: {} for url: {}", code, class, reason, url)
            }
            Self::Transport(message) => f.write_str(message),
        }
    }
}

impl std::error::Error for HttpApiError {}

/// Plugin-level error reported to the certificate client.
///
/// The client surfaces the message to the end user and aborts issuance for
/// the affected domain.
#[derive(Debug, Error)]
pub enum PluginError {
    /// Zone identifier lookup failed for a domain.
    ///
    /// Produced by [`ProviderAdapter::handle_http_error`], optionally with an
    /// actionable hint rendered in parentheses.
    ///
    /// [`ProviderAdapter::handle_http_error`]: crate::adapter::ProviderAdapter::handle_http_error
    #[error("Error determining zone identifier for {}: {}.{}", .domain, .error, hint_suffix(.hint))]
    ZoneLookup {
        /// Domain being processed.
        domain: String,
        /// Textual form of the original HTTP error.
        error: String,
        /// Optional hint appended to the message.
        hint: Option<String>,
    },

    /// Credentials file could not be read or parsed.
    #[error("Failed to load credentials from '{path}': {message}")]
    Credentials {
        /// Credentials file path.
        path: String,
        /// What went wrong.
        message: String,
    },

    /// A required provider option is missing from the credentials file.
    #[error("Missing property '{key}' in credentials file '{path}'")]
    MissingOption {
        /// The option key that was not found.
        key: String,
        /// Credentials file path.
        path: String,
    },
}

fn hint_suffix(hint: &Option<String>) -> String {
    match hint {
        Some(hint) => format!(" ({})", hint),
        None => String::new(),
    }
}

/// Errors from DNS record operations against a registrar.
#[derive(Debug, Error)]
pub enum DnsError {
    /// Plugin-level error, passed through to the client untouched.
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// HTTP request failed outside the zone-lookup step.
    #[error(transparent)]
    Http(#[from] HttpApiError),

    /// No zone in the account matches the domain.
    #[error("Zone not found for domain '{domain}'")]
    ZoneNotFound {
        /// The domain that could not be matched to a zone.
        domain: String,
    },

    /// The registrar API reported an error in an otherwise successful
    /// response.
    #[error("API request failed: {0}")]
    Api(String),

    /// TXT record creation failed.
    #[error("Failed to create TXT record for '{record_name}': {message}")]
    RecordCreation {
        /// Host name of the record.
        record_name: String,
        /// What went wrong.
        message: String,
    },

    /// TXT record deletion failed.
    #[error("Failed to delete TXT record '{record_id}': {message}")]
    RecordDeletion {
        /// Record id returned from creation.
        record_id: String,
        /// What went wrong.
        message: String,
    },

    /// Provider construction or configuration problem.
    #[error("Invalid configuration: {0}")]
    Configuration(String),
}

/// Result type for DNS record operations.
pub type DnsResult<T> = Result<T, DnsError>;
