//! Provider plugin seam for DNS-01 certificate validation
//!
//! A certificate client proves control of a domain by publishing a TXT
//! record; a registrar-specific provider plugin supplies the credentials and
//! record operations needed to do so. This crate defines the seam between
//! the two sides:
//!
//! - [`ProviderAdapter`] - Capability implemented by registrar plugins:
//!   declared credential options, provider name, error translation
//! - [`ProviderRegistry`] - Name-based dispatch to registered adapters
//! - [`DnsProvider`] - Record operations the automation engine drives
//! - [`ProviderCredentials`] - `key=value` credentials file loading
//!
//! The crate performs no network I/O of its own; registrar crates implement
//! [`DnsProvider`] on top of their HTTP clients.

pub mod adapter;
pub mod credentials;
pub mod error;
pub mod provider;

pub use adapter::{
    ParserArgument, ProviderAdapter, ProviderOption, ProviderRegistry,
    DEFAULT_PROPAGATION_SECONDS,
};
pub use credentials::{ProviderCredentials, ResolvedCredentials};
pub use error::{DnsError, DnsResult, HttpApiError, PluginError};
pub use provider::{
    challenge_record_fqdn, normalize_domain, DnsProvider, ACME_CHALLENGE_RECORD, CHALLENGE_TTL,
};
