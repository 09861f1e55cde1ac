//! Namecheap provider plugin for DNS-01 certificate validation
//!
//! Fulfills a dns-01 challenge by publishing a TXT record through the
//! Namecheap API.
//!
//! # Architecture
//!
//! - [`NamecheapAdapter`] - Declares the credential options the registrar
//!   needs, the `"namecheap"` provider name, and the error translation for
//!   authentication failures during zone lookup
//! - [`NamecheapDns`] - API client implementing the record operations
//!
//! # Credentials
//!
//! The plugin needs three values in a `key=value` credentials file:
//!
//! ```ini
//! username = my-account
//! token = 0123456789abcdef
//! client_ip = 203.0.113.10
//! ```
//!
//! The API token comes from the account's API access page, and the client
//! IP must be whitelisted there before any call succeeds.

pub mod adapter;
pub mod client;

pub use adapter::NamecheapAdapter;
pub use client::NamecheapDns;
