//! Record operations the automation engine drives
//!
//! Registrar crates implement [`DnsProvider`] on top of their HTTP clients;
//! the engine only sees this interface.

use async_trait::async_trait;
use std::fmt::Debug;

use crate::error::DnsResult;

/// Challenge record name prefix for dns-01 validation.
pub const ACME_CHALLENGE_RECORD: &str = "_acme-challenge";

/// TTL for challenge records, in seconds.
pub const CHALLENGE_TTL: u32 = 60;

/// TXT record operations for dns-01 challenges.
///
/// Implementations must be thread-safe; the engine may drive several
/// domains concurrently.
#[async_trait]
pub trait DnsProvider: Send + Sync + Debug {
    /// Provider name, matching the adapter's identifier (e.g. "namecheap").
    fn name(&self) -> &'static str;

    /// Create a TXT record and return an opaque record id for cleanup.
    ///
    /// `record_name` is the relative challenge prefix (typically
    /// `_acme-challenge`); the full record is `{record_name}.{domain}`.
    async fn create_txt_record(
        &self,
        domain: &str,
        record_name: &str,
        record_value: &str,
    ) -> DnsResult<String>;

    /// Delete a TXT record created earlier.
    ///
    /// Deleting a record that no longer exists succeeds; cleanup runs even
    /// after failed validations.
    async fn delete_txt_record(&self, domain: &str, record_id: &str) -> DnsResult<()>;

    /// Whether this provider manages DNS for the given domain.
    async fn supports_domain(&self, domain: &str) -> DnsResult<bool>;
}

/// Strip a leading wildcard label.
///
/// The challenge record for `*.example.com` lives on `example.com`; plain
/// subdomains pass through unchanged.
pub fn normalize_domain(domain: &str) -> &str {
    domain.strip_prefix("*.").unwrap_or(domain)
}

/// Build the full challenge record name for a domain.
pub fn challenge_record_fqdn(domain: &str) -> String {
    format!("{}.{}", ACME_CHALLENGE_RECORD, normalize_domain(domain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DnsError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[test]
    fn normalize_strips_only_wildcard_label() {
        assert_eq!(normalize_domain("example.com"), "example.com");
        assert_eq!(normalize_domain("*.example.com"), "example.com");
        assert_eq!(normalize_domain("sub.example.com"), "sub.example.com");
        assert_eq!(normalize_domain("*.sub.example.com"), "sub.example.com");
    }

    #[test]
    fn challenge_fqdn_uses_base_domain_for_wildcards() {
        assert_eq!(
            challenge_record_fqdn("example.com"),
            "_acme-challenge.example.com"
        );
        assert_eq!(
            challenge_record_fqdn("*.example.com"),
            "_acme-challenge.example.com"
        );
        assert_eq!(
            challenge_record_fqdn("sub.example.com"),
            "_acme-challenge.sub.example.com"
        );
    }

    /// In-memory provider used to exercise the trait surface.
    #[derive(Debug, Default)]
    struct MockProvider {
        records: Mutex<HashMap<String, String>>,
    }

    #[async_trait]
    impl DnsProvider for MockProvider {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn create_txt_record(
            &self,
            domain: &str,
            record_name: &str,
            record_value: &str,
        ) -> DnsResult<String> {
            let record_id = format!("{}.{}", record_name, domain);
            self.records
                .lock()
                .unwrap()
                .insert(record_id.clone(), record_value.to_string());
            Ok(record_id)
        }

        async fn delete_txt_record(&self, _domain: &str, record_id: &str) -> DnsResult<()> {
            self.records.lock().unwrap().remove(record_id);
            Ok(())
        }

        async fn supports_domain(&self, domain: &str) -> DnsResult<bool> {
            if domain.is_empty() {
                return Err(DnsError::Configuration("empty domain".to_string()));
            }
            Ok(domain.ends_with("example.com"))
        }
    }

    #[tokio::test]
    async fn mock_provider_round_trip() {
        let provider = MockProvider::default();

        let record_id = provider
            .create_txt_record("example.com", ACME_CHALLENGE_RECORD, "challenge-value")
            .await
            .unwrap();
        assert_eq!(record_id, "_acme-challenge.example.com");
        assert_eq!(provider.records.lock().unwrap().len(), 1);

        provider
            .delete_txt_record("example.com", &record_id)
            .await
            .unwrap();
        assert!(provider.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mock_provider_supports_domain() {
        let provider = MockProvider::default();
        assert!(provider.supports_domain("sub.example.com").await.unwrap());
        assert!(!provider.supports_domain("other.org").await.unwrap());
    }
}
