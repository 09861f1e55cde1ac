//! Namecheap provider adapter
//!
//! Declares the credential options the Namecheap API requires and translates
//! authentication failures during zone lookup into an actionable message.

use dnsauth_core::{HttpApiError, ParserArgument, PluginError, ProviderAdapter, ProviderOption};

/// Control-panel page where account holders generate API tokens.
const API_ACCESS_URL: &str = "https://ap.www.namecheap.com/settings/tools/apiaccess/";

/// Textual prefix of an authentication failure surfaced by the HTTP layer.
const UNAUTHORIZED_PREFIX: &str = "401 Client Error: Unauthorized for url:";

/// Hint appended when authentication fails.
const CREDENTIALS_HINT: &str = "Are your email and API token values correct?";

/// Provider adapter for Namecheap DNS.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamecheapAdapter;

impl ProviderAdapter for NamecheapAdapter {
    fn provider_name(&self) -> &'static str {
        "namecheap"
    }

    fn provider_options(&self) -> Vec<ProviderOption> {
        vec![
            ProviderOption::new(
                "username",
                "username associated with Namecheap account",
                "auth_username",
            ),
            ProviderOption::new(
                "token",
                format!(
                    "API token for Namecheap account, obtained from {}",
                    API_ACCESS_URL
                ),
                "auth_token",
            ),
            ProviderOption::new(
                "client_ip",
                "IP address whitelisted in Namecheap",
                "auth_client_ip",
            ),
        ]
    }

    fn description(&self) -> &'static str {
        "Obtain certificates using a DNS TXT record (if you are using Namecheap for DNS)."
    }

    fn more_info(&self) -> &'static str {
        "This plugin configures a DNS TXT record to respond to a dns-01 challenge using the \
         Namecheap API."
    }

    fn parser_arguments(&self, default_propagation_seconds: u32) -> Vec<ParserArgument> {
        vec![
            ParserArgument::propagation_seconds(default_propagation_seconds),
            ParserArgument::path("credentials", "Namecheap credentials INI file."),
        ]
    }

    fn handle_http_error(&self, error: &HttpApiError, domain: &str) -> PluginError {
        let text = error.to_string();
        let hint = text
            .starts_with(UNAUTHORIZED_PREFIX)
            .then(|| CREDENTIALS_HINT.to_string());

        PluginError::ZoneLookup {
            domain: domain.to_string(),
            error: text,
            hint,
        }
    }
}
