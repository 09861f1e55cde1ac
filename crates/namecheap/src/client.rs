//! Namecheap DNS API client
//!
//! Namecheap exposes an XML API at a single endpoint; every call carries the
//! account credentials as request parameters. Record updates go through
//! `namecheap.domains.dns.setHosts`, which replaces the zone's entire host
//! set, so create and delete are read-modify-write over `getHosts`.
//!
//! API reference: <https://www.namecheap.com/support/api/methods/>

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::RwLock;
use reqwest::Client;
use tracing::{debug, trace};

use dnsauth_core::{
    normalize_domain, DnsError, DnsProvider, DnsResult, HttpApiError, ProviderAdapter,
    ResolvedCredentials, CHALLENGE_TTL,
};

use crate::adapter::NamecheapAdapter;

/// Production API endpoint.
const NAMECHEAP_API: &str = "https://api.namecheap.com/xml.response";

/// Sandbox API endpoint for test accounts.
const NAMECHEAP_SANDBOX: &str = "https://api.sandbox.namecheap.com/xml.response";

/// Separator between host name and value in synthesized record ids.
///
/// Namecheap has no per-record ids; a record is identified by its name,
/// type, and value within the zone's host set.
const RECORD_ID_SEPARATOR: char = '|';

/// One host record in a zone, as returned by `getHosts`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct HostRecord {
    name: String,
    record_type: String,
    address: String,
    ttl: String,
}

/// Namecheap DNS provider client.
#[derive(Debug)]
pub struct NamecheapDns {
    http: Client,
    endpoint: String,
    username: String,
    token: String,
    client_ip: String,
    /// domain -> registered zone name
    zone_cache: RwLock<HashMap<String, String>>,
}

impl NamecheapDns {
    /// Build a client from resolved credentials.
    pub fn new(
        credentials: &ResolvedCredentials,
        timeout: Duration,
        sandbox: bool,
    ) -> DnsResult<Self> {
        let http = Client::builder().timeout(timeout).build().map_err(|e| {
            DnsError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        let field = |dest: &str| -> DnsResult<String> {
            credentials
                .get(dest)
                .map(str::to_string)
                .ok_or_else(|| DnsError::Configuration(format!("Credential field '{}' is not set", dest)))
        };

        let endpoint = if sandbox { NAMECHEAP_SANDBOX } else { NAMECHEAP_API };

        Ok(Self {
            http,
            endpoint: endpoint.to_string(),
            username: field("auth_username")?,
            token: field("auth_token")?,
            client_ip: field("auth_client_ip")?,
            zone_cache: RwLock::new(HashMap::new()),
        })
    }

    /// Authentication parameters every API command carries.
    fn base_params(&self, command: &str) -> Vec<(String, String)> {
        vec![
            ("ApiUser".to_string(), self.username.clone()),
            ("ApiKey".to_string(), self.token.clone()),
            ("UserName".to_string(), self.username.clone()),
            ("ClientIp".to_string(), self.client_ip.clone()),
            ("Command".to_string(), command.to_string()),
        ]
    }

    /// Issue a request and return the raw XML body.
    async fn dispatch(&self, request: reqwest::RequestBuilder) -> Result<String, HttpApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| HttpApiError::Transport(e.to_string()))?;

        let status = response.status();
        let url = response.url().to_string();
        if !status.is_success() {
            return Err(HttpApiError::Status {
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
                url,
            });
        }

        response
            .text()
            .await
            .map_err(|e| HttpApiError::Transport(e.to_string()))
    }

    async fn api_get(&self, params: &[(String, String)]) -> Result<String, HttpApiError> {
        self.dispatch(self.http.get(&self.endpoint).query(params)).await
    }

    async fn api_post(&self, params: &[(String, String)]) -> Result<String, HttpApiError> {
        self.dispatch(self.http.post(&self.endpoint).form(params)).await
    }

    /// Resolve the registered zone for a domain, walking parent domains.
    ///
    /// HTTP failures here are routed through the adapter's error translation
    /// hook; the resulting message is what the certificate client shows.
    async fn zone_for(&self, domain: &str) -> DnsResult<String> {
        let normalized = normalize_domain(domain);

        if let Some(zone) = self.zone_cache.read().get(normalized) {
            trace!(domain = %domain, zone = %zone, "Zone found in cache");
            return Ok(zone.clone());
        }

        // TODO: follow the Paging element for accounts with more than 100 domains.
        let mut params = self.base_params("namecheap.domains.getList");
        params.push(("PageSize".to_string(), "100".to_string()));

        let xml = match self.api_get(&params).await {
            Ok(xml) => xml,
            Err(e) => return Err(NamecheapAdapter.handle_http_error(&e, normalized).into()),
        };
        if let Some(message) = api_error_message(&xml) {
            return Err(DnsError::Api(format!("Failed to list domains: {}", message)));
        }

        let zones = parse_domain_names(&xml);
        let zone = find_matching_zone(normalized, &zones).ok_or_else(|| DnsError::ZoneNotFound {
            domain: normalized.to_string(),
        })?;

        self.zone_cache
            .write()
            .insert(normalized.to_string(), zone.clone());
        debug!(domain = %domain, zone = %zone, "Resolved zone for domain");
        Ok(zone)
    }

    /// Fetch the zone's full host set.
    async fn get_hosts(&self, zone: &str) -> DnsResult<Vec<HostRecord>> {
        let (sld, tld) = split_zone(zone)?;
        let mut params = self.base_params("namecheap.domains.dns.getHosts");
        params.push(("SLD".to_string(), sld.to_string()));
        params.push(("TLD".to_string(), tld.to_string()));

        let xml = self.api_get(&params).await?;
        if let Some(message) = api_error_message(&xml) {
            return Err(DnsError::Api(format!(
                "Failed to fetch host records for '{}': {}",
                zone, message
            )));
        }

        Ok(parse_host_records(&xml))
    }

    /// Replace the zone's host set.
    async fn set_hosts(&self, zone: &str, hosts: &[HostRecord]) -> DnsResult<()> {
        let (sld, tld) = split_zone(zone)?;
        let mut params = self.base_params("namecheap.domains.dns.setHosts");
        params.push(("SLD".to_string(), sld.to_string()));
        params.push(("TLD".to_string(), tld.to_string()));

        for (i, host) in hosts.iter().enumerate() {
            let n = i + 1;
            params.push((format!("HostName{}", n), host.name.clone()));
            params.push((format!("RecordType{}", n), host.record_type.clone()));
            params.push((format!("Address{}", n), host.address.clone()));
            params.push((format!("TTL{}", n), host.ttl.clone()));
        }

        let xml = self.api_post(&params).await?;
        if let Some(message) = api_error_message(&xml) {
            return Err(DnsError::Api(message));
        }
        Ok(())
    }
}

#[async_trait]
impl DnsProvider for NamecheapDns {
    fn name(&self) -> &'static str {
        "namecheap"
    }

    async fn create_txt_record(
        &self,
        domain: &str,
        record_name: &str,
        record_value: &str,
    ) -> DnsResult<String> {
        let zone = self.zone_for(domain).await?;
        let host_name = relative_host_name(record_name, domain, &zone);

        let mut hosts = self.get_hosts(&zone).await?;
        let record = HostRecord {
            name: host_name.clone(),
            record_type: "TXT".to_string(),
            address: record_value.to_string(),
            ttl: CHALLENGE_TTL.to_string(),
        };
        // A leftover record with the same name and value is reused as-is.
        if !hosts.contains(&record) {
            hosts.push(record);
        }

        self.set_hosts(&zone, &hosts).await.map_err(|e| match e {
            DnsError::Api(message) => DnsError::RecordCreation {
                record_name: host_name.clone(),
                message,
            },
            other => other,
        })?;

        debug!(zone = %zone, host = %host_name, "TXT record created");
        Ok(format!("{}{}{}", host_name, RECORD_ID_SEPARATOR, record_value))
    }

    async fn delete_txt_record(&self, domain: &str, record_id: &str) -> DnsResult<()> {
        let Some((host_name, value)) = record_id.split_once(RECORD_ID_SEPARATOR) else {
            return Err(DnsError::RecordDeletion {
                record_id: record_id.to_string(),
                message: "malformed record id".to_string(),
            });
        };

        let zone = self.zone_for(domain).await?;
        let hosts = self.get_hosts(&zone).await?;
        let remaining: Vec<HostRecord> = hosts
            .iter()
            .filter(|h| !(h.record_type == "TXT" && h.name == host_name && h.address == value))
            .cloned()
            .collect();

        if remaining.len() == hosts.len() {
            debug!(zone = %zone, host = %host_name, "TXT record already gone");
            return Ok(());
        }

        self.set_hosts(&zone, &remaining).await.map_err(|e| match e {
            DnsError::Api(message) => DnsError::RecordDeletion {
                record_id: record_id.to_string(),
                message,
            },
            other => other,
        })?;

        debug!(zone = %zone, host = %host_name, "TXT record deleted");
        Ok(())
    }

    async fn supports_domain(&self, domain: &str) -> DnsResult<bool> {
        match self.zone_for(domain).await {
            Ok(_) => Ok(true),
            Err(DnsError::ZoneNotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Find the registered zone covering a domain, trying exact match first and
/// then parent domains.
fn find_matching_zone(domain: &str, zones: &[String]) -> Option<String> {
    if zones.iter().any(|z| z == domain) {
        return Some(domain.to_string());
    }

    let mut current = domain;
    while let Some(pos) = current.find('.') {
        current = &current[pos + 1..];
        if zones.iter().any(|z| z == current) {
            return Some(current.to_string());
        }
    }
    None
}

/// Host name relative to the zone, `@` for the apex.
fn relative_host_name(record_name: &str, domain: &str, zone: &str) -> String {
    let fqdn = format!("{}.{}", record_name, normalize_domain(domain));
    if fqdn == zone {
        "@".to_string()
    } else if let Some(stripped) = fqdn.strip_suffix(&format!(".{}", zone)) {
        stripped.to_string()
    } else {
        fqdn
    }
}

/// Split a registered zone into the SLD/TLD pair the API expects.
///
/// Multi-label suffixes work out naturally: `example.co.uk` splits into
/// `example` and `co.uk`.
fn split_zone(zone: &str) -> DnsResult<(&str, &str)> {
    zone.split_once('.')
        .ok_or_else(|| DnsError::Configuration(format!("'{}' is not a valid zone name", zone)))
}

/// Extract the message from a `Status="ERROR"` response envelope.
fn api_error_message(xml: &str) -> Option<String> {
    if !xml.contains(r#"Status="ERROR""#) {
        return None;
    }
    Some(error_text(xml).unwrap_or_else(|| "Namecheap API error".to_string()))
}

fn error_text(xml: &str) -> Option<String> {
    let start = xml.find("<Error")?;
    let after = &xml[start..];
    let gt = after.find('>')?;
    let rest = &after[gt + 1..];
    let end = rest.find("</Error>")?;
    Some(rest[..end].trim().to_string())
}

/// Collect the opening-tag fragments of every `<element ...>` in the body.
fn collect_tags<'a>(xml: &'a str, element: &str) -> Vec<&'a str> {
    let open = format!("<{} ", element);
    let mut tags = Vec::new();
    let mut search_from = 0;

    while let Some(start) = xml[search_from..].find(&open) {
        let abs_start = search_from + start;
        match xml[abs_start..].find('>') {
            Some(end) => {
                tags.push(&xml[abs_start..abs_start + end + 1]);
                search_from = abs_start + end + 1;
            }
            None => break,
        }
    }
    tags
}

/// Extract an attribute value from an opening-tag fragment.
fn attr_value(fragment: &str, attr: &str) -> Option<String> {
    let needle = format!("{}=\"", attr);
    let start = fragment.find(&needle)? + needle.len();
    let end = fragment[start..].find('"')?;
    Some(fragment[start..start + end].to_string())
}

/// Zone names from a `domains.getList` response.
fn parse_domain_names(xml: &str) -> Vec<String> {
    collect_tags(xml, "Domain")
        .iter()
        .filter_map(|tag| attr_value(tag, "Name"))
        .collect()
}

/// Host records from a `getHosts` response.
fn parse_host_records(xml: &str) -> Vec<HostRecord> {
    let mut tags = collect_tags(xml, "host");
    tags.extend(collect_tags(xml, "Host"));

    tags.iter()
        .filter_map(|tag| {
            Some(HostRecord {
                name: attr_value(tag, "Name")?,
                record_type: attr_value(tag, "Type")?,
                address: attr_value(tag, "Address")?,
                ttl: attr_value(tag, "TTL").unwrap_or_else(|| "1800".to_string()),
            })
        })
        .collect()
}
