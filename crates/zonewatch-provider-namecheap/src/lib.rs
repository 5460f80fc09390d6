//! # Namecheap record source
//!
//! [`RecordSource`] implementation over the Namecheap
//! `namecheap.domains.dns.getHosts` API.
//!
//! The API is a single HTTP GET whose query string carries account,
//! credential and domain parameters; the response is an XML document in the
//! `http://api.namecheap.com/xml.response` namespace containing one `host`
//! element per record, with `Name`, `Address` and `Type` attributes.
//!
//! This source is stateless and single-shot: one request per
//! `fetch_records` call, no retries, no caching. Failure policy lives in
//! the engine.
//!
//! ## Security
//!
//! The API key never appears in logs or `Debug` output. Namecheap
//! additionally requires the caller's IP (`ClientIP`) to be allow-listed
//! in the account panel; a non-listed caller gets an in-band API error,
//! which this source surfaces as a fetch error.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use zonewatch_core::{Credentials, Domain, Error, RecordSet, RecordSource, RecordType};

mod response;

pub use response::parse_hosts;

/// Namecheap API endpoint
const API_URL: &str = "https://api.namecheap.com/xml.response";

/// API command that lists host records
const GET_HOSTS_COMMAND: &str = "namecheap.domains.dns.getHosts";

/// Timeout for API requests
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Record source backed by the Namecheap DNS API.
pub struct NamecheapDns {
    credentials: Credentials,
    domain: Domain,
    client: reqwest::Client,
    api_url: String,
}

impl std::fmt::Debug for NamecheapDns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamecheapDns")
            .field("api_user", &self.credentials.api_user)
            .field("api_key", &"<REDACTED>")
            .field("domain", &self.domain.to_string())
            .finish()
    }
}

impl NamecheapDns {
    /// Create a source for one domain.
    pub fn new(credentials: Credentials, domain: Domain) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .map_err(|e| Error::http(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            credentials,
            domain,
            client,
            api_url: API_URL.to_string(),
        })
    }

    /// Point the source at a different endpoint. Test servers use this.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// The domain this source queries.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    fn query_params(&self) -> [(&'static str, &str); 7] {
        [
            ("ApiUser", self.credentials.api_user.as_str()),
            ("ApiKey", self.credentials.api_key.as_str()),
            ("UserName", self.credentials.api_user.as_str()),
            ("Command", GET_HOSTS_COMMAND),
            ("SLD", self.domain.sld()),
            ("TLD", self.domain.tld()),
            ("ClientIP", self.credentials.client_ip.as_str()),
        ]
    }
}

#[async_trait]
impl RecordSource for NamecheapDns {
    async fn fetch_records(&self, filter: Option<RecordType>) -> Result<RecordSet, Error> {
        debug!(domain = %self.domain, ?filter, "querying Namecheap for host records");

        let response = self
            .client
            .get(&self.api_url)
            .query(&self.query_params())
            .send()
            .await
            .map_err(|e| Error::http(format!("request to Namecheap failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("failed to read Namecheap response: {}", e)))?;

        if !status.is_success() {
            return Err(Error::fetch(status.as_u16(), body));
        }

        let records = parse_hosts(&body)?;
        Ok(apply_filter(records, filter))
    }

    fn source_name(&self) -> &'static str {
        "namecheap"
    }
}

/// Narrow a record set to one type, preserving document order.
fn apply_filter(records: RecordSet, filter: Option<RecordType>) -> RecordSet {
    match filter {
        Some(wanted) => records
            .iter()
            .filter(|record| record.record_type == wanted)
            .cloned()
            .collect(),
        None => records,
    }
}
