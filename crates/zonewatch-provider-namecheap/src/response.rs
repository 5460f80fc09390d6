//! Namecheap response parsing
//!
//! Responses are XML in the `http://api.namecheap.com/xml.response`
//! namespace:
//!
//! ```xml
//! <ApiResponse Status="OK" xmlns="http://api.namecheap.com/xml.response">
//!   <CommandResponse Type="namecheap.domains.dns.getHosts">
//!     <DomainDNSGetHostsResult Domain="example.com">
//!       <host HostId="12" Name="www" Type="A" Address="1.2.3.4" TTL="1800" />
//!     </DomainDNSGetHostsResult>
//!   </CommandResponse>
//! </ApiResponse>
//! ```
//!
//! The envelope carries its own error channel: `Status="ERROR"` with an
//! `Errors` block, delivered with HTTP 200. Both are surfaced as fetch
//! errors here.

use tracing::debug;

use zonewatch_core::{Error, Record, RecordSet};

/// XML namespace of every Namecheap API response
pub const RESPONSE_NAMESPACE: &str = "http://api.namecheap.com/xml.response";

/// Parse a `getHosts` response body into a [`RecordSet`].
///
/// Host entries keep document order. Entries whose `Type` falls outside
/// the supported set (Namecheap also serves NS, URL and FRAME records) are
/// skipped; a `host` element missing one of its attributes is a hard parse
/// error.
pub fn parse_hosts(body: &str) -> Result<RecordSet, Error> {
    let doc = roxmltree::Document::parse(body)
        .map_err(|e| Error::invalid_response(format!("malformed XML: {}", e)))?;

    let root = doc.root_element();
    if root.attribute("Status").is_some_and(|s| s.eq_ignore_ascii_case("error")) {
        return Err(Error::fetch(200, api_error_text(&doc)));
    }

    let mut records = RecordSet::new();
    for host in doc
        .descendants()
        .filter(|node| node.has_tag_name((RESPONSE_NAMESPACE, "host")))
    {
        let name = required_attribute(&host, "Name")?;
        let address = required_attribute(&host, "Address")?;
        let type_attr = required_attribute(&host, "Type")?;

        match type_attr.parse() {
            Ok(record_type) => records.push(Record::new(name, address, record_type)),
            Err(_) => {
                debug!(name, record_type = type_attr, "skipping unsupported record type");
            }
        }
    }

    Ok(records)
}

fn required_attribute<'a>(
    node: &roxmltree::Node<'a, '_>,
    name: &str,
) -> Result<&'a str, Error> {
    node.attribute(name).ok_or_else(|| {
        Error::invalid_response(format!("host element missing '{}' attribute", name))
    })
}

/// Collect the text of every `Error` element, falling back to a generic
/// message when the envelope is unhelpful.
fn api_error_text(doc: &roxmltree::Document<'_>) -> String {
    let messages: Vec<&str> = doc
        .descendants()
        .filter(|node| node.has_tag_name((RESPONSE_NAMESPACE, "Error")))
        .filter_map(|node| node.text())
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .collect();

    if messages.is_empty() {
        "API reported an error without details".to_string()
    } else {
        messages.join("; ")
    }
}
