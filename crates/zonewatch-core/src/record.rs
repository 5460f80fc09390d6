//! DNS record value types
//!
//! Records are parsed once at the provider boundary and immutable after
//! that. A [`RecordSet`] keeps provider document order but compares as a
//! set for cache purposes: two snapshots with the same records in a
//! different order are the same snapshot.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The record types zonewatch understands.
///
/// Parsing any other string fails with [`Error::InvalidRecordType`]; the
/// provider may serve additional types (NS, URL, FRAME) which are skipped
/// at the parse boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// A record (IPv4 address)
    A,
    /// AAAA record (IPv6 address)
    Aaaa,
    /// CNAME record (alias)
    Cname,
    /// MX record (mail exchanger)
    Mx,
    /// TXT record (free-form text, used for DNS-01 challenges)
    Txt,
}

impl RecordType {
    /// All supported record types, for diagnostics.
    pub const ALL: [RecordType; 5] = [
        RecordType::A,
        RecordType::Aaaa,
        RecordType::Cname,
        RecordType::Mx,
        RecordType::Txt,
    ];

    /// The uppercase wire name of this record type.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Mx => "MX",
            RecordType::Txt => "TXT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(RecordType::A),
            "AAAA" => Ok(RecordType::Aaaa),
            "CNAME" => Ok(RecordType::Cname),
            "MX" => Ok(RecordType::Mx),
            "TXT" => Ok(RecordType::Txt),
            other => Err(Error::invalid_record_type(format!(
                "'{}' is not one of A, AAAA, CNAME, MX, TXT",
                other
            ))),
        }
    }
}

/// A single host record as returned by the provider.
///
/// Equality is structural over all three fields.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Record {
    /// Host label within the zone (e.g. `www`, `_acme-challenge`)
    pub name: String,
    /// Record value: an address, target name, or TXT payload
    pub value: String,
    /// Record type
    #[serde(rename = "type")]
    pub record_type: RecordType,
}

impl Record {
    /// Create a new record
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        record_type: RecordType,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            record_type,
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.name, self.record_type, self.value)
    }
}

/// An ordered snapshot of host records for one domain.
///
/// Serializes as `{"records": [...]}`, which is also the cache wire format.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    records: Vec<Record>,
}

impl RecordSet {
    /// Create an empty record set
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records in the set
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the set holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a record, keeping document order
    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Iterate over records in document order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// The records in document order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Structural set comparison, ignoring document order.
    ///
    /// This is the comparison the snapshot store uses to decide whether a
    /// freshly fetched set is already cached.
    pub fn matches(&self, other: &RecordSet) -> bool {
        if self.records.len() != other.records.len() {
            return false;
        }
        let mut mine: Vec<&Record> = self.records.iter().collect();
        let mut theirs: Vec<&Record> = other.records.iter().collect();
        mine.sort();
        theirs.sort();
        mine == theirs
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self { records }
    }
}

impl FromIterator<Record> for RecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_type_round_trips_from_str() {
        for rt in RecordType::ALL {
            assert_eq!(rt.as_str().parse::<RecordType>().unwrap(), rt);
        }
    }

    #[test]
    fn unknown_record_type_is_rejected() {
        let err = "SRV".parse::<RecordType>().unwrap_err();
        assert!(matches!(err, Error::InvalidRecordType(_)));
        assert!(err.to_string().contains("SRV"));
    }

    #[test]
    fn record_type_is_case_sensitive() {
        assert!("txt".parse::<RecordType>().is_err());
    }

    #[test]
    fn record_set_serializes_flat() {
        let set: RecordSet = vec![
            Record::new("_acme-challenge", "abc123", RecordType::Txt),
            Record::new("www", "1.2.3.4", RecordType::A),
        ]
        .into();

        let value = serde_json::to_value(&set).unwrap();
        assert_eq!(
            value,
            json!({
                "records": [
                    {"name": "_acme-challenge", "value": "abc123", "type": "TXT"},
                    {"name": "www", "value": "1.2.3.4", "type": "A"},
                ]
            })
        );
    }

    #[test]
    fn record_set_deserializes_from_cache_format() {
        let set: RecordSet = serde_json::from_str(
            r#"{"records": [{"name": "www", "value": "1.2.3.4", "type": "A"}]}"#,
        )
        .unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.records()[0], Record::new("www", "1.2.3.4", RecordType::A));
    }

    #[test]
    fn matches_ignores_order() {
        let a = Record::new("www", "1.2.3.4", RecordType::A);
        let b = Record::new("mail", "5.6.7.8", RecordType::A);

        let forward: RecordSet = vec![a.clone(), b.clone()].into();
        let backward: RecordSet = vec![b, a].into();

        assert!(forward.matches(&backward));
        assert_ne!(forward, backward);
    }

    #[test]
    fn matches_detects_value_changes() {
        let old: RecordSet = vec![Record::new("_acme-challenge", "abc", RecordType::Txt)].into();
        let new: RecordSet = vec![Record::new("_acme-challenge", "def", RecordType::Txt)].into();

        assert!(!old.matches(&new));
        assert!(!old.matches(&RecordSet::new()));
    }

    #[test]
    fn matches_counts_duplicates() {
        let rec = Record::new("www", "1.2.3.4", RecordType::A);
        let once: RecordSet = vec![rec.clone()].into();
        let twice: RecordSet = vec![rec.clone(), rec].into();

        assert!(!once.matches(&twice));
    }
}
