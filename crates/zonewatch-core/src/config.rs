//! Configuration types for the zonewatch system
//!
//! All configuration is constructor-injected: components receive these
//! values at build time and never read ambient process state. The `from_env`
//! constructors take a lookup closure so that tests can feed fabricated
//! environments without touching `std::env`.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::Error;

/// Default key-value store host
pub const DEFAULT_STORE_HOST: &str = "127.0.0.1";

/// Default key-value store port
pub const DEFAULT_STORE_PORT: u16 = 6379;

/// Default polling interval for the watch loop, in seconds
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 300;

/// Provider API credentials, loaded from the environment at startup.
///
/// The provider requires the caller's IP to be allow-listed, which is why
/// `client_ip` travels alongside the key.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// API user identifier (`API_USER`)
    pub api_user: String,
    /// API key/secret (`API_KEY`)
    pub api_key: String,
    /// Allow-listed caller IP (`CLIENT_IP`)
    pub client_ip: String,
}

// The API key never appears in Debug output.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_user", &self.api_user)
            .field("api_key", &"<REDACTED>")
            .field("client_ip", &self.client_ip)
            .finish()
    }
}

impl Credentials {
    /// Load credentials from the process environment.
    ///
    /// Missing variables are all named in a single error so the operator
    /// can fix the environment in one pass.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load credentials through an injected lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_user = lookup("API_USER");
        let api_key = lookup("API_KEY");
        let client_ip = lookup("CLIENT_IP");

        let missing: Vec<&str> = [
            ("API_USER", &api_user),
            ("API_KEY", &api_key),
            ("CLIENT_IP", &client_ip),
        ]
        .iter()
        .filter(|(_, value)| value.is_none())
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(Error::config(format!(
                "missing required environment variables: {}. Confirm the environment has been populated.",
                missing.join(", ")
            )));
        }

        Ok(Self {
            api_user: api_user.unwrap(),
            api_key: api_key.unwrap(),
            client_ip: client_ip.unwrap(),
        })
    }
}

/// Key-value store connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Store host (`REDIS_HOST`, default `127.0.0.1`)
    pub host: String,
    /// Store port (`REDIS_PORT`, default `6379`)
    pub port: u16,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_STORE_HOST.to_string(),
            port: DEFAULT_STORE_PORT,
        }
    }
}

impl StoreConfig {
    /// Load store settings from the process environment, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load store settings through an injected lookup function.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("REDIS_HOST").unwrap_or_else(|| DEFAULT_STORE_HOST.to_string());
        let port = match lookup("REDIS_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                Error::config(format!("REDIS_PORT must be a port number, got '{}'", raw))
            })?,
            None => DEFAULT_STORE_PORT,
        };

        Ok(Self { host, port })
    }
}

/// A domain split into the labels the provider API wants.
///
/// The split happens on the first dot: `example.com` becomes SLD `example`
/// and TLD `com`, and `example.co.uk` becomes SLD `example` and TLD
/// `co.uk`. The provider accepts multi-label TLD values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    sld: String,
    tld: String,
}

impl Domain {
    /// Second-level domain label
    pub fn sld(&self) -> &str {
        &self.sld
    }

    /// Top-level domain label(s)
    pub fn tld(&self) -> &str {
        &self.tld
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (sld, tld) = s.split_once('.').ok_or_else(|| {
            Error::config(format!("domain '{}' must be of the form SLD.TLD", s))
        })?;

        if sld.is_empty() || tld.is_empty() {
            return Err(Error::config(format!(
                "domain '{}' must be of the form SLD.TLD",
                s
            )));
        }

        Ok(Self {
            sld: sld.to_string(),
            tld: tld.to_string(),
        })
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.sld, self.tld)
    }
}

/// Settings for the watch engine.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Domain whose records are watched
    pub domain: Domain,
    /// Seconds between polling cycles
    pub poll_interval_secs: u64,
    /// Capacity of the engine's observer event channel
    pub event_channel_capacity: usize,
}

impl WatchConfig {
    /// Create a watch configuration with default interval and capacity.
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }

    /// Override the polling interval.
    pub fn with_poll_interval(mut self, secs: u64) -> Self {
        self.poll_interval_secs = secs;
        self
    }

    /// The polling interval as a [`Duration`].
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), Error> {
        if self.poll_interval_secs == 0 {
            return Err(Error::config("poll interval must be greater than zero"));
        }
        if self.event_channel_capacity == 0 {
            return Err(Error::config("event channel capacity must be greater than zero"));
        }
        Ok(())
    }
}

fn default_event_channel_capacity() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn credentials_load_when_all_present() {
        let env = env_of(&[
            ("API_USER", "ncuser"),
            ("API_KEY", "secret"),
            ("CLIENT_IP", "203.0.113.7"),
        ]);
        let creds = Credentials::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(creds.api_user, "ncuser");
        assert_eq!(creds.client_ip, "203.0.113.7");
    }

    #[test]
    fn missing_credentials_are_all_named() {
        let env = env_of(&[("API_USER", "ncuser")]);
        let err = Credentials::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("API_KEY"));
        assert!(msg.contains("CLIENT_IP"));
        assert!(!msg.contains("API_USER,"));
    }

    #[test]
    fn credentials_debug_redacts_key() {
        let creds = Credentials {
            api_user: "ncuser".into(),
            api_key: "hunter2".into(),
            client_ip: "203.0.113.7".into(),
        };
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("<REDACTED>"));
    }

    #[test]
    fn store_config_defaults_apply() {
        let cfg = StoreConfig::from_lookup(|_| None).unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 6379);
    }

    #[test]
    fn store_config_reads_overrides() {
        let env = env_of(&[("REDIS_HOST", "cache.internal"), ("REDIS_PORT", "6380")]);
        let cfg = StoreConfig::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(cfg.host, "cache.internal");
        assert_eq!(cfg.port, 6380);
    }

    #[test]
    fn store_config_rejects_bad_port() {
        let env = env_of(&[("REDIS_PORT", "not-a-port")]);
        let err = StoreConfig::from_lookup(|k| env.get(k).cloned()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn domain_splits_on_first_dot() {
        let domain: Domain = "example.com".parse().unwrap();
        assert_eq!(domain.sld(), "example");
        assert_eq!(domain.tld(), "com");

        let multi: Domain = "example.co.uk".parse().unwrap();
        assert_eq!(multi.sld(), "example");
        assert_eq!(multi.tld(), "co.uk");
    }

    #[test]
    fn bare_label_is_not_a_domain() {
        assert!("localhost".parse::<Domain>().is_err());
        assert!(".com".parse::<Domain>().is_err());
        assert!("example.".parse::<Domain>().is_err());
    }

    #[test]
    fn watch_config_rejects_zero_interval() {
        let domain: Domain = "example.com".parse().unwrap();
        let cfg = WatchConfig::new(domain).with_poll_interval(0);
        assert!(cfg.validate().is_err());
    }
}
