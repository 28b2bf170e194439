use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use url::Url;

/// One HTTP cookie, serialized opaquely as part of the session blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CookieRecord {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    pub secure: bool,
    pub http_only: bool,
    pub expires: Option<OffsetDateTime>,
}

impl CookieRecord {
    /// Parses a `Set-Cookie` header value in the context of the request
    /// URL. Returns None for values without a name=value pair.
    pub fn parse(header: &str, request_url: &Url) -> Option<Self> {
        let mut parts = header.split(';').map(str::trim);
        let (name, value) = parts.next()?.split_once('=')?;
        if name.is_empty() {
            return None;
        }

        let mut record = Self {
            name: name.trim().to_string(),
            value: value.trim().to_string(),
            domain: request_url.host_str().unwrap_or_default().to_string(),
            path: "/".to_string(),
            secure: false,
            http_only: false,
            expires: None,
        };

        for attribute in parts {
            match attribute.split_once('=') {
                Some((key, val)) if key.eq_ignore_ascii_case("domain") => {
                    record.domain = val.trim_start_matches('.').to_string();
                }
                Some((key, val)) if key.eq_ignore_ascii_case("path") => {
                    record.path = val.to_string();
                }
                Some((key, val)) if key.eq_ignore_ascii_case("max-age") => {
                    if let Ok(secs) = val.trim().parse::<i64>() {
                        record.expires =
                            Some(OffsetDateTime::now_utc() + time::Duration::seconds(secs));
                    }
                }
                None if attribute.eq_ignore_ascii_case("secure") => record.secure = true,
                None if attribute.eq_ignore_ascii_case("httponly") => record.http_only = true,
                _ => {}
            }
        }
        Some(record)
    }

    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        matches!(self.expires, Some(expires) if expires <= now)
    }

    fn matches(&self, url: &Url) -> bool {
        let host = url.host_str().unwrap_or_default();
        let domain_ok = host == self.domain || host.ends_with(&format!(".{}", self.domain));
        let path_ok = url.path().starts_with(&self.path);
        let scheme_ok = !self.secure || url.scheme() == "https";
        domain_ok && path_ok && scheme_ok
    }
}

/// In-memory cookie store for the embedded surface. One per process;
/// restored from the persisted snapshot before the first request and
/// snapshotted back on demand.
#[derive(Debug, Default)]
pub struct CookieJar {
    records: Vec<CookieRecord>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a prior snapshot into the active store.
    pub fn restore(records: Vec<CookieRecord>) -> Self {
        Self { records }
    }

    /// Inserts or replaces by (name, domain, path).
    pub fn set(&mut self, record: CookieRecord) {
        self.records.retain(|existing| {
            !(existing.name == record.name
                && existing.domain == record.domain
                && existing.path == record.path)
        });
        self.records.push(record);
    }

    /// Value for a `Cookie` request header, or None when nothing matches.
    pub fn header_for(&self, url: &Url) -> Option<String> {
        let now = OffsetDateTime::now_utc();
        let pairs: Vec<String> = self
            .records
            .iter()
            .filter(|record| !record.is_expired(now) && record.matches(url))
            .map(|record| format!("{}={}", record.name, record.value))
            .collect();
        if pairs.is_empty() {
            None
        } else {
            Some(pairs.join("; "))
        }
    }

    /// Current jar contents for persistence.
    pub fn snapshot(&self) -> Vec<CookieRecord> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Shared handle to the process-wide jar. The mutex makes the
/// read/write pair around navigation start a critical section.
pub type SharedCookieJar = Arc<Mutex<CookieJar>>;

pub fn shared_jar(jar: CookieJar) -> SharedCookieJar {
    Arc::new(Mutex::new(jar))
}
