use std::sync::Arc;

use anyhow::Result;

use ventureflow_core::store::{keys, KvStore};

use crate::cookies::CookieRecord;

/// Sentinel last-URL value meaning "use the original target".
pub const BLANK_SENTINEL: &str = "about:blank";

/// Durable browser session state: the last URL the surface actually
/// reached plus the serialized cookie jar. Read once at bootstrap,
/// written per navigation completion / snapshot request.
#[derive(Debug, Clone)]
pub struct SessionState {
    store: Arc<KvStore>,
}

impl SessionState {
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    /// The persisted last-navigated URL, with the empty and
    /// `about:blank` sentinels normalized to None.
    pub fn last_navigated_url(&self) -> Option<String> {
        let value: String = self.store.get(keys::LAST_NAVIGATED_URL)?;
        if value.is_empty() || value == BLANK_SENTINEL {
            None
        } else {
            Some(value)
        }
    }

    pub fn save_last_navigated_url(&self, url: &str) -> Result<()> {
        self.store.set(keys::LAST_NAVIGATED_URL, &url)
    }

    pub fn cookie_snapshot(&self) -> Vec<CookieRecord> {
        self.store.get_vec(keys::COOKIE_JAR)
    }

    pub fn save_cookie_snapshot(&self, records: &[CookieRecord]) -> Result<()> {
        self.store.set(keys::COOKIE_JAR, &records)
    }
}
