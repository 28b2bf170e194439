use anyhow::{Context, Result};
use reqwest::header::SET_COOKIE;
use tracing::debug;
use url::Url;

use crate::bootstrap::EntryRequest;
use crate::cookies::{CookieRecord, SharedCookieJar};

/// Headless render surface backed by a plain HTTP client.
///
/// Unlike the probe transport, the surface follows redirects: it stands
/// in for a rendering engine fetching real remote content. Cookies from
/// responses land in the shared jar.
#[derive(Debug)]
pub struct HttpSurface {
    client: reqwest::Client,
    jar: SharedCookieJar,
}

impl HttpSurface {
    pub fn new(user_agent: &str, jar: SharedCookieJar) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .context("build surface HTTP client")?;
        Ok(Self { client, jar })
    }

    /// Performs one navigation and returns the URL actually reached
    /// after any redirects.
    pub async fn navigate(&self, request: &EntryRequest) -> Result<Url> {
        let mut builder = self
            .client
            .request(request.method.clone(), request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(*name, value);
        }

        let response = builder.send().await.context("surface navigation")?;
        let final_url = response.url().clone();
        debug!(url = %final_url, status = response.status().as_u16(), "surface navigation completed");

        let mut jar = self.jar.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        for value in response.headers().get_all(SET_COOKIE) {
            if let Ok(text) = value.to_str() {
                if let Some(record) = CookieRecord::parse(text, &final_url) {
                    jar.set(record);
                }
            }
        }
        Ok(final_url)
    }
}
