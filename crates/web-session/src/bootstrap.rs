use reqwest::Method;
use tracing::debug;
use url::Url;

use crate::cookies::CookieJar;

/// The fully prepared initial navigation of a web-surface launch.
#[derive(Debug, Clone)]
pub struct EntryRequest {
    pub method: Method,
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
}

/// Resolves the bootstrap target: the persisted last-navigated URL when
/// one exists and parses, otherwise the original configured target.
pub fn resolve_target(persisted: Option<&str>, original: &Url) -> Url {
    match persisted {
        Some(value) => match Url::parse(value) {
            Ok(url) => url,
            Err(err) => {
                debug!(error = %err, "persisted URL unusable, falling back to target");
                original.clone()
            }
        },
        None => original.clone(),
    }
}

/// Builds the entry request. The method is POST exactly when the
/// resolved target equals the original configured target; any other
/// URL, even one derived from it, goes out as GET. Both variants carry
/// the same fabricated browser headers.
pub fn build_entry_request(
    resolved: &Url,
    original: &Url,
    referer: Option<&Url>,
    accept_language: &str,
    jar: &CookieJar,
) -> EntryRequest {
    let is_entry_target = resolved.as_str() == original.as_str();
    let method = if is_entry_target { Method::POST } else { Method::GET };

    let mut headers: Vec<(&'static str, String)> = vec![
        (
            "Accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".to_string(),
        ),
        ("Accept-Language", accept_language.to_string()),
        ("Accept-Encoding", "gzip, deflate, br".to_string()),
        ("DNT", "1".to_string()),
        ("Connection", "keep-alive".to_string()),
        ("Sec-Fetch-Site", "same-origin".to_string()),
        ("Sec-Fetch-Mode", "navigate".to_string()),
        ("Sec-Fetch-Dest", "?1".to_string()),
        ("Upgrade-Insecure-Requests", "?1".to_string()),
    ];

    if let Some(referer) = referer {
        headers.push(("Referer", referer.as_str().to_string()));
    }
    if is_entry_target {
        headers.push(("Content-Type", "application/json; charset=utf-8".to_string()));
    }
    if let Some(cookie) = jar.header_for(resolved) {
        headers.push(("Cookie", cookie));
    }

    EntryRequest {
        method,
        url: resolved.clone(),
        headers,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cookies::CookieRecord;

    fn original() -> Url {
        Url::parse("https://landing.example/entry").unwrap()
    }

    fn header<'a>(request: &'a EntryRequest, name: &str) -> Option<&'a str> {
        request
            .headers
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    #[test]
    fn test_resolve_target_falls_back_to_original() {
        assert_eq!(resolve_target(None, &original()), original());
        assert_eq!(resolve_target(Some("not a url"), &original()), original());
    }

    #[test]
    fn test_resolve_target_prefers_persisted() {
        let resolved = resolve_target(Some("https://x/y"), &original());
        assert_eq!(resolved.as_str(), "https://x/y");
    }

    #[test]
    fn test_entry_target_uses_post_with_json_content_type() {
        let request =
            build_entry_request(&original(), &original(), None, "en-US,en;q=0.9", &CookieJar::new());

        assert_eq!(request.method, Method::POST);
        assert_eq!(
            header(&request, "Content-Type"),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(header(&request, "Sec-Fetch-Mode"), Some("navigate"));
        assert_eq!(header(&request, "Upgrade-Insecure-Requests"), Some("?1"));
        assert!(header(&request, "Referer").is_none());
    }

    #[test]
    fn test_diverging_target_uses_get() {
        // Second-launch scenario: a prior session reached the checkout page.
        let resolved = resolve_target(Some("https://landing.example/checkout"), &original());
        let request =
            build_entry_request(&resolved, &original(), None, "en-US,en;q=0.9", &CookieJar::new());

        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url.as_str(), "https://landing.example/checkout");
        assert!(header(&request, "Content-Type").is_none());
    }

    #[test]
    fn test_derived_url_still_uses_get() {
        // Even a URL derived from the target counts as divergent.
        let derived = Url::parse("https://landing.example/entry?step=2").unwrap();
        let request =
            build_entry_request(&derived, &original(), None, "en-US,en;q=0.9", &CookieJar::new());
        assert_eq!(request.method, Method::GET);
    }

    #[test]
    fn test_referer_and_cookies_attached_when_present() {
        let current = Url::parse("https://landing.example/previous").unwrap();
        let mut jar = CookieJar::new();
        jar.set(CookieRecord::parse("session=abc", &original()).unwrap());

        let request = build_entry_request(
            &original(),
            &original(),
            Some(&current),
            "en-US,en;q=0.9",
            &jar,
        );

        assert_eq!(header(&request, "Referer"), Some("https://landing.example/previous"));
        assert_eq!(header(&request, "Cookie"), Some("session=abc"));
    }
}
