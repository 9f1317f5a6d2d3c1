//! Static request headers sent with every roster API call.
//!
//! The upstream site only accepts requests that look like they come from its
//! own web front-end, so the session carries the header set of a desktop
//! Chrome XHR. Values are reproduced verbatim.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, ORIGIN, REFERER};

const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("accept", "application/json, text/javascript, */*; q=0.01"),
    ("accept-encoding", "gzip, deflate, br, zstd"),
    ("accept-language", "en-AU,en-GB;q=0.9,en-US;q=0.8,en=q=0.7"),
    ("cache-control", "no-cache"),
    (
        "content-type",
        "application/x-www-form-urlencoded; charset=UTF-8",
    ),
    ("pragma", "no-cache"),
    (
        "sec-ch-ua",
        r#""Not/A)Brand";v="8", "Chromium";v="126", "Google Chrome";v="126""#,
    ),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", r#""macOS""#),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "same-origin"),
    (
        "user-agent",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36",
    ),
    ("x-requested-with", "XMLHttpRequest"),
];

/// Builds the default header set for a site at `origin` (no trailing slash).
///
/// `Origin` is the site itself and `Referer` is its login page redirecting
/// back to the site root.
pub fn browser_headers(origin: &str) -> Result<HeaderMap, InvalidHeaderValue> {
    let mut headers = HeaderMap::with_capacity(BROWSER_HEADERS.len() + 2);

    for &(name, value) in BROWSER_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }

    headers.insert(ORIGIN, HeaderValue::from_str(origin)?);
    headers.insert(
        REFERER,
        HeaderValue::from_str(&format!("{origin}/user/login?redirect={origin}/"))?,
    );

    Ok(headers)
}
