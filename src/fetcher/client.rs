use crate::fetcher::{errors::FetchError, types::FetchedPage};
use chrono::Utc;
use encoding_rs::Encoding;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::instrument;

// Listing pages are a few hundred KB; anything past this is not a listing.
const MAX_BODY_SIZE: u64 = 3 * 1024 * 1024;
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    ClientBuilder::new()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .redirect(reqwest::redirect::Policy::limited(10))
        .default_headers({
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                    .parse()
                    .unwrap(),
            );
            headers.insert(
                reqwest::header::ACCEPT_LANGUAGE,
                "es-AR,es;q=0.9,en;q=0.5".parse().unwrap(),
            );
            headers
        })
        .build()
        .expect("Failed to build HTTP client")
});

/// Fetch a page and decode its body to UTF-8, with an overall deadline.
///
/// The per-call `timeout` comes from the pipeline's page-load budget and is
/// layered on top of the client-level connect/request timeouts.
#[instrument(skip_all, fields(url = %url))]
pub async fn fetch_page(url: &str, timeout: Duration) -> Result<FetchedPage, FetchError> {
    let parsed_url = url::Url::parse(url)?;

    let response = HTTP_CLIENT
        .get(parsed_url)
        .timeout(timeout)
        .send()
        .await
        .map_err(FetchError::from_reqwest_error)?;

    if let Some(content_length) = response.content_length()
        && content_length > MAX_BODY_SIZE
    {
        return Err(FetchError::BodyTooLarge(content_length));
    }

    let final_url = response.url().clone();
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Http {
            status,
            retriable: status.is_server_error(),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .unwrap_or("text/html")
        .to_string();

    if !content_type.contains("text/html") && !content_type.contains("application/xhtml") {
        return Err(FetchError::UnsupportedContentType(content_type));
    }

    let body_bytes = response
        .bytes()
        .await
        .map_err(|e| FetchError::Io(e.to_string()))?;

    // Content-Length may have been missing; re-check after download.
    if body_bytes.len() as u64 > MAX_BODY_SIZE {
        return Err(FetchError::BodyTooLarge(body_bytes.len() as u64));
    }

    let body = decode_body(&body_bytes, &content_type)?;

    Ok(FetchedPage {
        url_final: final_url,
        status,
        body,
        fetched_at: Utc::now(),
    })
}

static CHARSET_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)charset\s*=\s*["']?([^"'\s;/>]+)"#).unwrap());

/// Decode page bytes to UTF-8. Argenprop serves UTF-8 today, but older
/// listing pages and mirrors still show up as Windows-1252, so the charset
/// is resolved from the Content-Type header, then a `<meta>` scan of the
/// head, then byte-level detection.
fn decode_body(body_bytes: &[u8], content_type: &str) -> Result<String, FetchError> {
    let head = &body_bytes[..body_bytes.len().min(4096)];
    let head_str = String::from_utf8_lossy(head);

    let labeled = CHARSET_REGEX
        .captures(content_type)
        .or_else(|| CHARSET_REGEX.captures(&head_str))
        .and_then(|caps| Encoding::for_label(caps[1].to_lowercase().as_bytes()));

    let encoding = labeled.unwrap_or_else(|| {
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(head, false);
        detector.guess(None, true)
    });

    let (decoded, _used, had_errors) = encoding.decode(body_bytes);
    if had_errors {
        return Err(FetchError::Charset(format!(
            "failed to decode body as {}",
            encoding.name()
        )));
    }
    Ok(decoded.into_owned())
}
