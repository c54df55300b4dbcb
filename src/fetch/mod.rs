// src/fetch/mod.rs

use anyhow::{Context, Result};
use flate2::read::MultiGzDecoder;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::io::{BufRead, BufReader, Read};
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

pub mod urls;

/// Sent on every request; the CDN answers 403 to clients without one.
pub static CLIENT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Read buffer for streamed bodies.
const STREAM_BUFFER_BYTES: usize = 1 << 20;

/// Build the blocking HTTP client shared by both loaders.
///
/// There is no overall request timeout: the trip files are streamed for as
/// long as the database keeps up.
pub fn client() -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

    Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(30))
        .timeout(None::<Duration>)
        .build()
        .context("building HTTP client")
}

/// Open `url` and return a buffered reader over its decoded body.
pub fn open_stream(client: &Client, url: &Url) -> Result<Box<dyn BufRead>> {
    info!(%url, "opening stream");
    let resp = client
        .get(url.clone())
        .send()
        .with_context(|| format!("GET {}", url))?
        .error_for_status()
        .with_context(|| format!("GET {}", url))?;
    debug!(status = %resp.status(), len = ?resp.content_length(), "response headers");

    Ok(decode_body(url, resp))
}

/// Read the whole body of `url` into memory. Only for small resources.
pub fn fetch_bytes(client: &Client, url: &Url) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    open_stream(client, url)?
        .read_to_end(&mut body)
        .with_context(|| format!("reading body from {}", url))?;
    debug!(%url, bytes = body.len(), "fetched");
    Ok(body)
}

/// Wrap a raw body in a buffered reader, gunzipping when the URL path
/// names a `.gz` file.
pub fn decode_body<R: Read + 'static>(url: &Url, body: R) -> Box<dyn BufRead> {
    if is_gzip(url) {
        Box::new(BufReader::with_capacity(
            STREAM_BUFFER_BYTES,
            MultiGzDecoder::new(body),
        ))
    } else {
        Box::new(BufReader::with_capacity(STREAM_BUFFER_BYTES, body))
    }
}

fn is_gzip(url: &Url) -> bool {
    url.path().to_ascii_lowercase().ends_with(".gz")
}
