//! Vector source references and loading
//!
//! A source is anything that can produce SVG bytes: an in-memory buffer, a
//! file path, a `data:` URL, or (with the `remote` feature) an `http(s)` URL.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use base64::Engine as Base64Engine;
use log::debug;

use crate::{Error, Result};

/// The one content type accepted as vector input.
pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";

/// Checks a declared content type against `image/svg+xml`.
///
/// Matching is case-insensitive and ignores parameters such as `charset`.
///
/// # Examples
/// ```
/// use pwaicons::source::check_content_type;
/// assert!(check_content_type("image/svg+xml").is_ok());
/// assert!(check_content_type("Image/SVG+XML; charset=utf-8").is_ok());
/// assert!(check_content_type("image/png").is_err());
/// ```
pub fn check_content_type(content_type: &str) -> Result<()> {
    let essence = content_type.split(';').next().unwrap_or("").trim();
    if essence.eq_ignore_ascii_case(SVG_CONTENT_TYPE) {
        Ok(())
    } else {
        Err(Error::UnsupportedContentType(format!(
            "{} (expected {})",
            content_type, SVG_CONTENT_TYPE
        )))
    }
}

/// A loadable reference to SVG data.
#[derive(Debug, Clone)]
pub enum VectorSource {
    /// SVG bytes already in memory
    Bytes(Arc<[u8]>),
    /// SVG file on disk
    Path(PathBuf),
    /// RFC 2397 `data:` URL
    DataUrl(String),
    /// Remote `http` or `https` URL
    #[cfg(feature = "remote")]
    Url(String),
}

impl VectorSource {
    /// Wraps in-memory SVG bytes.
    pub fn from_bytes(bytes: impl Into<Arc<[u8]>>) -> Self {
        VectorSource::Bytes(bytes.into())
    }

    /// References an SVG file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        VectorSource::Path(path.as_ref().to_path_buf())
    }

    /// Classifies a textual reference: `data:` URLs, `http(s)` URLs, or a
    /// filesystem path for anything else.
    pub fn parse(reference: &str) -> Result<Self> {
        let lower = reference.to_ascii_lowercase();
        if lower.starts_with("data:") {
            return Ok(VectorSource::DataUrl(reference.to_string()));
        }
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return Self::remote(reference);
        }
        Ok(VectorSource::Path(PathBuf::from(reference)))
    }

    #[cfg(feature = "remote")]
    fn remote(reference: &str) -> Result<Self> {
        Ok(VectorSource::Url(reference.to_string()))
    }

    #[cfg(not(feature = "remote"))]
    fn remote(reference: &str) -> Result<Self> {
        Err(Error::LoadError(format!(
            "Remote sources require the `remote` feature: {}",
            reference
        )))
    }

    /// The content type the reference declares, if it declares one.
    ///
    /// Paths declare by extension, data URLs by their media type. Raw bytes
    /// and remote URLs declare nothing before they are loaded.
    pub fn declared_content_type(&self) -> Option<String> {
        match self {
            VectorSource::Bytes(_) => None,
            VectorSource::Path(path) => {
                let ext = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase());
                match ext.as_deref() {
                    Some("svg") | Some("svgz") => Some(SVG_CONTENT_TYPE.to_string()),
                    _ => Some("application/octet-stream".to_string()),
                }
            }
            VectorSource::DataUrl(url) => split_data_url(url).ok().map(|(media, _, _)| media),
            #[cfg(feature = "remote")]
            VectorSource::Url(_) => None,
        }
    }

    /// Rejects sources whose declared content type is not SVG. Sources that
    /// declare nothing pass.
    pub fn check_declared_type(&self) -> Result<()> {
        match self.declared_content_type() {
            Some(content_type) => check_content_type(&content_type),
            None => Ok(()),
        }
    }

    /// Directory used to resolve relative `href`s inside the SVG.
    pub fn resources_dir(&self) -> Option<PathBuf> {
        match self {
            VectorSource::Path(path) => std::fs::canonicalize(path)
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf())),
            _ => None,
        }
    }

    /// Reads the SVG bytes. `timeout` bounds remote fetches, and a remote
    /// response must declare `image/svg+xml` when it declares a type at all.
    pub fn load(&self, timeout: Duration) -> Result<Vec<u8>> {
        self.load_with(timeout, true)
    }

    /// Like [`load`](Self::load); `check_type = false` accepts remote
    /// responses whatever `Content-Type` they carry.
    #[cfg_attr(not(feature = "remote"), allow(unused_variables))]
    pub fn load_with(&self, timeout: Duration, check_type: bool) -> Result<Vec<u8>> {
        let bytes = match self {
            VectorSource::Bytes(bytes) => bytes.to_vec(),
            VectorSource::Path(path) => std::fs::read(path).map_err(|e| {
                Error::LoadError(format!("Failed to read {}: {}", path.display(), e))
            })?,
            VectorSource::DataUrl(url) => decode_data_url(url)?,
            #[cfg(feature = "remote")]
            VectorSource::Url(url) => fetch(url, timeout, check_type)?,
        };
        debug!("loaded vector source: {} bytes", bytes.len());
        Ok(bytes)
    }
}

impl From<&Path> for VectorSource {
    fn from(path: &Path) -> Self {
        VectorSource::from_path(path)
    }
}

impl From<Vec<u8>> for VectorSource {
    fn from(bytes: Vec<u8>) -> Self {
        VectorSource::from_bytes(bytes)
    }
}

/// Splits a data URL into (media type, is_base64, payload).
fn split_data_url(url: &str) -> Result<(String, bool, &str)> {
    let rest = url
        .get(..5)
        .filter(|scheme| scheme.eq_ignore_ascii_case("data:"))
        .map(|_| &url[5..])
        .ok_or_else(|| Error::LoadError("Not a data URL".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::LoadError("Malformed data URL: missing ','".into()))?;

    let mut params = meta.split(';');
    let media = params.next().unwrap_or("").trim();
    let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));
    let media = if media.is_empty() { "text/plain" } else { media };
    Ok((media.to_string(), is_base64, payload))
}

fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let (_, is_base64, payload) = split_data_url(url)?;
    if is_base64 {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::LoadError(format!("Invalid base64 in data URL: {}", e)))
    } else {
        percent_decode(payload)
    }
}

/// Decodes `%XX` escapes. A `%` not followed by two hex digits is an error.
fn percent_decode(input: &str) -> Result<Vec<u8>> {
    let bytes = input.as_bytes();
    let malformed = bytes.iter().enumerate().any(|(i, &b)| {
        b == b'%'
            && !bytes
                .get(i + 1..i + 3)
                .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit))
    });
    if malformed {
        return Err(Error::LoadError("Invalid percent-escape in data URL".into()));
    }
    Ok(percent_encoding::percent_decode_str(input).collect())
}

#[cfg(feature = "remote")]
fn fetch(url: &str, timeout: Duration, check_type: bool) -> Result<Vec<u8>> {
    let parsed = url::Url::parse(url)
        .map_err(|e| Error::LoadError(format!("Invalid URL {}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::LoadError(format!(
            "Unsupported URL scheme: {}",
            parsed.scheme()
        )));
    }

    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| Error::LoadError(format!("Failed to build HTTP client: {}", e)))?;

    let resp = client
        .get(parsed)
        .header("User-Agent", concat!("pwaicons/", env!("CARGO_PKG_VERSION")))
        .send()
        .map_err(|e| Error::LoadError(format!("Failed to fetch {}: {}", url, e)))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(Error::LoadError(format!("Failed to fetch {}: HTTP {}", url, status)));
    }

    if check_type {
        if let Some(content_type) = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            check_content_type(content_type)?;
        }
    }

    let body = resp
        .bytes()
        .map_err(|e| Error::LoadError(format!("Failed to read response body: {}", e)))?;
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn parse_classifies_references() {
        assert!(matches!(
            VectorSource::parse("data:image/svg+xml,<svg/>").unwrap(),
            VectorSource::DataUrl(_)
        ));
        assert!(matches!(
            VectorSource::parse("assets/logo.svg").unwrap(),
            VectorSource::Path(_)
        ));
        #[cfg(feature = "remote")]
        assert!(matches!(
            VectorSource::parse("https://example.com/logo.svg").unwrap(),
            VectorSource::Url(_)
        ));
    }

    #[test]
    fn base64_data_url_decodes() {
        let svg = b"<svg xmlns=\"http://www.w3.org/2000/svg\"/>";
        let encoded = base64::engine::general_purpose::STANDARD.encode(svg);
        let src = VectorSource::DataUrl(format!("data:image/svg+xml;base64,{}", encoded));
        assert_eq!(src.load(TIMEOUT).unwrap(), svg.to_vec());
        assert_eq!(src.declared_content_type().as_deref(), Some(SVG_CONTENT_TYPE));
    }

    #[test]
    fn percent_encoded_data_url_decodes() {
        let src = VectorSource::DataUrl("data:image/svg+xml,%3Csvg%2F%3E".into());
        assert_eq!(src.load(TIMEOUT).unwrap(), b"<svg/>".to_vec());
    }

    #[test]
    fn malformed_data_url_is_load_error() {
        let src = VectorSource::DataUrl("data:image/svg+xml;base64".into());
        assert!(src.load(TIMEOUT).unwrap_err().is_load_error());

        let src = VectorSource::DataUrl("data:image/svg+xml;base64,@@@".into());
        assert!(src.load(TIMEOUT).unwrap_err().is_load_error());

        let src = VectorSource::DataUrl("data:,%zz".into());
        assert!(src.load(TIMEOUT).unwrap_err().is_load_error());
    }

    #[test]
    fn signed_or_truncated_escapes_are_load_errors() {
        for payload in ["%+1", "%-1", "%4", "abc%", "%%41"] {
            let src = VectorSource::DataUrl(format!("data:image/svg+xml,{}", payload));
            let err = src.load(TIMEOUT).unwrap_err();
            assert!(err.is_load_error(), "{} gave {}", payload, err);
        }
    }

    #[test]
    fn escapes_decode_to_raw_bytes() {
        let src = VectorSource::DataUrl("data:image/svg+xml,a%20b%c3%A9%25".into());
        assert_eq!(src.load(TIMEOUT).unwrap(), b"a b\xc3\xa9%".to_vec());
    }

    #[test]
    fn missing_file_is_load_error() {
        let src = VectorSource::from_path("/definitely/not/here/logo.svg");
        let err = src.load(TIMEOUT).unwrap_err();
        assert!(err.is_load_error(), "unexpected error: {}", err);
    }

    #[test]
    fn declared_type_follows_extension() {
        assert!(VectorSource::from_path("logo.SVG").check_declared_type().is_ok());
        let err = VectorSource::from_path("logo.png").check_declared_type().unwrap_err();
        assert!(matches!(err, Error::UnsupportedContentType(_)));
        assert!(VectorSource::from_bytes(vec![1u8, 2, 3]).check_declared_type().is_ok());
    }

    #[test]
    fn data_url_without_media_type_defaults_to_text() {
        let src = VectorSource::DataUrl("data:,hello".into());
        assert_eq!(src.declared_content_type().as_deref(), Some("text/plain"));
        assert!(src.check_declared_type().is_err());
    }
}
