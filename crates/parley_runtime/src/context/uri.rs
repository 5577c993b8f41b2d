//! Image reference normalization.

use std::path::{Path, PathBuf};

use thiserror::Error;
use url::Url;

/// Where an image lives once its reference is normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRef {
    /// Local file decoded from a `file:` URI or given as an absolute path.
    File(PathBuf),
    /// Anything else: remote URLs, `data:` URIs, platform file names.
    /// Passed through untouched.
    Uri(String),
}

impl ImageRef {
    /// The string handed to captioners and the model invoker.
    pub fn to_reference(&self) -> String {
        match self {
            ImageRef::File(path) => path.to_string_lossy().into_owned(),
            ImageRef::Uri(uri) => uri.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ImageRefError {
    #[error("malformed file URI '{uri}': {source}")]
    Malformed {
        uri: String,
        #[source]
        source: url::ParseError,
    },

    #[error("file URI '{0}' is not valid UTF-8 once decoded")]
    Encoding(String),

    #[error("file URI '{0}' has an empty path")]
    Empty(String),
}

/// Resolve a raw image reference.
///
/// `file:` URIs are percent-decoded into a local path and absolute paths are
/// taken as local. Every other reference is opaque and stays as given.
pub fn resolve_image_reference(raw: &str) -> Result<ImageRef, ImageRefError> {
    let trimmed = raw.trim();

    if has_scheme(trimmed, "file") {
        return resolve_file_uri(trimmed, cfg!(windows)).map(ImageRef::File);
    }

    if Path::new(trimmed).is_absolute() {
        return Ok(ImageRef::File(PathBuf::from(trimmed)));
    }

    Ok(ImageRef::Uri(trimmed.to_string()))
}

fn has_scheme(raw: &str, scheme: &str) -> bool {
    raw.len() > scheme.len()
        && raw.as_bytes()[scheme.len()] == b':'
        && raw[..scheme.len()].eq_ignore_ascii_case(scheme)
}

fn resolve_file_uri(raw: &str, windows: bool) -> Result<PathBuf, ImageRefError> {
    let url = Url::parse(raw).map_err(|source| ImageRefError::Malformed {
        uri: raw.to_string(),
        source,
    })?;

    let decoded = urlencoding::decode(url.path())
        .map_err(|_| ImageRefError::Encoding(raw.to_string()))?
        .into_owned();

    let path = if windows {
        strip_drive_prefix(&decoded).to_string()
    } else {
        decoded
    };

    if path.is_empty() {
        return Err(ImageRefError::Empty(raw.to_string()));
    }

    Ok(PathBuf::from(path))
}

/// `/C:/x.png` → `C:/x.png`.
fn strip_drive_prefix(path: &str) -> &str {
    let bytes = path.as_bytes();
    if bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':' {
        &path[1..]
    } else {
        path
    }
}
