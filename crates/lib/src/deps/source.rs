//! Dependency source URL parsing.
//!
//! Dependencies are declared as prefixed URL strings:
//!
//! - `path:../shared` - a local directory, resolved against the project root
//! - `git:https://example.com/repo.git#v1.0.0` - a fetchable git repository,
//!   optionally pinned to a revision after `#`

use std::path::PathBuf;

use thiserror::Error;

/// A parsed dependency source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepSource {
  /// Local directory; never fetched.
  Path { path: PathBuf },
  /// Remote git repository; fetched and locked elsewhere.
  Git { url: String, rev: Option<String> },
}

impl DepSource {
  /// Short type tag: `"path"` or `"git"`.
  pub fn kind(&self) -> &'static str {
    match self {
      DepSource::Path { .. } => "path",
      DepSource::Git { .. } => "git",
    }
  }

  pub fn is_fetchable(&self) -> bool {
    matches!(self, DepSource::Git { .. })
  }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SourceError {
  #[error("empty dependency URL")]
  Empty,

  #[error("unsupported dependency URL '{0}': expected 'path:' or 'git:' prefix")]
  UnknownScheme(String),

  #[error("dependency URL '{0}' has an empty location")]
  MissingLocation(String),
}

/// Parse a dependency URL string.
pub fn parse(url: &str) -> Result<DepSource, SourceError> {
  let url = url.trim();
  if url.is_empty() {
    return Err(SourceError::Empty);
  }

  if let Some(rest) = url.strip_prefix("path:") {
    if rest.is_empty() {
      return Err(SourceError::MissingLocation(url.to_string()));
    }
    return Ok(DepSource::Path {
      path: PathBuf::from(rest),
    });
  }

  if let Some(rest) = url.strip_prefix("git:") {
    let (location, rev) = match rest.split_once('#') {
      Some((location, rev)) if !rev.is_empty() => (location, Some(rev.to_string())),
      Some((location, _)) => (location, None),
      None => (rest, None),
    };
    if location.is_empty() {
      return Err(SourceError::MissingLocation(url.to_string()));
    }
    return Ok(DepSource::Git {
      url: location.to_string(),
      rev,
    });
  }

  Err(SourceError::UnknownScheme(url.to_string()))
}
