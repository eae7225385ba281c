// static_files.rs
//! Static file resolution
//!
//! Maps request paths onto files under a root directory. Anything that
//! would land outside the root, or is not a regular file, is `NotFound`.

use std::io;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::mime;

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("not found")]
    NotFound,

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A file read for a single response.
#[derive(Debug, Clone)]
pub struct StaticResource {
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub content_type: &'static str,
}

#[derive(Debug, Clone)]
pub struct StaticResolver {
    root: PathBuf,
    welcome: Option<PathBuf>,
}

impl StaticResolver {
    pub fn new(root: impl Into<PathBuf>, welcome: Option<PathBuf>) -> Self {
        Self {
            root: root.into(),
            welcome,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serve the welcome document. Without one, fall back to normal
    /// resolution of `request_path`.
    pub async fn welcome(&self, request_path: &str) -> Result<StaticResource, ResolveError> {
        let Some(path) = &self.welcome else {
            return self.resolve(request_path).await;
        };

        match fs::read(path).await {
            Ok(content) => Ok(StaticResource {
                path: path.clone(),
                content,
                content_type: mime::HTML,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("Welcome file missing: {}", path.display());
                Err(ResolveError::NotFound)
            }
            Err(source) => Err(ResolveError::Io {
                path: path.clone(),
                source,
            }),
        }
    }

    pub async fn resolve(&self, request_path: &str) -> Result<StaticResource, ResolveError> {
        let relative = normalize_request_path(request_path).ok_or(ResolveError::NotFound)?;

        // Missing root is a deployment problem, but callers still only see 404.
        let root = match fs::canonicalize(&self.root).await {
            Ok(root) => root,
            Err(e) => {
                warn!(
                    "Static root inaccessible '{}': {}",
                    self.root.display(),
                    e
                );
                return Err(ResolveError::NotFound);
            }
        };

        let Ok(candidate) = fs::canonicalize(root.join(&relative)).await else {
            return Err(ResolveError::NotFound);
        };
        if !candidate.starts_with(&root) {
            warn!(
                "Path traversal attempt blocked: {} -> {}",
                request_path,
                candidate.display()
            );
            return Err(ResolveError::NotFound);
        }

        match fs::metadata(&candidate).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(ResolveError::NotFound),
        }

        let content = fs::read(&candidate)
            .await
            .map_err(|source| ResolveError::Io {
                path: candidate.clone(),
                source,
            })?;
        let content_type =
            mime::content_type_for(candidate.extension().and_then(|e| e.to_str()));
        debug!("Serving {} ({} bytes)", candidate.display(), content.len());

        Ok(StaticResource {
            path: candidate,
            content,
            content_type,
        })
    }
}

/// Percent-decode and collapse `.`/`..` segments into a path relative to
/// the root. `..` never climbs above the root: unmatched ones are dropped.
/// Returns `None` for undecodable input or NUL bytes.
pub fn normalize_request_path(request_path: &str) -> Option<PathBuf> {
    let decoded = urlencoding::decode(request_path).ok()?;
    if decoded.contains('\0') {
        return None;
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in decoded.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let relative: PathBuf = segments.iter().collect();
    // A segment like `C:` would still make `join` replace the root on Windows.
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(relative)
}
