//! Filesystem-backed [`MetadataProvider`]: walks the configured roots and
//! stats files on demand.

use crate::config::ScanPaths;
use crate::error::BrowserError;
use crate::metadata::MetadataProvider;
use chrono::{DateTime, Utc};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
struct ScanRoot {
    path: PathBuf,
    /// Leading segment for this root's paths; empty when scanning one root.
    prefix: String,
}

/// Enumerates files under one or more roots.
///
/// Paths are reported relative to their root with `/` separators. With more
/// than one root each path starts with the root directory's name, suffixed
/// `~2`, `~3`, ... when names repeat. Every call
/// to [`MetadataProvider::all_paths`] walks the disk again, and creation times
/// are read at lookup time, so a file removed in between simply has no time.
#[derive(Debug, Clone)]
pub struct FsMetadataProvider {
    roots: Vec<ScanRoot>,
    excludes: GlobSet,
    include_hidden: bool,
    follow_links: bool,
    fallback_to_modified: bool,
}

impl FsMetadataProvider {
    pub fn new(cfg: &ScanPaths) -> Result<Self, BrowserError> {
        let roots: Vec<PathBuf> = cfg.include.iter().map(PathBuf::from).collect();
        let roots = resolve_roots(&roots)?;
        Ok(Self {
            roots,
            excludes: build_globset(&cfg.exclude)?,
            include_hidden: cfg.include_hidden,
            follow_links: cfg.follow_links,
            fallback_to_modified: cfg.fallback_to_modified,
        })
    }

    /// Absolute location of an enumerated path.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut parts = path.split('/').filter(|p| !p.is_empty());
        let root = match self.roots.as_slice() {
            [root] => root,
            roots => {
                let head = parts.next()?;
                roots.iter().find(|r| r.prefix == head)?
            }
        };
        let mut location = root.path.clone();
        let mut any = false;
        for part in parts {
            location.push(part);
            any = true;
        }
        any.then_some(location)
    }

    pub fn root_paths(&self) -> impl Iterator<Item = &Path> {
        self.roots.iter().map(|r| r.path.as_path())
    }

    fn walk_root(&self, root: &ScanRoot, out: &mut Vec<String>) {
        let walker = WalkDir::new(&root.path)
            .follow_links(self.follow_links)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || should_descend(e.path(), &root.path, self.include_hidden, &self.excludes)
            });

        for entry in walker {
            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    warn!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(rel) = relative_key(entry.path(), &root.path) else {
                continue;
            };
            if root.prefix.is_empty() {
                out.push(rel);
            } else {
                out.push(format!("{}/{}", root.prefix, rel));
            }
        }
    }
}

impl MetadataProvider for FsMetadataProvider {
    fn all_paths(&self) -> Vec<String> {
        let mut out = Vec::new();
        for root in &self.roots {
            self.walk_root(root, &mut out);
        }
        debug!(count = out.len(), "enumerated files");
        out
    }

    fn creation_time(&self, path: &str) -> Option<DateTime<Utc>> {
        let location = self.resolve(path)?;
        let meta = fs::metadata(&location).ok()?;
        if !meta.is_file() {
            return None;
        }
        let created = match meta.created() {
            Ok(t) => Some(t),
            Err(_) if self.fallback_to_modified => meta.modified().ok(),
            Err(_) => None,
        };
        created.map(DateTime::<Utc>::from)
    }
}

fn resolve_roots(roots: &[PathBuf]) -> Result<Vec<ScanRoot>, BrowserError> {
    if roots.is_empty() {
        return Err(BrowserError::InvalidRoot("no scan roots configured".to_string()));
    }
    let mut resolved = Vec::with_capacity(roots.len());
    for root in roots {
        if !root.is_dir() {
            return Err(BrowserError::InvalidRoot(root.display().to_string()));
        }
        let path = fs::canonicalize(root)?;
        let prefix = if roots.len() == 1 {
            String::new()
        } else {
            let base = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "root".to_string());
            unique_prefix(&base, &resolved)
        };
        resolved.push(ScanRoot { path, prefix });
    }
    Ok(resolved)
}

/// `base`, or `base~2`, `base~3`, ... when an earlier root already took it.
fn unique_prefix(base: &str, taken: &[ScanRoot]) -> String {
    let mut candidate = base.to_string();
    let mut n = 1;
    while taken.iter().any(|r| r.prefix == candidate) {
        n += 1;
        candidate = format!("{}~{}", base, n);
    }
    candidate
}

/// `/`-joined components of `path` below `root`. Names are kept verbatim.
fn relative_key(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = rel
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, BrowserError> {
    let mut builder = GlobSetBuilder::new();
    for pat in patterns {
        let glob = Glob::new(pat)?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}

fn should_descend(path: &Path, root: &Path, include_hidden: bool, excludes: &GlobSet) -> bool {
    if is_excluded(path, root, excludes) {
        return false;
    }
    if !include_hidden && is_hidden(path) {
        return false;
    }
    true
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|s| s.starts_with('.'))
        .unwrap_or(false)
}

fn is_excluded(path: &Path, root: &Path, excludes: &GlobSet) -> bool {
    match relative_key(path, root) {
        Some(rel) => excludes.is_match(rel),
        None => excludes.is_match(path),
    }
}
