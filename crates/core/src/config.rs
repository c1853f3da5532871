use crate::error::BrowserError;
use crate::models::{SortDirection, SortKey, TimeRange};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scan: ScanPaths,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanPaths {
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub include_hidden: bool,
    #[serde(default)]
    pub follow_links: bool,
    /// Use modification time where the filesystem has no birth time.
    #[serde(default = "default_true")]
    pub fallback_to_modified: bool,
}

impl Default for ScanPaths {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: Vec::new(),
            include_hidden: false,
            follow_links: false,
            fallback_to_modified: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub time_range: TimeRange,
    #[serde(default)]
    pub sort_key: SortKey,
    #[serde(default)]
    pub sort_direction: SortDirection,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
        }
    }
}

fn default_include() -> Vec<String> {
    vec![".".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_debounce_ms() -> u64 {
    500
}

pub fn load(path: Option<&str>) -> Result<AppConfig, BrowserError> {
    let mut settings = config::Config::builder();
    if let Some(p) = path {
        settings = settings.add_source(config::File::with_name(p));
    } else {
        settings = settings.add_source(config::File::with_name("config/default").required(false));
    }
    let cfg = settings.build()?;
    Ok(cfg.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_default_file_gives_defaults() {
        let cfg = load(None).unwrap();
        assert_eq!(cfg.scan.include, vec!["."]);
        assert!(cfg.scan.fallback_to_modified);
        assert_eq!(cfg.view, ViewConfig::default());
        assert_eq!(cfg.watch.debounce_ms, 500);
    }

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.toml");
        fs::write(
            &path,
            r#"
            [scan]
            include = ["Assets"]
            exclude = ["**/*.meta"]

            [view]
            time_range = "since_last_week"
            sort_key = "name"
            sort_direction = "ascending"
            "#,
        )
        .unwrap();

        let cfg = load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(cfg.scan.include, vec!["Assets"]);
        assert_eq!(cfg.scan.exclude, vec!["**/*.meta"]);
        assert!(!cfg.scan.include_hidden);
        assert_eq!(cfg.view.time_range, TimeRange::SinceLastWeek);
        assert_eq!(cfg.view.sort_key, SortKey::Name);
        assert_eq!(cfg.view.sort_direction, SortDirection::Ascending);
        assert_eq!(cfg.watch.debounce_ms, 500);
    }

    #[test]
    fn rejects_unknown_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[view]\ntime_range = \"fortnight\"\n").unwrap();
        assert!(matches!(
            load(Some(path.to_str().unwrap())),
            Err(BrowserError::Config(_))
        ));
    }
}
