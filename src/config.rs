//! Runtime configuration.
//!
//! Values come from a TOML file, then environment overrides. Every field has a
//! default, so an absent file is not an error. Result cap and scan limit live
//! here rather than in requests.

use crate::search::predicate::CaseMatching;
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "COURSE_SEARCH_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub store: StoreConfig,
    pub search: SearchConfig,
    pub routes: RouteConfig,
    pub logging: LoggingConfig,
}

/// Record store location and scan bound.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub table_name: String,
    pub region: String,
    /// JSON file of records served by the in-process store.
    pub records_path: Option<PathBuf>,
    /// Maximum raw items examined per scan.
    pub scan_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            table_name: "Class".to_string(),
            region: "us-west-2".to_string(),
            records_path: None,
            scan_limit: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    /// Maximum courses returned per search.
    pub result_cap: usize,
    pub case_matching: CaseMatching,
    /// Characters of description kept in the trimmed course view.
    pub description_budget: usize,
    pub include_traces: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            result_cap: 10,
            case_matching: CaseMatching::Folded,
            description_budget: 200,
            include_traces: true,
        }
    }
}

/// Names under which the search action is reachable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteConfig {
    pub function_name: String,
    pub api_path: String,
    pub http_method: String,
    /// Action group echoed when the event carries none.
    pub default_action_group: String,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            function_name: "search_classes".to_string(),
            api_path: "/search".to_string(),
            http_method: "POST".to_string(),
            default_action_group: "ClassSearchActions".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl Config {
    /// Parse TOML text. Missing sections and fields take their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Which file to load: `explicit`, else [`CONFIG_ENV`], else the user config
    /// directory if a file exists there. `None` means defaults.
    pub fn resolve_path(explicit: Option<&str>) -> Option<PathBuf> {
        let from_env = std::env::var(CONFIG_ENV).ok();
        match explicit.or(from_env.as_deref()) {
            Some(path) => Some(PathBuf::from(expand_tilde(path).as_ref())),
            None => default_config_path().filter(|path| path.is_file()),
        }
    }

    /// Load `path` (or defaults when `None`), then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        Self::from_toml(&text)
            .with_context(|| format!("Failed to load configuration {}", path.display()))
    }

    /// Apply `COURSE_SEARCH_*` overrides using `lookup` to read variables.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(table) = lookup("COURSE_SEARCH_TABLE") {
            self.store.table_name = table;
        }
        if let Some(region) = lookup("COURSE_SEARCH_REGION") {
            self.store.region = region;
        }
        if let Some(records) = lookup("COURSE_SEARCH_RECORDS") {
            self.store.records_path = Some(PathBuf::from(expand_tilde(&records).as_ref()));
        }
        if let Some(limit) = lookup("COURSE_SEARCH_SCAN_LIMIT") {
            self.store.scan_limit = limit
                .parse()
                .with_context(|| format!("COURSE_SEARCH_SCAN_LIMIT is not a number: {}", limit))?;
        }
        if let Some(cap) = lookup("COURSE_SEARCH_RESULT_CAP") {
            self.search.result_cap = cap
                .parse()
                .with_context(|| format!("COURSE_SEARCH_RESULT_CAP is not a number: {}", cap))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.search.result_cap == 0 {
            bail!("search.result_cap must be at least 1");
        }
        if self.store.scan_limit == 0 {
            bail!("store.scan_limit must be at least 1");
        }
        if self.search.description_budget == 0 {
            bail!("search.description_budget must be at least 1");
        }
        Ok(())
    }
}

/// `<config_dir>/course-search/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("course-search").join("config.toml"))
}

/// Expands tilde (`~`) in a path to the user's home directory.
///
/// - `~/foo` becomes `/home/user/foo`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &str) -> Cow<'_, str> {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return Cow::Owned(home.join(stripped).display().to_string());
        }
    } else if path == "~"
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.display().to_string());
    }
    Cow::Borrowed(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn empty_document_is_default() {
        check!(Config::from_toml("").unwrap() == Config::default());
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        check!(config.search.result_cap == 10);
        check!(config.store.scan_limit == 50);
        check!(config.search.case_matching == CaseMatching::Folded);
        check!(config.routes.function_name == "search_classes");
        check!(config.routes.default_action_group == "ClassSearchActions");
    }

    #[test]
    fn parses_sections() {
        let config = Config::from_toml(
            r#"
            [store]
            table_name = "Class-prod"
            region = "ap-northeast-2"
            scan_limit = 100

            [search]
            result_cap = 5
            case_matching = "variants"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        check!(config.store.table_name == "Class-prod");
        check!(config.store.region == "ap-northeast-2");
        check!(config.store.scan_limit == 100);
        check!(config.search.result_cap == 5);
        check!(config.search.case_matching == CaseMatching::Variants);
        check!(config.search.description_budget == 200);
        check!(config.logging.format == LogFormat::Json);
    }

    #[test]
    fn rejects_zero_cap() {
        let_assert!(Err(error) = Config::from_toml("[search]\nresult_cap = 0"));
        check!(format!("{:#}", error).contains("result_cap"));
    }

    #[test]
    fn rejects_unknown_fields() {
        check!(Config::from_toml("[search]\nresults = 3").is_err());
    }

    #[test]
    fn environment_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("COURSE_SEARCH_TABLE", "Other"),
            ("COURSE_SEARCH_RESULT_CAP", "7"),
            ("COURSE_SEARCH_SCAN_LIMIT", "20"),
            ("COURSE_SEARCH_RECORDS", "/tmp/records.json"),
        ]);

        let mut config = Config::default();
        config
            .apply_overrides(|key| vars.get(key).map(|v| v.to_string()))
            .unwrap();

        check!(config.store.table_name == "Other");
        check!(config.search.result_cap == 7);
        check!(config.store.scan_limit == 20);
        check!(config.store.records_path == Some(PathBuf::from("/tmp/records.json")));
    }

    #[test]
    fn non_numeric_override_is_an_error() {
        let mut config = Config::default();
        let result = config.apply_overrides(|key| {
            (key == "COURSE_SEARCH_RESULT_CAP").then(|| "ten".to_string())
        });
        check!(result.is_err());
    }

    #[test]
    fn explicit_path_wins() {
        check!(
            Config::resolve_path(Some("/etc/course-search.toml"))
                == Some(PathBuf::from("/etc/course-search.toml"))
        );
    }

    #[test]
    fn loads_file_then_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[search]\nresult_cap = 3\n[store]\nscan_limit = 25").unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        check!(config.search.result_cap == 3);
        check!(config.store.scan_limit == 25);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let_assert!(Err(error) = Config::load(Some(&dir.path().join("absent.toml"))));
        check!(format!("{:#}", error).contains("Failed to read configuration"));
    }

    #[test]
    fn tilde_left_alone_elsewhere() {
        check!(expand_tilde("/etc/course-search.toml") == "/etc/course-search.toml");
        check!(expand_tilde("relative/~/path") == "relative/~/path");
    }
}
