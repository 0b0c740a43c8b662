use anyhow::Result;
use codehelper_agent::GeminiSettings;
use codehelper_page::{PageSelectors, DEFAULT_SCOPE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const PAGE_URL_ENV: &str = "CODEHELPER_PAGE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub selectors: PageSelectors,
    pub ai: GeminiSettings,
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Page opened at startup and on reload.
    pub url: Option<String>,
    /// Navigation outside URLs containing this text is ignored.
    pub scope: String,
    pub watch_interval_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub status_clear_ms: u64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            url: None,
            scope: DEFAULT_SCOPE.to_string(),
            watch_interval_ms: 2000,
        }
    }
}

impl PageConfig {
    pub fn watch_interval(&self) -> Duration {
        Duration::from_millis(self.watch_interval_ms)
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            status_clear_ms: 3000,
        }
    }
}

impl UiConfig {
    pub fn status_clear_delay(&self) -> Duration {
        Duration::from_millis(self.status_clear_ms)
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        Self::load(path).unwrap_or_else(|e| {
            tracing::warn!("Ignoring unreadable config {}: {}", path.display(), e);
            Self::default()
        })
    }

    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(PAGE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.page.url = Some(url.trim().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [page]
            url = "file:///tmp/exercise.html"

            [selectors]
            code = "textarea.code"

            [ai]
            request_timeout_secs = 30
            "#,
        )
        .expect("parse");

        assert_eq!(config.page.url.as_deref(), Some("file:///tmp/exercise.html"));
        assert_eq!(config.page.scope, DEFAULT_SCOPE);
        assert_eq!(config.selectors.code, "textarea.code");
        assert_eq!(config.selectors.problem, PageSelectors::default().problem);
        assert_eq!(config.ai.request_timeout_secs, 30);
        assert_eq!(config.ai.model, GeminiSettings::default().model);
        assert_eq!(config.ui.status_clear_delay(), Duration::from_secs(3));
    }

    #[test]
    fn env_overrides_page_url() {
        let mut config = Config::default();
        config.apply_overrides(|name| {
            (name == PAGE_URL_ENV).then(|| " https://seek.example/courses/x ".to_string())
        });
        assert_eq!(config.page.url.as_deref(), Some("https://seek.example/courses/x"));
    }

    #[test]
    fn blank_env_is_ignored() {
        let mut config = Config::default();
        config.page.url = Some("file:///a.html".to_string());
        config.apply_overrides(|_| Some("  ".to_string()));
        assert_eq!(config.page.url.as_deref(), Some("file:///a.html"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Config::load_or_default(&dir.path().join("config.toml"));
        assert!(config.page.url.is_none());
    }
}
