//! Configuration handling for the membership console

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::gateway::{SortDirection, SortField};

/// Environment variable that overrides the data directory
pub const DATA_DIR_ENV: &str = "COASTAL_DATA_DIR";

const DEFAULT_PAGE_SIZE: usize = 10;
const DEFAULT_DEBOUNCE_MS: u64 = 400;
const DEFAULT_REPORT_FETCH_LIMIT: usize = 1000;

/// User configuration. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MembershipConfig {
    /// Where the draft, the collection, exports and the log live
    pub data_dir: Option<PathBuf>,
    /// Admin listing page size
    pub admin_page_size: Option<usize>,
    /// Admin sort field
    pub admin_sort_field: Option<String>,
    /// Admin sort direction
    pub admin_sort_direction: Option<String>,
    /// Quiet period before the draft is written
    pub draft_debounce_ms: Option<u64>,
    /// Rows fetched for the report
    pub report_fetch_limit: Option<usize>,
}

impl MembershipConfig {
    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("com", "coastalgrand", "coastal-membership")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: MembershipConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)?;
            fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Data directory: `COASTAL_DATA_DIR`, then `data_dir`, then the
    /// platform data dir, then the working directory.
    pub fn data_dir(&self) -> PathBuf {
        self.resolve_data_dir(std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
    }

    fn resolve_data_dir(&self, env_override: Option<PathBuf>) -> PathBuf {
        env_override
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| self.data_dir.clone())
            .or_else(|| Self::project_dirs().map(|dirs| dirs.data_dir().to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn page_size(&self) -> usize {
        self.admin_page_size
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn sort_field(&self) -> SortField {
        self.admin_sort_field
            .as_deref()
            .and_then(SortField::from_key)
            .unwrap_or_default()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.admin_sort_direction
            .as_deref()
            .and_then(SortDirection::from_key)
            .unwrap_or_default()
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.draft_debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS))
    }

    pub fn report_fetch_limit(&self) -> usize {
        self.report_fetch_limit
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_REPORT_FETCH_LIMIT)
    }

    /// Remember the admin sort order
    pub fn set_sort(&mut self, field: SortField, direction: SortDirection) {
        self.admin_sort_field = Some(field.as_key().to_string());
        self.admin_sort_direction = Some(direction.as_key().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = MembershipConfig::default();
        assert!(config.data_dir.is_none());
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.sort_field(), SortField::SubmittedAt);
        assert_eq!(config.sort_direction(), SortDirection::Desc);
        assert_eq!(config.debounce(), Duration::from_millis(400));
        assert_eq!(config.report_fetch_limit(), 1000);
    }

    #[test]
    fn test_serialization() {
        let mut config = MembershipConfig {
            data_dir: Some(PathBuf::from("/srv/coastal")),
            admin_page_size: Some(25),
            draft_debounce_ms: Some(250),
            report_fetch_limit: Some(500),
            ..Default::default()
        };
        config.set_sort(SortField::MembershipPrice, SortDirection::Asc);

        let json = serde_json::to_string(&config).unwrap();
        let parsed: MembershipConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, config);
        assert_eq!(parsed.admin_sort_field.as_deref(), Some("membershipPrice"));
        assert_eq!(parsed.sort_field(), SortField::MembershipPrice);
        assert_eq!(parsed.sort_direction(), SortDirection::Asc);
        assert_eq!(parsed.page_size(), 25);
    }

    #[test]
    fn test_deserialize_from_empty_json() {
        let parsed: MembershipConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, MembershipConfig::default());
    }

    #[test]
    fn test_deserialize_with_extra_fields() {
        // Should ignore unknown fields
        let json = r#"{"admin_page_size": 5, "unknown_field": "value"}"#;
        let parsed: MembershipConfig = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.page_size(), 5);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = MembershipConfig {
            admin_page_size: Some(0),
            admin_sort_field: Some("shoeSize".to_string()),
            admin_sort_direction: Some("sideways".to_string()),
            report_fetch_limit: Some(0),
            ..Default::default()
        };
        assert_eq!(config.page_size(), 10);
        assert_eq!(config.sort_field(), SortField::SubmittedAt);
        assert_eq!(config.sort_direction(), SortDirection::Desc);
        assert_eq!(config.report_fetch_limit(), 1000);
    }

    #[test]
    fn test_env_override_wins_over_file() {
        let config = MembershipConfig {
            data_dir: Some(PathBuf::from("/from/file")),
            ..Default::default()
        };
        assert_eq!(
            config.resolve_data_dir(Some(PathBuf::from("/from/env"))),
            PathBuf::from("/from/env")
        );
        assert_eq!(config.resolve_data_dir(None), PathBuf::from("/from/file"));
        assert_eq!(
            config.resolve_data_dir(Some(PathBuf::new())),
            PathBuf::from("/from/file")
        );
    }

    #[test]
    fn test_load_returns_default_when_no_file() {
        let result = MembershipConfig::load();
        assert!(result.is_ok());
    }
}
