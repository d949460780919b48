use anyhow::{Context, Result};
use directories::ProjectDirs;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SupabaseConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
}

/// Validated connection details for the hosted backend.
#[derive(Debug, Clone, PartialEq)]
pub struct SupabaseCredentials {
    pub url: Url,
    pub anon_key: String,
}

impl SupabaseCredentials {
    /// Returns `None` unless `url` is an absolute http(s) URL and `anon_key`
    /// is non-blank.
    pub fn parse(url: &str, anon_key: &str) -> Option<Self> {
        let anon_key = anon_key.trim();
        if anon_key.is_empty() {
            return None;
        }
        let url = Url::parse(url.trim()).ok()?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return None;
        }
        Some(Self {
            url,
            anon_key: anon_key.to_string(),
        })
    }

    /// Base URL without a trailing slash, ready for path concatenation.
    pub fn base_url(&self) -> String {
        self.url.as_str().trim_end_matches('/').to_string()
    }
}

fn default_currency() -> String {
    "EGP".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub supabase: SupabaseConfig,
    #[serde(default = "default_currency")]
    pub currency: String,
    pub data_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            supabase: SupabaseConfig::default(),
            currency: default_currency(),
            data_path: None,
        }
    }
}

impl AppConfig {
    /// Loads the config from the default location, falling back to defaults
    /// when no file has been created yet.
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        if !config_path.exists() {
            debug!(
                "No config file at {}, using defaults",
                config_path.display()
            );
            return Ok(Self::default());
        }
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("io", "pocketbook", "pocketbook")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn data_path(&self) -> Result<PathBuf> {
        if let Some(custom_path) = &self.data_path {
            return Ok(PathBuf::from(custom_path));
        }
        let proj_dirs = ProjectDirs::from("io", "pocketbook", "pocketbook")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Resolves backend credentials from the environment, then the config file.
    pub fn credentials(&self) -> Option<SupabaseCredentials> {
        self.credentials_with(
            std::env::var(SUPABASE_URL_ENV).ok(),
            std::env::var(SUPABASE_ANON_KEY_ENV).ok(),
        )
    }

    fn credentials_with(
        &self,
        env_url: Option<String>,
        env_key: Option<String>,
    ) -> Option<SupabaseCredentials> {
        let url = env_url.or_else(|| self.supabase.url.clone());
        let key = env_key.or_else(|| self.supabase.anon_key.clone());
        let credentials = match (url, key) {
            (Some(url), Some(key)) => SupabaseCredentials::parse(&url, &key),
            _ => None,
        };
        if credentials.is_none() {
            debug!("Backend credentials missing or malformed, persistence disabled");
        }
        credentials
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
supabase:
  url: "https://abcd.supabase.co"
  anon_key: "public-anon-key"
currency: "USD"
data_path: "/tmp/pocketbook"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.supabase.url.as_deref(),
            Some("https://abcd.supabase.co")
        );
        assert_eq!(config.supabase.anon_key.as_deref(), Some("public-anon-key"));
        assert_eq!(config.currency, "USD");
        assert_eq!(
            config.data_path().unwrap(),
            PathBuf::from("/tmp/pocketbook")
        );
    }

    #[test]
    fn test_config_defaults() {
        let config: AppConfig = serde_yaml::from_str("{}").expect("Failed to deserialize");
        assert_eq!(config.currency, "EGP");
        assert!(config.supabase.url.is_none());
        assert!(config.data_path.is_none());
    }

    #[test]
    fn test_credentials_validation() {
        assert!(SupabaseCredentials::parse("https://abcd.supabase.co", "key").is_some());
        assert!(SupabaseCredentials::parse("http://127.0.0.1:54321", "key").is_some());
        assert!(SupabaseCredentials::parse("not a url", "key").is_none());
        assert!(SupabaseCredentials::parse("ftp://abcd.supabase.co", "key").is_none());
        assert!(SupabaseCredentials::parse("https://abcd.supabase.co", "  ").is_none());
    }

    #[test]
    fn test_base_url_has_no_trailing_slash() {
        let credentials = SupabaseCredentials::parse("https://abcd.supabase.co/", "key").unwrap();
        assert_eq!(credentials.base_url(), "https://abcd.supabase.co");
    }

    #[test]
    fn test_environment_overrides_file_credentials() {
        let config = AppConfig {
            supabase: SupabaseConfig {
                url: Some("https://file.supabase.co".to_string()),
                anon_key: Some("file-key".to_string()),
            },
            ..Default::default()
        };

        let from_file = config.credentials_with(None, None).unwrap();
        assert_eq!(from_file.base_url(), "https://file.supabase.co");
        assert_eq!(from_file.anon_key, "file-key");

        let from_env = config
            .credentials_with(Some("https://env.supabase.co".to_string()), None)
            .unwrap();
        assert_eq!(from_env.base_url(), "https://env.supabase.co");
        assert_eq!(from_env.anon_key, "file-key");
    }

    #[test]
    fn test_missing_or_malformed_credentials_disable_persistence() {
        let config = AppConfig::default();
        assert!(config.credentials_with(None, None).is_none());
        assert!(
            config
                .credentials_with(Some("garbage".to_string()), Some("key".to_string()))
                .is_none()
        );
    }
}
