pub mod error;

pub use error::*;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// 設定ファイルを直接指定する環境変数
pub const CONFIG_PATH_ENV: &str = "STRATO_CONFIG_PATH";

const CANDIDATES: [&str; 2] = ["strato.yaml", ".strato.yaml"];

/// Strato の設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StratoConfig {
    /// コントロールプレーンのエンドポイント（未指定ならクライアントのデフォルト）
    pub endpoint: Option<String>,

    /// 操作の完了待ちを打ち切るまでの秒数
    pub timeout_secs: u64,

    /// 状態確認の間隔（秒）
    pub interval_secs: u64,

    /// 各フェーズ後にリソースを再取得し、残存分を報告する
    pub verify: bool,
}

impl Default for StratoConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: 600,
            interval_secs: 5,
            verify: true,
        }
    }
}

impl StratoConfig {
    /// 最初に見つかった設定ファイルを読み込む（なければデフォルト）
    pub fn load() -> Result<Self> {
        match find_config_file()? {
            Some(path) => Self::from_path(&path),
            None => {
                tracing::debug!("no settings file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading settings");
        let content = std::fs::read_to_string(path)?;
        let config = if content.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "interval_secs must be greater than 0".to_string(),
            ));
        }
        if self.timeout_secs < self.interval_secs {
            return Err(ConfigError::Invalid(format!(
                "timeout_secs ({}) must not be shorter than interval_secs ({})",
                self.timeout_secs, self.interval_secs
            )));
        }
        if let Some(endpoint) = &self.endpoint
            && endpoint.trim().is_empty()
        {
            return Err(ConfigError::Invalid("endpoint must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

/// グローバル設定ファイルのパス (`<config dir>/strato/config.yaml`)
pub fn global_config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(config_dir.join("strato").join("config.yaml"))
}

/// 設定ファイルを探す
///
/// 以下の優先順位で検索:
/// 1. 環境変数 STRATO_CONFIG_PATH (指定時は存在必須)
/// 2. カレントディレクトリ: strato.yaml, .strato.yaml
/// 3. ~/.config/strato/config.yaml (グローバル設定)
pub fn find_config_file() -> Result<Option<PathBuf>> {
    // 1. 環境変数で直接指定
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV)
        && !config_path.is_empty()
    {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::ExplicitPathMissing(path));
    }

    // 2. カレントディレクトリで検索
    let current_dir = std::env::current_dir()?;
    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    // 3. グローバル設定ファイル
    if let Ok(global) = global_config_path()
        && global.exists()
    {
        return Ok(Some(global));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_defaults() {
        let config = StratoConfig::default();
        assert_eq!(config.poll_timeout(), Duration::from_secs(600));
        assert_eq!(config.poll_interval(), Duration::from_secs(5));
        assert!(config.verify);
        assert!(config.endpoint.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("strato.yaml");
        fs::write(&path, "endpoint: https://api.example.test/v1\ninterval_secs: 2\n").unwrap();

        let config = StratoConfig::from_path(&path).unwrap();
        assert_eq!(config.endpoint.as_deref(), Some("https://api.example.test/v1"));
        assert_eq!(config.interval_secs, 2);
        assert_eq!(config.timeout_secs, 600);
        assert!(config.verify);
    }

    #[test]
    fn test_empty_file_is_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("strato.yaml");
        fs::write(&path, "\n").unwrap();

        assert_eq!(
            StratoConfig::from_path(&path).unwrap(),
            StratoConfig::default()
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("strato.yaml");
        fs::write(&path, "timeout: 10\n").unwrap();

        let err = StratoConfig::from_path(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn test_validation() {
        let zero_interval = StratoConfig {
            interval_secs: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_interval.validate(),
            Err(ConfigError::Invalid(_))
        ));

        let short_timeout = StratoConfig {
            timeout_secs: 1,
            interval_secs: 5,
            ..Default::default()
        };
        assert!(short_timeout.validate().is_err());

        let blank_endpoint = StratoConfig {
            endpoint: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(blank_endpoint.validate().is_err());
    }

    #[test]
    fn test_global_config_path() {
        let path = global_config_path().unwrap();
        assert!(path.ends_with("strato/config.yaml"));
    }

    #[test]
    #[serial]
    fn test_find_config_file_in_current_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join(".strato.yaml"), "verify: false\n").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let found = find_config_file().unwrap().unwrap();
        assert!(found.ends_with(".strato.yaml"));

        let config = StratoConfig::load().unwrap();
        assert!(!config.verify);

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_visible_file_wins_over_hidden() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();

        fs::write(temp_dir.path().join("strato.yaml"), "interval_secs: 1\n").unwrap();
        fs::write(temp_dir.path().join(".strato.yaml"), "interval_secs: 2\n").unwrap();
        std::env::set_current_dir(&temp_dir).unwrap();

        let found = find_config_file().unwrap().unwrap();
        assert!(found.ends_with("strato.yaml"));
        assert!(!found.ends_with(".strato.yaml"));

        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_env_var_takes_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        let original_dir = std::env::current_dir().unwrap();
        let config_path = temp_dir.path().join("custom.yaml");
        fs::write(&config_path, "timeout_secs: 60\n").unwrap();
        fs::write(temp_dir.path().join("strato.yaml"), "timeout_secs: 30\n").unwrap();

        std::env::set_current_dir(&temp_dir).unwrap();
        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, config_path.to_str().unwrap());
        }

        assert_eq!(find_config_file().unwrap(), Some(config_path));
        assert_eq!(StratoConfig::load().unwrap().timeout_secs, 60);

        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
        std::env::set_current_dir(original_dir).unwrap();
    }

    #[test]
    #[serial]
    fn test_env_var_to_missing_file_is_an_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = temp_dir.path().join("nope.yaml");

        unsafe {
            std::env::set_var(CONFIG_PATH_ENV, missing.to_str().unwrap());
        }

        let err = find_config_file().unwrap_err();
        assert!(matches!(err, ConfigError::ExplicitPathMissing(path) if path == missing));

        unsafe {
            std::env::remove_var(CONFIG_PATH_ENV);
        }
    }
}
