use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// 覆盖 API 地址的环境变量
pub const API_URL_ENV: &str = "WEBTOON_API_URL";

const APP_DIR: &str = "webtoon-gallery";
const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:5000/api";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("无法获取用户目录")]
    NoConfigDir,
    #[error("读取配置失败: {0}")]
    Io(#[from] io::Error),
    #[error("配置格式错误: {0}")]
    Parse(#[from] toml::de::Error),
}

/// 应用配置（config.toml，所有键可选）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub grid_columns: u16,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout_secs: 10,
            connect_timeout_secs: 5,
            grid_columns: 2,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// 规范化: 去掉末尾的 `/`，限制列数
    fn normalized(mut self) -> Self {
        self.api_base_url = self.api_base_url.trim_end_matches('/').to_string();
        if self.api_base_url.is_empty() {
            self.api_base_url = DEFAULT_API_BASE_URL.to_string();
        }
        self.grid_columns = self.grid_columns.clamp(1, 4);
        self
    }

    /// 应用环境变量覆盖
    pub fn with_env_override(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
        }
        self.normalized()
    }

    pub fn log_level(&self) -> tracing::Level {
        self.log_level.parse().unwrap_or(tracing::Level::INFO)
    }
}

/// 配置目录 (~/.config/webtoon-gallery/)
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(APP_DIR))
}

/// 数据目录 (~/.local/share/webtoon-gallery/)，用于日志
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = dirs::data_dir()
        .ok_or(ConfigError::NoConfigDir)?
        .join(APP_DIR);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// 从 TOML 文件加载配置，文件不存在时使用默认值
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default().normalized());
    }

    let content = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    Ok(config.normalized())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "api_base_url = \"http://10.0.2.2:5000/api/\"\ngrid_columns = 9\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.api_base_url, "http://10.0.2.2:5000/api");
        assert_eq!(config.grid_columns, 4);
        assert_eq!(config.request_timeout_secs, 10);
    }

    #[test]
    fn test_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "grid_columns = \"two\"").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_override() {
        let config = Config::default().with_env_override(Some("http://api.local/v1/".to_string()));
        assert_eq!(config.api_base_url, "http://api.local/v1");

        let config = Config::default().with_env_override(Some("  ".to_string()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_log_level() {
        let mut config = Config::default();
        assert_eq!(config.log_level(), tracing::Level::INFO);
        config.log_level = "debug".to_string();
        assert_eq!(config.log_level(), tracing::Level::DEBUG);
        config.log_level = "loud".to_string();
        assert_eq!(config.log_level(), tracing::Level::INFO);
    }
}
