// 应用配置
//
// 职责：从 TOML 文件读取日志过滤器和缓冲区参数

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::core::buffer::BufferOptions;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {}: {source}", config_path.display())]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {}: {source}", config_path.display())]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config file at {}: {reason}", config_path.display())]
    ConfigInvalidError { config_path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// tracing 过滤指令，例如 `"zhex=debug"`
    pub log_filter: Option<String>,
    pub buffer: BufferOptions,
}

impl Config {
    /// 读取配置文件，文件不存在时返回 `Ok(None)`
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config
            .buffer
            .validate()
            .map_err(|reason| ConfigError::ConfigInvalidError {
                config_path: config_path.to_path_buf(),
                reason,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/zhex");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}
