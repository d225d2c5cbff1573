//! 注入器配置

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, error};

/// 环境变量前缀，例如 `INJECTOR_LOG_RESOLUTIONS=true`
pub const ENV_PREFIX: &str = "INJECTOR";

/// 注入器配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectorConfig {
    /// 注入器名称，仅用于日志诊断
    pub name: String,
    /// `register` 简写使用的默认延迟策略
    pub default_initialise_on_request: bool,
    /// 是否为每次查找输出调试日志
    pub log_resolutions: bool,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            default_initialise_on_request: true,
            log_resolutions: false,
        }
    }
}

impl InjectorConfig {
    /// 创建指定名称的配置
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 设置默认延迟策略
    pub fn with_default_initialise_on_request(mut self, enabled: bool) -> Self {
        self.default_initialise_on_request = enabled;
        self
    }

    /// 设置是否输出查找日志
    pub fn with_log_resolutions(mut self, enabled: bool) -> Self {
        self.log_resolutions = enabled;
        self
    }

    /// 从配置文件（可选）和环境变量加载配置
    ///
    /// 环境变量优先于文件，缺失的字段使用默认值。
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            if !path.exists() {
                return Err(ConfigError::FileNotFound {
                    path: path.display().to_string(),
                });
            }
            debug!("加载注入器配置文件: {}", path.display());
            builder = builder.add_source(config::File::from(path));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| {
                error!("配置构建失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;

        let loaded: Self = settings.try_deserialize().map_err(|e| {
            error!("配置绑定失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;

        loaded.validate()?;
        debug!("注入器配置加载完成: {}", loaded.name);
        Ok(loaded)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                message: "注入器名称不能为空".to_string(),
            });
        }
        Ok(())
    }
}
