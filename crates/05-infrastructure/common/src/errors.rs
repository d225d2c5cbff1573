//! 错误类型定义

use thiserror::Error;

/// 构造函数和初始化钩子返回的通用错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("依赖已注册: {key}")]
    AlreadyRegistered { key: String },

    #[error("依赖值无效: {key} 的提供者缺失")]
    InvalidProducer { key: String },

    #[error("依赖未注册: {key}")]
    NotRegistered { key: String },

    #[error("无法提取依赖标识: {reason}")]
    InvalidIdentifier { reason: String },

    #[error("依赖初始化失败: {key}, 原因: {source}")]
    InitialisationFailure { key: String, source: BoxError },

    #[error("依赖构造失败: {key}, 原因: {source}")]
    ConstructionFailure { key: String, source: BoxError },

    #[error("构造函数重入自身: {key}")]
    CircularConstruction { key: String },

    #[error("依赖类型不匹配: {key}, 期望 {expected}, 实际 {actual}")]
    TypeMismatch {
        key: String,
        expected: &'static str,
        actual: &'static str,
    },
}

impl DependencyError {
    /// 创建标识无效错误
    pub fn invalid_identifier(reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            reason: reason.into(),
        }
    }

    /// 创建未注册错误
    pub fn not_registered(key: impl Into<String>) -> Self {
        Self::NotRegistered { key: key.into() }
    }

    /// 出错的依赖键（标识无效时没有键）
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::AlreadyRegistered { key }
            | Self::InvalidProducer { key }
            | Self::NotRegistered { key }
            | Self::InitialisationFailure { key, .. }
            | Self::ConstructionFailure { key, .. }
            | Self::CircularConstruction { key }
            | Self::TypeMismatch { key, .. } => Some(key),
            Self::InvalidIdentifier { .. } => None,
        }
    }
}

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("配置验证失败: {message}")]
    ValidationError { message: String },
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
