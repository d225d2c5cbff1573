//! # Infrastructure Common
//!
//! 这个 crate 提供了依赖注入注册表各层共用的基础设施。
//!
//! ## 核心组件
//!
//! - [`DependencyError`] - 注册表错误分类
//! - [`InjectorConfig`] - 注入器配置（基于 `config` crate 加载）
//! - [`LoggingConfig`] - 日志系统配置与初始化
//!
//! ## 设计原则
//!
//! - 注册表实例由调用方显式创建并传递，不提供进程级全局实例
//! - 所有错误都通过 `Result` 向直接调用方传播

pub mod configuration;
pub mod errors;
pub mod logging;

pub use configuration::*;
pub use errors::*;
pub use logging::*;
