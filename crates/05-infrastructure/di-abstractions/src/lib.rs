//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义提供者模型、依赖标识和注册表的核心接口。
//!
//! ## 核心接口
//!
//! - [`Producer`] - 提供者（构造函数或普通值）
//! - [`Identifier`] - 依赖标识（字符串键或提供者）
//! - [`Injection`] / [`AsyncInjection`] - 初始化钩子
//! - [`Registry`] / [`AsyncRegistry`] - 注册表接口
//! - [`ConstructorArgs`] - 构造参数

pub mod args;
pub mod identifier;
pub mod injection;
pub mod producer;
pub mod registry;

pub use args::*;
pub use identifier::*;
pub use injection::*;
pub use producer::*;
pub use registry::*;

pub use infrastructure_common::{BoxError, DependencyError, DependencyResult};
