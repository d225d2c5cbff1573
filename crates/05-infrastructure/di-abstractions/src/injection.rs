//! 初始化钩子
//!
//! 实例在被提升为已解析之后、返回给调用方之前，可以通过钩子拿到注册表本身，
//! 用来获取其他依赖（包括互相引用的依赖）。

use crate::registry::{AsyncRegistry, Registry};
use async_trait::async_trait;
use infrastructure_common::BoxError;
use std::sync::Arc;

/// 同步初始化钩子
pub trait Injection: Send + Sync + 'static {
    /// 初始化实例，每个键最多调用一次
    fn init(&self, _registry: &dyn Registry) -> Result<(), BoxError> {
        Ok(())
    }

    /// 返回 `true` 时跳过 [`Injection::init`]
    fn initialised(&self) -> bool {
        false
    }
}

/// 异步初始化钩子
///
/// 钩子内部可以继续 `await` 注册表的 `get`。
#[async_trait]
pub trait AsyncInjection: Send + Sync + 'static {
    /// 初始化实例，每个键最多调用一次
    async fn init(&self, _registry: &dyn AsyncRegistry) -> Result<(), BoxError> {
        Ok(())
    }

    /// 返回 `true` 时跳过 [`AsyncInjection::init`]
    fn initialised(&self) -> bool {
        false
    }
}

/// 把具体实例转换为注册表变体所使用的钩子对象
pub trait IntoHook<H: ?Sized> {
    /// 转换为钩子对象
    fn into_hook(self: Arc<Self>) -> Arc<H>;
}

impl<T: Injection> IntoHook<dyn Injection> for T {
    fn into_hook(self: Arc<Self>) -> Arc<dyn Injection> {
        self
    }
}

impl<T: AsyncInjection> IntoHook<dyn AsyncInjection> for T {
    fn into_hook(self: Arc<Self>) -> Arc<dyn AsyncInjection> {
        self
    }
}
