//! 注册表抽象接口
//!
//! 初始化钩子通过这些 trait 对象回调注册表。

use crate::args::ConstructorArgs;
use crate::identifier::Identifier;
use crate::injection::{AsyncInjection, Injection};
use crate::producer::{Instance, Producer};
use async_trait::async_trait;
use infrastructure_common::DependencyError;
use std::any::Any;
use std::sync::Arc;

/// 同步注册表
pub trait Registry: Send + Sync {
    /// 注册提供者；`initialise_on_request` 为 `false` 时立即解析
    fn set(
        &self,
        key: &str,
        producer: Option<Producer<dyn Injection>>,
        initialise_on_request: bool,
        args: ConstructorArgs,
    ) -> Result<(), DependencyError>;

    /// 获取依赖；提供者标识在首次使用时以声明名称和 `args` 自动注册
    fn get(
        &self,
        id: Identifier<dyn Injection>,
        args: ConstructorArgs,
    ) -> Result<Instance<dyn Injection>, DependencyError>;

    /// 移除依赖，键不存在时什么也不做
    fn unset(&self, key: &str);

    /// 依赖是否已注册（无法派生键时返回 `false`）
    fn is_set(&self, id: Identifier<dyn Injection>) -> bool;
}

/// 异步注册表
#[async_trait]
pub trait AsyncRegistry: Send + Sync {
    /// 注册提供者；`initialise_on_request` 为 `false` 时立即解析并等待初始化钩子
    async fn set(
        &self,
        key: &str,
        producer: Option<Producer<dyn AsyncInjection>>,
        initialise_on_request: bool,
        args: ConstructorArgs,
    ) -> Result<(), DependencyError>;

    /// 获取依赖；提供者标识在首次使用时以声明名称和 `args` 自动注册
    async fn get(
        &self,
        id: Identifier<dyn AsyncInjection>,
        args: ConstructorArgs,
    ) -> Result<Instance<dyn AsyncInjection>, DependencyError>;

    /// 移除依赖，键不存在时什么也不做
    fn unset(&self, key: &str);

    /// 依赖是否已注册（无法派生键时返回 `false`）
    fn is_set(&self, id: Identifier<dyn AsyncInjection>) -> bool;
}

fn downcast_instance<H: ?Sized, T: Any + Send + Sync>(
    key: String,
    instance: &Instance<H>,
) -> Result<Arc<T>, DependencyError> {
    instance
        .downcast::<T>()
        .ok_or_else(|| DependencyError::TypeMismatch {
            key,
            expected: std::any::type_name::<T>(),
            actual: instance.type_name(),
        })
}

/// 同步注册表的类型化扩展
pub trait RegistryExt: Registry {
    /// 获取并转换为具体类型
    fn get_as<T: Any + Send + Sync>(
        &self,
        id: impl Into<Identifier<dyn Injection>>,
        args: ConstructorArgs,
    ) -> Result<Arc<T>, DependencyError> {
        let id = id.into();
        let key = id.key()?;
        let instance = self.get(id, args)?;
        downcast_instance(key, &instance)
    }
}

impl<R: Registry + ?Sized> RegistryExt for R {}

/// 异步注册表的类型化扩展
#[async_trait]
pub trait AsyncRegistryExt: AsyncRegistry {
    /// 获取并转换为具体类型
    async fn get_as<T: Any + Send + Sync>(
        &self,
        id: Identifier<dyn AsyncInjection>,
        args: ConstructorArgs,
    ) -> Result<Arc<T>, DependencyError> {
        let key = id.key()?;
        let instance = self.get(id, args).await?;
        downcast_instance(key, &instance)
    }
}

impl<R: AsyncRegistry + ?Sized> AsyncRegistryExt for R {}
