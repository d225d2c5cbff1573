//! 异步注入器
//!
//! 与 [`Injector`](crate::Injector) 语义一致，只是初始化钩子可以是异步的。
//! 注册表本身不持有任何定时器或任务，挂起只发生在钩子调用处。

use crate::store::{Resolution, SharedStore};
use async_trait::async_trait;
use di_abstractions::{
    AsyncInjection, AsyncRegistry, ConstructorArgs, Identifier, Instance, Producer,
};
use infrastructure_common::{DependencyError, InjectorConfig};
use std::any::Any;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 异步依赖注入器
pub struct AsyncInjector {
    config: InjectorConfig,
    store: SharedStore<dyn AsyncInjection>,
}

impl AsyncInjector {
    /// 创建使用默认配置的注入器
    pub fn new() -> Self {
        Self::with_config(InjectorConfig::default())
    }

    /// 使用指定配置创建注入器
    pub fn with_config(config: InjectorConfig) -> Self {
        Self {
            config,
            store: SharedStore::new(),
        }
    }

    /// 注入器配置
    pub fn config(&self) -> &InjectorConfig {
        &self.config
    }

    /// 注册依赖（包括普通值）
    ///
    /// `initialise_on_request` 为 `false` 时立即实例化并等待初始化钩子完成。
    pub async fn set(
        &self,
        key: &str,
        producer: impl Into<Option<Producer<dyn AsyncInjection>>>,
        initialise_on_request: bool,
        args: ConstructorArgs,
    ) -> Result<(), DependencyError> {
        self.store.lock().insert(key, producer.into(), args)?;
        debug!("[{}] 注册依赖: {}", self.config.name, key);

        if !initialise_on_request {
            info!("[{}] 立即初始化依赖: {}", self.config.name, key);
            self.resolve(key).await?;
        }
        Ok(())
    }

    /// 以配置的默认延迟策略、无构造参数注册依赖
    pub async fn register(
        &self,
        key: &str,
        producer: impl Into<Option<Producer<dyn AsyncInjection>>>,
    ) -> Result<(), DependencyError> {
        self.set(
            key,
            producer,
            self.config.default_initialise_on_request,
            ConstructorArgs::new(),
        )
        .await
    }

    /// 按键或构造函数获取依赖
    pub async fn get(
        &self,
        id: impl Into<Identifier<dyn AsyncInjection>>,
        args: ConstructorArgs,
    ) -> Result<Instance<dyn AsyncInjection>, DependencyError> {
        let id = id.into();
        let key = id.key()?;

        if let Identifier::Producer(producer) = id {
            let registered = self.store.lock().insert_if_absent(&key, producer, args);
            if registered {
                debug!("[{}] 首次使用时自动注册: {}", self.config.name, key);
            }
        }

        self.resolve(&key).await
    }

    /// 获取依赖并转换为具体类型
    pub async fn get_as<T: Any + Send + Sync>(
        &self,
        id: impl Into<Identifier<dyn AsyncInjection>>,
        args: ConstructorArgs,
    ) -> Result<Arc<T>, DependencyError> {
        let id = id.into();
        let key = id.key()?;
        let instance = self.get(id, args).await?;

        instance
            .downcast::<T>()
            .ok_or_else(|| DependencyError::TypeMismatch {
                key,
                expected: std::any::type_name::<T>(),
                actual: instance.type_name(),
            })
    }

    /// 移除依赖，不存在时什么也不做
    pub fn unset(&self, key: &str) {
        if self.store.lock().remove(key) {
            debug!("[{}] 移除依赖: {}", self.config.name, key);
        }
    }

    /// 依赖是否已注册，无法派生键时返回 `false`
    pub fn is_set(&self, id: impl Into<Identifier<dyn AsyncInjection>>) -> bool {
        match id.into().key() {
            Ok(key) => self.store.lock().contains(&key),
            Err(_) => false,
        }
    }

    /// 依赖是否已实例化
    pub fn is_resolved(&self, key: &str) -> bool {
        self.store.lock().is_resolved(key)
    }

    /// 待解析条目数量
    pub fn pending_count(&self) -> usize {
        self.store.lock().pending_count()
    }

    /// 已解析条目数量
    pub fn resolved_count(&self) -> usize {
        self.store.lock().resolved_count()
    }

    /// 条目总数
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// 是否没有任何条目
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 移除所有条目
    pub fn clear(&self) {
        self.store.lock().clear();
        debug!("[{}] 清空所有依赖", self.config.name);
    }

    async fn resolve(&self, key: &str) -> Result<Instance<dyn AsyncInjection>, DependencyError> {
        // 提升不跨越 await，锁在钩子运行前已经释放
        let resolution = self.store.promote(key)?;

        let instance = match resolution {
            Resolution::Cached(instance) => {
                if self.config.log_resolutions {
                    debug!("[{}] 命中缓存: {}", self.config.name, key);
                }
                return Ok(instance);
            }
            Resolution::Promoted(instance) => instance,
        };
        debug!(
            "[{}] 实例化依赖: {} ({})",
            self.config.name,
            key,
            instance.type_name()
        );

        if let Some(hook) = instance.hook().cloned() {
            if !hook.initialised() {
                if let Err(source) = hook.init(self).await {
                    error!("[{}] 初始化依赖失败: {}", self.config.name, key);
                    return Err(DependencyError::InitialisationFailure {
                        key: key.to_string(),
                        source,
                    });
                }
            }
        }

        Ok(instance)
    }
}

impl Default for AsyncInjector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AsyncRegistry for AsyncInjector {
    async fn set(
        &self,
        key: &str,
        producer: Option<Producer<dyn AsyncInjection>>,
        initialise_on_request: bool,
        args: ConstructorArgs,
    ) -> Result<(), DependencyError> {
        AsyncInjector::set(self, key, producer, initialise_on_request, args).await
    }

    async fn get(
        &self,
        id: Identifier<dyn AsyncInjection>,
        args: ConstructorArgs,
    ) -> Result<Instance<dyn AsyncInjection>, DependencyError> {
        AsyncInjector::get(self, id, args).await
    }

    fn unset(&self, key: &str) {
        AsyncInjector::unset(self, key);
    }

    fn is_set(&self, id: Identifier<dyn AsyncInjection>) -> bool {
        AsyncInjector::is_set(self, id)
    }
}
