//! # 依赖注入具体实现
//!
//! 提供两种注册表变体：
//!
//! - [`Injector`] - 同步变体，初始化钩子在 `get` 返回前完成
//! - [`AsyncInjector`] - 异步变体，`set` / `get` 返回 future，钩子可以继续 `await` 其他依赖
//!
//! 两者共用同一套解析算法：已解析直接返回缓存；否则在锁外实例化并提升为已解析，
//! 然后运行初始化钩子。钩子内对本键的再次获取会命中缓存，
//! 拿到尚未完成初始化的实例，因此互相引用的依赖不会无限递归。
//! 构造函数同样可以读取注册表中的其他依赖。
//!
//! ```
//! use di_impl::{args, Injector, Producer};
//!
//! let injector = Injector::new();
//! injector.set("port", Producer::value(8080_u16), true, args![]).unwrap();
//!
//! let port = injector.get_as::<u16>("port", args![]).unwrap();
//! assert_eq!(*port, 8080);
//! ```

mod async_injector;
mod injector;
mod store;

pub use async_injector::AsyncInjector;
pub use injector::Injector;

pub use di_abstractions::{
    args, AsyncInjection, AsyncRegistry, AsyncRegistryExt, BoxError, Constructible,
    ConstructorArgs, DependencyError, Identifier, Injection, Instance, Producer, ProducerKind,
    Registry, RegistryExt,
};
pub use infrastructure_common::InjectorConfig;
