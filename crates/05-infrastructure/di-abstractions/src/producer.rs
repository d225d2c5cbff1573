//! 提供者模型
//!
//! 提供者要么是可调用的构造函数，要么是原样使用的普通值。是否作为构造函数调用
//! 由 [`Producer::kind`] 在解析时决定：只有带名称的构造函数才会被调用。

use crate::args::ConstructorArgs;
use crate::injection::IntoHook;
use infrastructure_common::BoxError;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 构造函数类型
pub type ConstructFn<H> =
    Arc<dyn Fn(&ConstructorArgs) -> Result<Instance<H>, BoxError> + Send + Sync>;

/// 可由注册表按声明名称构造的类型
///
/// 相当于“类引用”：`get(Producer::of::<T>())` 在首次使用时以 `T::NAME` 为键自动注册。
pub trait Constructible: Send + Sync + Sized + 'static {
    /// 声明名称，作为自动派生的键
    const NAME: &'static str;

    /// 使用注册时保存的参数构造实例
    fn construct(args: &ConstructorArgs) -> Result<Self, BoxError>;
}

/// 已解析的实例
///
/// 克隆共享同一分配；钩子句柄与值指向同一个对象。
pub struct Instance<H: ?Sized> {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    hook: Option<Arc<H>>,
}

impl<H: ?Sized> Instance<H> {
    /// 不暴露初始化钩子的普通值
    pub fn plain<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// 共享已有分配的普通值
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value,
            type_name: std::any::type_name::<T>(),
            hook: None,
        }
    }

    /// 暴露初始化钩子的值
    pub fn injectable<T>(value: T) -> Self
    where
        T: Any + Send + Sync + IntoHook<H>,
    {
        let value = Arc::new(value);
        Self {
            hook: Some(Arc::clone(&value).into_hook()),
            type_name: std::any::type_name::<T>(),
            value,
        }
    }

    /// 初始化钩子
    pub fn hook(&self) -> Option<&Arc<H>> {
        self.hook.as_ref()
    }

    /// 值的类型名称
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// 转换为具体类型
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    /// 以引用方式转换为具体类型
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// 是否为同一个实例
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.value, &other.value)
    }
}

impl<H: ?Sized> Clone for Instance<H> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            type_name: self.type_name,
            hook: self.hook.clone(),
        }
    }
}

impl<H: ?Sized> fmt::Debug for Instance<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("type_name", &self.type_name)
            .field("has_hook", &self.hook.is_some())
            .finish()
    }
}

/// 提供者分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerKind {
    /// 带名称、可调用，解析时用保存的参数调用
    Constructible,
    /// 原样使用
    Value,
}

/// 提供者
pub enum Producer<H: ?Sized> {
    /// 构造函数或工厂函数
    Constructor {
        /// 声明名称，匿名函数为 `None`
        name: Option<String>,
        /// 构造函数
        construct: ConstructFn<H>,
    },
    /// 普通值
    Value(Instance<H>),
}

impl<H: ?Sized + 'static> Producer<H> {
    /// 以类型的声明名称作为构造函数
    pub fn of<T>() -> Self
    where
        T: Constructible + IntoHook<H>,
    {
        Self::Constructor {
            name: Some(T::NAME.to_string()),
            construct: Arc::new(|args: &ConstructorArgs| {
                T::construct(args).map(Instance::injectable)
            }),
        }
    }

    /// 工厂函数，`name` 为 `None` 时视为匿名函数
    pub fn function<F>(name: Option<&str>, construct: F) -> Self
    where
        F: Fn(&ConstructorArgs) -> Result<Instance<H>, BoxError> + Send + Sync + 'static,
    {
        Self::Constructor {
            name: name.map(str::to_string),
            construct: Arc::new(construct),
        }
    }

    /// 普通值（不暴露初始化钩子）
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Self::Value(Instance::plain(value))
    }

    /// 暴露初始化钩子的普通值
    pub fn injectable<T>(value: T) -> Self
    where
        T: Any + Send + Sync + IntoHook<H>,
    {
        Self::Value(Instance::injectable(value))
    }

    /// 声明名称，空名称视为没有名称
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Constructor {
                name: Some(name), ..
            } if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    /// 提供者分类：带名称且可调用为构造函数，其余一律为普通值
    pub fn kind(&self) -> ProducerKind {
        if self.name().is_some() {
            ProducerKind::Constructible
        } else {
            ProducerKind::Value
        }
    }

    /// 产出最终实例
    ///
    /// 构造函数使用 `args` 调用；普通值原样返回；匿名函数本身作为值返回且不被调用。
    pub fn instantiate(&self, args: &ConstructorArgs) -> Result<Instance<H>, BoxError> {
        match self {
            Self::Constructor { construct, .. } if self.kind() == ProducerKind::Constructible => {
                construct(args)
            }
            Self::Constructor { construct, .. } => Ok(Instance::plain(Arc::clone(construct))),
            Self::Value(instance) => Ok(instance.clone()),
        }
    }
}

impl<H: ?Sized> Clone for Producer<H> {
    fn clone(&self) -> Self {
        match self {
            Self::Constructor { name, construct } => Self::Constructor {
                name: name.clone(),
                construct: Arc::clone(construct),
            },
            Self::Value(instance) => Self::Value(instance.clone()),
        }
    }
}

impl<H: ?Sized> fmt::Debug for Producer<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constructor { name, .. } => f
                .debug_struct("Constructor")
                .field("name", name)
                .field("construct", &"<function>")
                .finish(),
            Self::Value(instance) => f.debug_tuple("Value").field(instance).finish(),
        }
    }
}
