//! 构造参数
//!
//! 注册时保存的有序参数序列，在首次解析时原样传给构造函数。

use std::any::Any;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// 构造参数读取错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("缺少第 {index} 个构造参数")]
    Missing { index: usize },

    #[error("第 {index} 个构造参数类型不匹配: 期望 {expected}, 实际 {actual}")]
    TypeMismatch {
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },
}

#[derive(Clone)]
struct Argument {
    value: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
}

/// 有序的类型擦除构造参数
#[derive(Clone, Default)]
pub struct ConstructorArgs {
    values: Vec<Argument>,
}

impl ConstructorArgs {
    /// 创建空参数列表
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加参数
    pub fn push<T: Any + Send + Sync>(&mut self, value: T) {
        self.values.push(Argument {
            value: Arc::new(value),
            type_name: std::any::type_name::<T>(),
        });
    }

    /// 追加参数（构建器风格）
    pub fn with<T: Any + Send + Sync>(mut self, value: T) -> Self {
        self.push(value);
        self
    }

    /// 按位置读取参数
    pub fn get<T: Any>(&self, index: usize) -> Option<&T> {
        self.values
            .get(index)
            .and_then(|arg| arg.value.downcast_ref::<T>())
    }

    /// 按位置读取参数，缺失或类型不符时返回错误
    pub fn require<T: Any>(&self, index: usize) -> Result<&T, ArgumentError> {
        let arg = self
            .values
            .get(index)
            .ok_or(ArgumentError::Missing { index })?;

        arg.value
            .downcast_ref::<T>()
            .ok_or(ArgumentError::TypeMismatch {
                index,
                expected: std::any::type_name::<T>(),
                actual: arg.type_name,
            })
    }

    /// 参数个数
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for ConstructorArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.values.iter().map(|arg| arg.type_name))
            .finish()
    }
}

/// 构建 [`ConstructorArgs`]
///
/// ```
/// use di_abstractions::args;
///
/// let args = args!["primary", 8080_u16];
/// assert_eq!(args.get::<&str>(0), Some(&"primary"));
/// assert_eq!(args.get::<u16>(1), Some(&8080));
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::ConstructorArgs::new()
    };
    ($($arg:expr),+ $(,)?) => {{
        let mut args = $crate::ConstructorArgs::new();
        $(args.push($arg);)+
        args
    }};
}
