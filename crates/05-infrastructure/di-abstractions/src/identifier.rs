//! 依赖标识

use crate::producer::Producer;
use infrastructure_common::DependencyError;
use std::fmt;

/// 依赖标识：显式字符串键，或者以声明名称派生键的提供者
pub enum Identifier<H: ?Sized> {
    /// 显式键
    Key(String),
    /// 提供者，键为其声明名称
    Producer(Producer<H>),
    /// 缺失值
    Absent,
}

impl<H: ?Sized + 'static> Identifier<H> {
    /// 派生规范键
    ///
    /// 显式键优先；提供者使用声明名称原样作为键；普通值、匿名函数和缺失值无法派生。
    pub fn key(&self) -> Result<String, DependencyError> {
        match self {
            Self::Key(key) => Ok(key.clone()),
            Self::Producer(producer) => producer.name().map(str::to_string).ok_or_else(|| {
                DependencyError::invalid_identifier(
                    "提供者不是带名称的构造函数，普通值请先通过 set 注册",
                )
            }),
            Self::Absent => Err(DependencyError::invalid_identifier("依赖标识缺失")),
        }
    }
}

impl<H: ?Sized> Clone for Identifier<H> {
    fn clone(&self) -> Self {
        match self {
            Self::Key(key) => Self::Key(key.clone()),
            Self::Producer(producer) => Self::Producer(producer.clone()),
            Self::Absent => Self::Absent,
        }
    }
}

impl<H: ?Sized> fmt::Debug for Identifier<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.debug_tuple("Key").field(key).finish(),
            Self::Producer(producer) => f.debug_tuple("Producer").field(producer).finish(),
            Self::Absent => f.write_str("Absent"),
        }
    }
}

impl<H: ?Sized> From<&str> for Identifier<H> {
    fn from(key: &str) -> Self {
        Self::Key(key.to_string())
    }
}

impl<H: ?Sized> From<String> for Identifier<H> {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl<H: ?Sized> From<&String> for Identifier<H> {
    fn from(key: &String) -> Self {
        Self::Key(key.clone())
    }
}

impl<H: ?Sized> From<Producer<H>> for Identifier<H> {
    fn from(producer: Producer<H>) -> Self {
        Self::Producer(producer)
    }
}

impl<H: ?Sized> From<Option<Producer<H>>> for Identifier<H> {
    fn from(producer: Option<Producer<H>>) -> Self {
        producer.map_or(Self::Absent, Self::Producer)
    }
}
