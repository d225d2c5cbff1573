//! 待解析 / 已解析两张表

use di_abstractions::{ConstructorArgs, Instance, Producer};
use infrastructure_common::DependencyError;
use parking_lot::{Condvar, Mutex, MutexGuard};
use std::collections::HashMap;
use std::thread::{self, ThreadId};

/// 已注册但尚未实例化的条目
struct PendingEntry<H: ?Sized> {
    producer: Producer<H>,
    args: ConstructorArgs,
}

/// 正在构造的条目
struct Construction {
    owner: ThreadId,
    ticket: u64,
}

/// 提升结果
pub(crate) enum Resolution<H: ?Sized> {
    /// 已缓存，没有副作用
    Cached(Instance<H>),
    /// 本次刚实例化，调用方负责运行初始化钩子
    Promoted(Instance<H>),
}

/// 开始解析的结果
enum Begin<H: ?Sized> {
    Cached(Instance<H>),
    /// 调用方获得构造权，须在锁外构造后调用 [`Store::finish`]
    Started(PendingEntry<H>, u64),
    /// 其他调用正在构造
    InProgress(ThreadId),
}

/// 依赖存储
///
/// 同一个键任何时刻最多处于待解析、构造中、已解析三种状态之一。
pub(crate) struct Store<H: ?Sized> {
    pending: HashMap<String, PendingEntry<H>>,
    constructing: HashMap<String, Construction>,
    resolved: HashMap<String, Instance<H>>,
    next_ticket: u64,
}

impl<H: ?Sized + 'static> Store<H> {
    pub(crate) fn new() -> Self {
        Self {
            pending: HashMap::new(),
            constructing: HashMap::new(),
            resolved: HashMap::new(),
            next_ticket: 0,
        }
    }

    pub(crate) fn contains(&self, key: &str) -> bool {
        self.pending.contains_key(key)
            || self.constructing.contains_key(key)
            || self.resolved.contains_key(key)
    }

    pub(crate) fn is_resolved(&self, key: &str) -> bool {
        self.resolved.contains_key(key)
    }

    /// 注册为待解析条目
    ///
    /// 先检查重复键，再检查提供者是否缺失。
    pub(crate) fn insert(
        &mut self,
        key: &str,
        producer: Option<Producer<H>>,
        args: ConstructorArgs,
    ) -> Result<(), DependencyError> {
        if self.contains(key) {
            return Err(DependencyError::AlreadyRegistered {
                key: key.to_string(),
            });
        }
        let producer = producer.ok_or_else(|| DependencyError::InvalidProducer {
            key: key.to_string(),
        })?;

        self.pending
            .insert(key.to_string(), PendingEntry { producer, args });
        Ok(())
    }

    /// 键不存在时注册，返回是否新注册
    pub(crate) fn insert_if_absent(
        &mut self,
        key: &str,
        producer: Producer<H>,
        args: ConstructorArgs,
    ) -> bool {
        self.insert(key, Some(producer), args).is_ok()
    }

    /// 从所有状态中移除，返回键是否存在过
    ///
    /// 构造中的条目被移除后，构造结果不会写入已解析表。
    pub(crate) fn remove(&mut self, key: &str) -> bool {
        let pending = self.pending.remove(key).is_some();
        let constructing = self.constructing.remove(key).is_some();
        let resolved = self.resolved.remove(key).is_some();
        pending || constructing || resolved
    }

    fn begin(&mut self, key: &str) -> Result<Begin<H>, DependencyError> {
        if let Some(instance) = self.resolved.get(key) {
            return Ok(Begin::Cached(instance.clone()));
        }
        if let Some(construction) = self.constructing.get(key) {
            return Ok(Begin::InProgress(construction.owner));
        }

        let entry = self
            .pending
            .remove(key)
            .ok_or_else(|| DependencyError::not_registered(key))?;

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        self.constructing.insert(
            key.to_string(),
            Construction {
                owner: thread::current().id(),
                ticket,
            },
        );
        Ok(Begin::Started(entry, ticket))
    }

    /// 结束构造：成功时提升为已解析，失败时放回待解析表
    ///
    /// 构造期间条目被移除或替换时只把结果交给调用方，不改动表。
    fn finish(
        &mut self,
        key: &str,
        ticket: u64,
        entry: PendingEntry<H>,
        constructed: Result<Instance<H>, infrastructure_common::BoxError>,
    ) -> Result<Resolution<H>, DependencyError> {
        let current = self
            .constructing
            .get(key)
            .is_some_and(|construction| construction.ticket == ticket);
        if current {
            self.constructing.remove(key);
        }

        match constructed {
            Ok(instance) => {
                if current {
                    self.resolved.insert(key.to_string(), instance.clone());
                }
                Ok(Resolution::Promoted(instance))
            }
            Err(source) => {
                if current {
                    self.pending.insert(key.to_string(), entry);
                }
                Err(DependencyError::ConstructionFailure {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn resolved_count(&self) -> usize {
        self.resolved.len()
    }

    /// 条目总数（包括构造中的条目）
    pub(crate) fn len(&self) -> usize {
        self.pending.len() + self.constructing.len() + self.resolved.len()
    }

    pub(crate) fn clear(&mut self) {
        self.pending.clear();
        self.constructing.clear();
        self.resolved.clear();
    }
}

/// 带锁的存储
///
/// 锁只保护表的读写，构造函数和初始化钩子都在锁外运行，可以重入注册表。
/// 同一个键并发解析时，后到的线程等待构造完成，保证最多构造一次。
pub(crate) struct SharedStore<H: ?Sized> {
    state: Mutex<Store<H>>,
    constructed: Condvar,
}

impl<H: ?Sized + 'static> SharedStore<H> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(Store::new()),
            constructed: Condvar::new(),
        }
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Store<H>> {
        self.state.lock()
    }

    /// 返回缓存实例，或者实例化待解析条目并提升为已解析
    ///
    /// 构造函数在同一线程上重入自身的键时返回 [`DependencyError::CircularConstruction`]。
    pub(crate) fn promote(&self, key: &str) -> Result<Resolution<H>, DependencyError> {
        let mut store = self.state.lock();
        let (entry, ticket) = loop {
            match store.begin(key)? {
                Begin::Cached(instance) => return Ok(Resolution::Cached(instance)),
                Begin::Started(entry, ticket) => break (entry, ticket),
                Begin::InProgress(owner) if owner == thread::current().id() => {
                    return Err(DependencyError::CircularConstruction {
                        key: key.to_string(),
                    });
                }
                Begin::InProgress(_) => self.constructed.wait(&mut store),
            }
        };
        drop(store);

        let constructed = entry.producer.instantiate(&entry.args);

        let resolution = self.state.lock().finish(key, ticket, entry, constructed);
        self.constructed.notify_all();
        resolution
    }
}
