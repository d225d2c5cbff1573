//! 异步注入器的集中集成测试
use async_trait::async_trait;
use di_impl::{
    args, AsyncInjection, AsyncInjector, AsyncRegistry, AsyncRegistryExt, BoxError, Constructible,
    ConstructorArgs, DependencyError, Identifier, InjectorConfig, Instance, Producer,
};
use std::io::Write;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};

/// 连接池，构造参数为连接串
struct ConnectionPool {
    url: String,
    opened: AtomicBool,
}

#[async_trait]
impl AsyncInjection for ConnectionPool {
    async fn init(&self, _registry: &dyn AsyncRegistry) -> Result<(), BoxError> {
        tokio::task::yield_now().await;
        self.opened.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl Constructible for ConnectionPool {
    const NAME: &'static str = "ConnectionPool";

    fn construct(args: &ConstructorArgs) -> Result<Self, BoxError> {
        Ok(Self {
            url: args.require::<&str>(0)?.to_string(),
            opened: AtomicBool::new(false),
        })
    }
}

/// 在钩子中获取连接池的仓储
struct UserRepository {
    pool: OnceLock<Arc<ConnectionPool>>,
}

#[async_trait]
impl AsyncInjection for UserRepository {
    async fn init(&self, registry: &dyn AsyncRegistry) -> Result<(), BoxError> {
        let pool = registry
            .get_as::<ConnectionPool>("pool".into(), args![])
            .await?;
        let _ = self.pool.set(pool);
        Ok(())
    }
}

impl Constructible for UserRepository {
    const NAME: &'static str = "UserRepository";

    fn construct(_args: &ConstructorArgs) -> Result<Self, BoxError> {
        Ok(Self {
            pool: OnceLock::new(),
        })
    }
}

#[tokio::test]
async fn test_hook_resolves_dependencies() {
    let injector = AsyncInjector::new();
    injector
        .set(
            "pool",
            Producer::of::<ConnectionPool>(),
            true,
            args!["postgres://localhost/ads"],
        )
        .await
        .unwrap();

    let repository = injector
        .get_as::<UserRepository>(Producer::of::<UserRepository>(), args![])
        .await
        .unwrap();

    let pool = repository.pool.get().unwrap();
    assert_eq!(pool.url, "postgres://localhost/ads");
    assert!(pool.opened.load(Ordering::SeqCst));
    assert!(injector.is_resolved("pool"));
    assert!(injector.is_resolved("UserRepository"));
}

#[tokio::test]
async fn test_eager_set_awaits_hook() {
    let injector = AsyncInjector::new();
    injector
        .set(
            "pool",
            Producer::of::<ConnectionPool>(),
            false,
            args!["redis://cache"],
        )
        .await
        .unwrap();

    assert!(injector.is_resolved("pool"));
    let pool = injector
        .get_as::<ConnectionPool>("pool", args![])
        .await
        .unwrap();
    assert!(pool.opened.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_construction_error_reports_missing_argument() {
    let injector = AsyncInjector::new();
    injector
        .set("pool", Producer::of::<ConnectionPool>(), true, args![])
        .await
        .unwrap();

    match injector.get("pool", args![]).await {
        Err(DependencyError::ConstructionFailure { key, source }) => {
            assert_eq!(key, "pool");
            assert!(source.to_string().contains("第 0 个"));
        }
        other => panic!("期望构造失败, 实际: {:?}", other.map(|_| ())),
    }
    assert_eq!(injector.pending_count(), 1);
}

/// 互相引用的异步服务
struct OrderService {
    billing: OnceLock<Arc<BillingService>>,
    ready: AtomicBool,
}

struct BillingService {
    orders: OnceLock<Arc<OrderService>>,
    saw_orders_ready: AtomicBool,
}

#[async_trait]
impl AsyncInjection for OrderService {
    async fn init(&self, registry: &dyn AsyncRegistry) -> Result<(), BoxError> {
        let billing = registry
            .get_as::<BillingService>(
                Identifier::Producer(Producer::of::<BillingService>()),
                args![],
            )
            .await?;
        let _ = self.billing.set(billing);
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }
}

impl Constructible for OrderService {
    const NAME: &'static str = "OrderService";

    fn construct(_args: &ConstructorArgs) -> Result<Self, BoxError> {
        Ok(Self {
            billing: OnceLock::new(),
            ready: AtomicBool::new(false),
        })
    }
}

#[async_trait]
impl AsyncInjection for BillingService {
    async fn init(&self, registry: &dyn AsyncRegistry) -> Result<(), BoxError> {
        let orders = registry
            .get_as::<OrderService>(
                Identifier::Producer(Producer::of::<OrderService>()),
                args![],
            )
            .await?;
        self.saw_orders_ready
            .store(orders.ready.load(Ordering::SeqCst), Ordering::SeqCst);
        let _ = self.orders.set(orders);
        Ok(())
    }
}

impl Constructible for BillingService {
    const NAME: &'static str = "BillingService";

    fn construct(_args: &ConstructorArgs) -> Result<Self, BoxError> {
        Ok(Self {
            orders: OnceLock::new(),
            saw_orders_ready: AtomicBool::new(false),
        })
    }
}

#[tokio::test]
async fn test_circular_async_hooks_complete() {
    let injector = AsyncInjector::new();

    let orders = injector
        .get_as::<OrderService>(Producer::of::<OrderService>(), args![])
        .await
        .unwrap();
    let billing = injector
        .get_as::<BillingService>("BillingService", args![])
        .await
        .unwrap();

    assert!(orders.ready.load(Ordering::SeqCst));
    assert!(Arc::ptr_eq(orders.billing.get().unwrap(), &billing));
    assert!(Arc::ptr_eq(billing.orders.get().unwrap(), &orders));
    assert!(!billing.saw_orders_ready.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_duplicate_and_missing_keys() {
    let injector = AsyncInjector::new();
    injector
        .set("cfg", Producer::value(1_u32), false, args![])
        .await
        .unwrap();

    assert!(matches!(
        injector.set("cfg", Producer::value(2_u32), true, args![]).await,
        Err(DependencyError::AlreadyRegistered { .. })
    ));
    assert!(matches!(
        injector
            .set("other", None::<Producer<dyn AsyncInjection>>, true, args![])
            .await,
        Err(DependencyError::InvalidProducer { .. })
    ));

    injector.unset("cfg");
    injector.unset("cfg");
    assert!(matches!(
        injector.get("cfg", args![]).await,
        Err(DependencyError::NotRegistered { .. })
    ));
}

#[tokio::test]
async fn test_invalid_identifiers_never_panic() {
    let injector = AsyncInjector::new();
    let ids: Vec<Identifier<dyn AsyncInjection>> = vec![
        Identifier::Absent,
        Producer::value(7_i64).into(),
        Producer::value(vec!["x"]).into(),
        Producer::function(None, |_| Ok(Instance::plain(()))).into(),
    ];

    for id in ids {
        assert!(!injector.is_set(id.clone()));
        assert!(matches!(
            injector.get(id, args![]).await,
            Err(DependencyError::InvalidIdentifier { .. })
        ));
    }
}

/// 钩子失败的服务
struct BrokenClient;

#[async_trait]
impl AsyncInjection for BrokenClient {
    async fn init(&self, _registry: &dyn AsyncRegistry) -> Result<(), BoxError> {
        Err("握手超时".into())
    }
}

impl Constructible for BrokenClient {
    const NAME: &'static str = "BrokenClient";

    fn construct(_args: &ConstructorArgs) -> Result<Self, BoxError> {
        Ok(Self)
    }
}

#[tokio::test]
async fn test_init_failure_keeps_entry_resolved() {
    let injector = AsyncInjector::new();

    let result = injector
        .set("client", Producer::of::<BrokenClient>(), false, args![])
        .await;
    match result {
        Err(error @ DependencyError::InitialisationFailure { .. }) => {
            assert_eq!(error.key(), Some("client"));
        }
        other => panic!("期望初始化失败, 实际: {:?}", other),
    }

    assert!(injector.is_resolved("client"));
    assert!(injector
        .get_as::<BrokenClient>("client", args![])
        .await
        .is_ok());
}

#[tokio::test]
async fn test_concurrent_tasks_construct_once() {
    let constructions = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&constructions);
    let injector = Arc::new(AsyncInjector::new());
    injector
        .set(
            "shared",
            Producer::function(Some("Shared"), move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Instance::plain(String::from("shared")))
            }),
            true,
            args![],
        )
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..16 {
        let injector = Arc::clone(&injector);
        handles.push(tokio::spawn(async move {
            injector.get_as::<String>("shared", args![]).await
        }));
    }

    let mut first: Option<Arc<String>> = None;
    for handle in handles {
        let value = handle.await.unwrap().unwrap();
        if let Some(first) = &first {
            assert!(Arc::ptr_eq(first, &value));
        } else {
            first = Some(value);
        }
    }
    assert_eq!(constructions.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_register_follows_loaded_config() -> anyhow::Result<()> {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
    writeln!(file, "name = \"integration\"")?;
    writeln!(file, "default_initialise_on_request = false")?;

    let config = InjectorConfig::load(Some(file.path()))?;
    let injector = AsyncInjector::with_config(config);
    assert_eq!(injector.config().name, "integration");

    // 默认立即解析：缺少构造参数在注册时就暴露出来
    let result = injector
        .register("pool", Producer::of::<ConnectionPool>())
        .await;
    assert!(matches!(
        result,
        Err(DependencyError::ConstructionFailure { .. })
    ));

    injector
        .register("greeting", Producer::value(String::from("hello")))
        .await?;
    assert!(injector.is_resolved("greeting"));
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_named_factory_reads_other_entries() {
    let injector = Arc::new(AsyncInjector::new());
    injector
        .set("port", Producer::value(5432_u16), true, args![])
        .await
        .unwrap();

    let registry = Arc::downgrade(&injector);
    injector
        .set(
            "dsn",
            Producer::function(Some("Dsn"), move |_| {
                let injector = registry.upgrade().ok_or("注入器已释放")?;
                // 构造函数是同步的，在工作线程上阻塞等待另一个依赖
                let port = tokio::task::block_in_place(|| {
                    tokio::runtime::Handle::current()
                        .block_on(injector.get_as::<u16>("port", args![]))
                })?;
                Ok(Instance::plain(format!("postgres://localhost:{}", port)))
            }),
            true,
            args![],
        )
        .await
        .unwrap();

    let worker = Arc::clone(&injector);
    let dsn = tokio::spawn(async move { worker.get_as::<String>("dsn", args![]).await })
        .await
        .unwrap()
        .unwrap();

    assert_eq!(dsn.as_str(), "postgres://localhost:5432");
    assert!(injector.is_resolved("port"));
    assert!(injector.is_resolved("dsn"));
}

#[tokio::test]
async fn test_duplicate_key_reported_before_absent_producer() {
    let injector = AsyncInjector::new();
    injector
        .set("cfg", Producer::value(1_u32), true, args![])
        .await
        .unwrap();

    assert!(matches!(
        injector
            .set("cfg", None::<Producer<dyn AsyncInjection>>, true, args![])
            .await,
        Err(DependencyError::AlreadyRegistered { .. })
    ));
}
