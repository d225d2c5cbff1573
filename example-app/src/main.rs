//! # 示例应用程序
//!
//! 演示如何使用 Lorn 依赖注入器：注册普通值、互相引用的服务以及立即初始化的服务。

use async_trait::async_trait;
use clap::Parser;
use di_impl::{
    args, AsyncInjection, AsyncInjector, AsyncRegistry, AsyncRegistryExt, BoxError, Constructible,
    ConstructorArgs, Identifier, InjectorConfig, Producer,
};
use infrastructure_common::{init_logging, parse_log_level, LoggingConfig};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use tracing::{error, info};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn 依赖注入示例应用")]
struct Args {
    /// 注入器配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,

    /// 是否输出 JSON 格式日志
    #[arg(long)]
    json_logs: bool,
}

/// 应用配置，以普通值注册
#[derive(Debug)]
struct AppConfig {
    service_name: String,
    max_connections: u32,
}

/// 广告投放服务，初始化时获取竞价服务
struct CampaignService {
    bidding: OnceLock<Arc<BiddingService>>,
}

#[async_trait]
impl AsyncInjection for CampaignService {
    async fn init(&self, registry: &dyn AsyncRegistry) -> Result<(), BoxError> {
        let bidding = registry
            .get_as::<BiddingService>(
                Identifier::Producer(Producer::of::<BiddingService>()),
                args![],
            )
            .await?;
        let _ = self.bidding.set(bidding);
        info!("CampaignService 初始化完成");
        Ok(())
    }
}

impl Constructible for CampaignService {
    const NAME: &'static str = "CampaignService";

    fn construct(_args: &ConstructorArgs) -> Result<Self, BoxError> {
        Ok(Self {
            bidding: OnceLock::new(),
        })
    }
}

/// 竞价服务，初始化时反向获取投放服务
struct BiddingService {
    campaigns: OnceLock<Arc<CampaignService>>,
}

#[async_trait]
impl AsyncInjection for BiddingService {
    async fn init(&self, registry: &dyn AsyncRegistry) -> Result<(), BoxError> {
        let campaigns = registry
            .get_as::<CampaignService>(
                Identifier::Producer(Producer::of::<CampaignService>()),
                args![],
            )
            .await?;
        let _ = self.campaigns.set(campaigns);
        info!("BiddingService 初始化完成");
        Ok(())
    }
}

impl Constructible for BiddingService {
    const NAME: &'static str = "BiddingService";

    fn construct(_args: &ConstructorArgs) -> Result<Self, BoxError> {
        Ok(Self {
            campaigns: OnceLock::new(),
        })
    }
}

/// 报表服务，立即初始化
struct ReportingService {
    endpoint: String,
    config: OnceLock<Arc<AppConfig>>,
}

#[async_trait]
impl AsyncInjection for ReportingService {
    async fn init(&self, registry: &dyn AsyncRegistry) -> Result<(), BoxError> {
        let config = registry.get_as::<AppConfig>("app".into(), args![]).await?;
        info!(
            "ReportingService 连接 {} (服务: {})",
            self.endpoint, config.service_name
        );
        let _ = self.config.set(config);
        Ok(())
    }
}

impl Constructible for ReportingService {
    const NAME: &'static str = "ReportingService";

    fn construct(args: &ConstructorArgs) -> Result<Self, BoxError> {
        Ok(Self {
            endpoint: args.require::<String>(0)?.clone(),
            config: OnceLock::new(),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(
        &LoggingConfig::default()
            .with_level(parse_log_level(&args.log_level))
            .with_json_format(args.json_logs),
    )?;

    info!("启动 Lorn 依赖注入示例应用");

    let config = InjectorConfig::load(args.config.as_deref())?;
    info!("注入器配置: {:?}", config);

    let injector = AsyncInjector::with_config(config);
    if let Err(e) = run(&injector).await {
        error!("示例运行失败: {}", e);
        return Err(e.into());
    }

    info!(
        "应用结束: 已解析 {} 个, 待解析 {} 个",
        injector.resolved_count(),
        injector.pending_count()
    );
    Ok(())
}

async fn run(injector: &AsyncInjector) -> Result<(), di_impl::DependencyError> {
    injector
        .set(
            "app",
            Producer::value(AppConfig {
                service_name: "ad-serving".to_string(),
                max_connections: 64,
            }),
            true,
            args![],
        )
        .await?;

    injector
        .set(
            "reporting",
            Producer::of::<ReportingService>(),
            false,
            args![String::from("http://localhost:9090/report")],
        )
        .await?;

    let campaigns = injector
        .get_as::<CampaignService>(Producer::of::<CampaignService>(), args![])
        .await?;
    let bidding = injector
        .get_as::<BiddingService>("BiddingService", args![])
        .await?;

    let linked = campaigns
        .bidding
        .get()
        .is_some_and(|service| Arc::ptr_eq(service, &bidding));
    info!("CampaignService 与 BiddingService 互相引用: {}", linked);

    let app = injector.get_as::<AppConfig>("app", args![]).await?;
    info!(
        "应用配置: {} (最大连接数 {})",
        app.service_name, app.max_connections
    );

    let reporting = injector
        .get_as::<ReportingService>("reporting", args![])
        .await?;
    info!(
        "ReportingService 已就绪: {}",
        reporting.config.get().is_some()
    );

    Ok(())
}
