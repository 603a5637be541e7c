//! PathoDx服务器主程序

use anyhow::{Context, Result};
use clap::Parser;
use patho_admin::{init_logging, PathoConfig, PathoMetrics};
use patho_database::DatabasePool;
use patho_inference::{build_classifier, DecisionThreshold};
use patho_storage::StorageManager;
use patho_web::{AppState, WebServer};
use patho_workflow::{Pipeline, PipelineOptions};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

/// PathoDx服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "patho-server")]
#[command(about = "PathoDx 病理影像诊断服务器")]
struct Args {
    /// 服务器端口，覆盖配置文件
    #[arg(short, long)]
    port: Option<u16>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别，覆盖配置文件
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = PathoConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging)?;
    info!("启动PathoDx服务器...");
    info!("  数据库: {}", config.database.url);
    info!("  影像存储: {:?}", config.storage.backend);
    info!("  推理后端: {:?}", config.inference.backend);

    if let Err(e) = run(config).await {
        error!("服务器启动失败: {:#}", e);
        return Err(e);
    }

    Ok(())
}

async fn run(config: PathoConfig) -> Result<()> {
    let db = DatabasePool::connect(&config.database)
        .await
        .context("Failed to connect to database")?;
    let storage = StorageManager::from_config(&config.storage).context("Failed to initialise image storage")?;
    let classifier = build_classifier(&config.inference).context("Failed to initialise classifier")?;
    let threshold = DecisionThreshold::new(config.inference.decision_threshold)?;

    let options = PipelineOptions {
        threshold,
        timeout: config.inference.timeout(),
        max_upload_bytes: config.server.max_upload_bytes,
    };
    let pipeline = Pipeline::new(db.clone(), storage, classifier, options);
    let metrics = PathoMetrics::new()?;

    let state = Arc::new(AppState::new(pipeline, db, metrics, config.server.max_upload_bytes));
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", config.server.host, config.server.port))?;

    WebServer::new(addr, state).run().await
}
