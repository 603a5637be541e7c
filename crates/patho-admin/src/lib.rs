//! # PathoDx管理模块
//!
//! 运维相关功能：分层配置与校验、日志初始化、Prometheus指标。

pub mod config;
pub mod logging;
pub mod metrics;

pub use config::{ConfigValidator, LogFormat, LoggingConfig, PathoConfig, ServerConfig};
pub use logging::init_logging;
pub use metrics::PathoMetrics;
