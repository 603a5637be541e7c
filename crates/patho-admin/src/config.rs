//! 配置管理
//!
//! 分层加载：内置默认值 → 可选配置文件 → `PATHO__` 前缀的环境变量，
//! 加载完成后统一校验。

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use patho_database::DatabaseConfig;
use patho_inference::{ClassifierBackend, InferenceConfig};
use patho_storage::{StorageConfig, StorageType};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// PathoDx完整配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PathoConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 数据库配置
    pub database: DatabaseConfig,
    /// 影像存储配置
    pub storage: StorageConfig,
    /// 推理配置
    pub inference: InferenceConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听主机
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 单个影像上传上限（字节）
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

/// 日志输出格式
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别或过滤指令，`RUST_LOG` 优先
    pub level: String,
    pub format: LogFormat,
    /// 日志文件路径，未设置时输出到标准输出
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
            file_path: None,
        }
    }
}

impl PathoConfig {
    /// 加载配置；指定的配置文件必须存在
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let defaults = Config::try_from(&PathoConfig::default()).context("Failed to build default configuration")?;
        let mut builder = Config::builder().add_source(defaults);

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        let settings = builder
            .add_source(Environment::with_prefix("PATHO").separator("__").try_parsing(true))
            .build()
            .context("Failed to load configuration")?;

        let config: PathoConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        ConfigValidator::new().validate(&config)?;

        match config_path {
            Some(path) => info!("Configuration loaded successfully from: {}", path),
            None => info!("Configuration loaded from defaults and environment"),
        }
        Ok(config)
    }
}

/// 配置验证器
#[derive(Debug)]
pub struct ConfigValidator {
    /// 验证规则
    validation_rules: Vec<ValidationRule>,
}

/// 验证规则
#[derive(Debug)]
struct ValidationRule {
    /// 字段路径
    field_path: &'static str,
    /// 验证函数
    validator: fn(&PathoConfig) -> Result<()>,
    /// 错误消息
    error_message: &'static str,
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator {
    pub fn new() -> Self {
        let validation_rules = vec![
            ValidationRule {
                field_path: "server.port",
                validator: |config| {
                    if config.server.port == 0 {
                        Err(anyhow::anyhow!("Server port cannot be 0"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid server port",
            },
            ValidationRule {
                field_path: "server.max_upload_bytes",
                validator: |config| {
                    if config.server.max_upload_bytes == 0 {
                        Err(anyhow::anyhow!("Upload limit cannot be 0"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid upload limit",
            },
            ValidationRule {
                field_path: "database.max_connections",
                validator: |config| {
                    if config.database.max_connections == 0 {
                        Err(anyhow::anyhow!("Database max connections cannot be 0"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid database max connections",
            },
            ValidationRule {
                field_path: "storage.s3",
                validator: |config| {
                    if config.storage.backend == StorageType::S3 && config.storage.s3.is_none() {
                        Err(anyhow::anyhow!("S3 backend requires an [storage.s3] section"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid storage configuration",
            },
            ValidationRule {
                field_path: "inference.decision_threshold",
                validator: |config| {
                    let threshold = config.inference.decision_threshold;
                    if threshold > 0.0 && threshold < 1.0 {
                        Ok(())
                    } else {
                        Err(anyhow::anyhow!("Decision threshold must lie strictly between 0 and 1, got {}", threshold))
                    }
                },
                error_message: "Invalid decision threshold",
            },
            ValidationRule {
                field_path: "inference.endpoint",
                validator: |config| match (&config.inference.backend, config.inference.endpoint.as_deref()) {
                    (ClassifierBackend::Remote, None) | (ClassifierBackend::Remote, Some("")) => {
                        Err(anyhow::anyhow!("Remote classifier requires an endpoint"))
                    }
                    _ => Ok(()),
                },
                error_message: "Invalid inference endpoint",
            },
            ValidationRule {
                field_path: "inference.fixtures_path",
                validator: |config| {
                    if config.inference.backend == ClassifierBackend::Fixtures && config.inference.fixtures_path.is_none() {
                        Err(anyhow::anyhow!("Fixture classifier requires a fixtures_path"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid inference fixtures path",
            },
        ];

        Self { validation_rules }
    }

    /// 验证配置
    pub fn validate(&self, config: &PathoConfig) -> Result<()> {
        for rule in &self.validation_rules {
            if let Err(e) = (rule.validator)(config) {
                error!("Configuration validation failed for {}: {}", rule.field_path, e);
                return Err(anyhow::anyhow!("{}: {}", rule.error_message, e));
            }
        }

        info!("Configuration validation passed");
        Ok(())
    }
}
