//! 错误定义模块

use thiserror::Error;

/// 诊断流水线统一错误类型
///
/// 前五个变体是流水线对外暴露的错误种类，由传输层映射为状态码；
/// 其余变体表示基础设施故障。
#[derive(Error, Debug)]
pub enum PathoError {
    #[error("验证错误: {0}")]
    Validation(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("唯一性冲突: {0}")]
    Conflict(String),

    #[error("预测服务不可用: {0}")]
    PredictionUnavailable(String),

    #[error("引用完整性错误: {0}")]
    Integrity(String),

    #[error("数据库错误: {0}")]
    Database(String),

    #[error("存储错误: {0}")]
    Storage(String),

    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("系统内部错误: {0}")]
    Internal(String),
}

impl PathoError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        PathoError::NotFound(format!("{} {} does not exist", entity, id))
    }

    /// 错误种类的稳定名称，用于日志与指标标签
    pub fn kind(&self) -> &'static str {
        match self {
            PathoError::Validation(_) => "validation",
            PathoError::NotFound(_) => "not_found",
            PathoError::Conflict(_) => "conflict",
            PathoError::PredictionUnavailable(_) => "prediction_unavailable",
            PathoError::Integrity(_) => "integrity",
            PathoError::Database(_) => "database",
            PathoError::Storage(_) => "storage",
            PathoError::Config(_) => "config",
            PathoError::Io(_) => "io",
            PathoError::Serialization(_) => "serialization",
            PathoError::Internal(_) => "internal",
        }
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for PathoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                PathoError::Conflict(db_err.message().to_string())
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                PathoError::Integrity(db_err.message().to_string())
            }
            _ => PathoError::Database(err.to_string()),
        }
    }
}

/// 诊断流水线统一结果类型
pub type Result<T> = std::result::Result<T, PathoError>;
