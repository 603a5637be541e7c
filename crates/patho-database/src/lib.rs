//! # PathoDx数据库模块
//!
//! 医生、患者、影像、报告四类实体的持久化与引用完整性约束，基于SQLite连接池。

pub mod connection;
pub mod models;
pub mod queries;

// 重新导出主要类型
pub use connection::{DatabaseConfig, DatabasePool};
pub use models::*;
pub use queries::DatabaseQueries;
