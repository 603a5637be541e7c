//! # PathoDx
//!
//! 病理影像诊断流水线：影像上传、癌症分类预测与诊断报告。
//!
//! 各子模块按职责拆分为独立的crate，这里统一重新导出。

pub use patho_core as core;
pub use patho_database as database;
pub use patho_inference as inference;
pub use patho_storage as storage;
pub use patho_workflow as workflow;

pub use patho_core::{PathoError, PredictionLabel, PredictionResult, Result};
pub use patho_workflow::{Pipeline, PipelineOptions};
