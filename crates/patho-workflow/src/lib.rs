//! # PathoDx工作流模块
//!
//! 诊断流水线的业务层，包括：
//! - 登记：医生与患者的增删改查
//! - 影像接收：校验、存储与删除上传的影像
//! - 预测：调用分类模型并解读输出
//! - 诊断：将预测结果与医生意见组装为报告

pub mod diagnosis;
pub mod ingestion;
pub mod prediction;
pub mod registry;

// 重新导出主要类型
pub use diagnosis::DiagnosisAssembler;
pub use ingestion::{ImageIngestion, DEFAULT_MAX_UPLOAD_BYTES};
pub use prediction::PredictionAdapter;
pub use registry::ClinicRegistry;

use patho_database::DatabasePool;
use patho_inference::{Classifier, DecisionThreshold};
use patho_storage::StorageManager;
use std::sync::Arc;
use std::time::Duration;

/// 流水线参数
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub threshold: DecisionThreshold,
    pub timeout: Option<Duration>,
    pub max_upload_bytes: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            threshold: DecisionThreshold::default(),
            timeout: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// 诊断流水线，各服务共享同一连接池与对象存储
#[derive(Clone)]
pub struct Pipeline {
    pub registry: ClinicRegistry,
    pub ingestion: ImageIngestion,
    pub predictor: PredictionAdapter,
    pub diagnosis: DiagnosisAssembler,
}

impl Pipeline {
    pub fn new(db: DatabasePool, storage: StorageManager, classifier: Arc<dyn Classifier>, options: PipelineOptions) -> Self {
        let registry = ClinicRegistry::new(db.clone());
        let ingestion = ImageIngestion::new(db.clone(), storage).with_max_upload_bytes(options.max_upload_bytes);
        let predictor =
            PredictionAdapter::new(ingestion.clone(), classifier, options.threshold).with_timeout(options.timeout);
        let diagnosis = DiagnosisAssembler::new(db, predictor.clone());

        Self {
            registry,
            ingestion,
            predictor,
            diagnosis,
        }
    }
}
