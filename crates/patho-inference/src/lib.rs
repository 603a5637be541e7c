//! # PathoDx推理模块
//!
//! 癌症分类模型的接入层：模型接口、远程与离线后端、决策阈值。

pub mod classifier;
pub mod decision;
pub mod fixtures;
pub mod remote;

pub use classifier::{Classifier, ClassifierOutput};
pub use decision::{DecisionThreshold, DEFAULT_THRESHOLD};
pub use fixtures::FixtureClassifier;
pub use remote::RemoteClassifier;

use patho_core::{PathoError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// 分类模型后端
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    Remote,
    Fixtures,
}

/// 推理配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    pub backend: ClassifierBackend,
    /// 远程推理服务地址
    pub endpoint: Option<String>,
    /// 单次推理超时（毫秒），0 表示不限
    pub timeout_ms: u64,
    pub decision_threshold: f64,
    /// 夹具文件路径
    pub fixtures_path: Option<String>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Remote,
            endpoint: Some("http://127.0.0.1:5000/predict".to_string()),
            timeout_ms: 30_000,
            decision_threshold: DEFAULT_THRESHOLD,
            fixtures_path: None,
        }
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

/// 按配置构建分类模型
pub fn build_classifier(config: &InferenceConfig) -> Result<Arc<dyn Classifier>> {
    match config.backend {
        ClassifierBackend::Remote => {
            let endpoint = config
                .endpoint
                .as_deref()
                .ok_or_else(|| PathoError::Config("inference.endpoint is required for the remote backend".to_string()))?;
            Ok(Arc::new(RemoteClassifier::new(endpoint, config.timeout())?))
        }
        ClassifierBackend::Fixtures => {
            let path = config
                .fixtures_path
                .as_deref()
                .ok_or_else(|| PathoError::Config("inference.fixtures_path is required for the fixtures backend".to_string()))?;
            Ok(Arc::new(FixtureClassifier::from_file(path)?))
        }
    }
}
