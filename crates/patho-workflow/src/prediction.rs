//! 预测适配器
//!
//! 读取影像内容后释放所有存储资源，再调用分类模型；调用本身无状态、不落库。

use crate::ingestion::ImageIngestion;
use patho_core::{ImageId, PathoError, PredictionResult, Result};
use patho_inference::{Classifier, DecisionThreshold};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// 预测适配器
#[derive(Clone)]
pub struct PredictionAdapter {
    ingestion: ImageIngestion,
    classifier: Arc<dyn Classifier>,
    threshold: DecisionThreshold,
    timeout: Option<Duration>,
}

impl PredictionAdapter {
    pub fn new(ingestion: ImageIngestion, classifier: Arc<dyn Classifier>, threshold: DecisionThreshold) -> Self {
        Self {
            ingestion,
            classifier,
            threshold,
            timeout: None,
        }
    }

    /// 单次模型调用的超时，超时按模型不可用处理
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn threshold(&self) -> DecisionThreshold {
        self.threshold
    }

    /// 对已存储的影像进行预测
    pub async fn predict(&self, image_id: ImageId) -> Result<PredictionResult> {
        let (_, content) = self.ingestion.load_content(image_id).await?;

        let call = self.classifier.score(&content);
        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, call).await.map_err(|_| {
                warn!("Classifier {} timed out after {:?} on image {}", self.classifier.name(), timeout, image_id);
                PathoError::PredictionUnavailable(format!("classifier timed out after {:?}", timeout))
            })??,
            None => call.await?,
        };

        let result = self.threshold.interpret(&output)?;
        info!("Image {} classified by {}: {}", image_id, self.classifier.name(), result);
        Ok(result)
    }
}
