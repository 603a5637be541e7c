//! 离线夹具分类器
//!
//! 按内容的SHA-256摘要查表返回预先记录的模型输出，输出完全确定，
//! 适合离线演示与集成测试。未登记的内容视为模型不可用。

use crate::classifier::{Classifier, ClassifierOutput};
use async_trait::async_trait;
use patho_core::utils::sha256_hex;
use patho_core::{PathoError, Result};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

/// 夹具分类器
#[derive(Debug, Clone, Default)]
pub struct FixtureClassifier {
    by_digest: HashMap<String, Vec<f64>>,
}

impl FixtureClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从JSON文件加载，格式为 `{"<sha256>": [p_not_cancer, p_cancer], ...}`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let by_digest: HashMap<String, Vec<f64>> = serde_json::from_str(&raw)?;

        info!("Loaded {} classifier fixtures from {}", by_digest.len(), path.display());
        Ok(Self { by_digest })
    }

    /// 登记一份内容的模型输出
    pub fn with_content(mut self, content: &[u8], probabilities: Vec<f64>) -> Self {
        self.by_digest.insert(sha256_hex(content), probabilities);
        self
    }

    pub fn len(&self) -> usize {
        self.by_digest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_digest.is_empty()
    }
}

#[async_trait]
impl Classifier for FixtureClassifier {
    fn name(&self) -> &str {
        "fixtures"
    }

    async fn score(&self, content: &[u8]) -> Result<ClassifierOutput> {
        let digest = sha256_hex(content);
        self.by_digest
            .get(&digest)
            .map(|probabilities| ClassifierOutput::new(probabilities.clone()))
            .ok_or_else(|| PathoError::PredictionUnavailable(format!("no fixture registered for content {}", digest)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_lookup_by_content() {
        let classifier = FixtureClassifier::new().with_content(b"healthy", vec![0.9, 0.1]);

        let output = classifier.score(b"healthy").await.unwrap();
        assert_eq!(output.probabilities, vec![0.9, 0.1]);

        let err = classifier.score(b"unknown").await.unwrap_err();
        assert!(matches!(err, PathoError::PredictionUnavailable(_)));
    }

    #[tokio::test]
    async fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"{}\": [0.25, 0.75]}}", sha256_hex(b"scan")).unwrap();

        let classifier = FixtureClassifier::from_file(file.path()).unwrap();
        assert_eq!(classifier.len(), 1);
        let output = classifier.score(b"scan").await.unwrap();
        assert_eq!(output.probabilities, vec![0.25, 0.75]);
    }

    #[test]
    fn test_from_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(matches!(FixtureClassifier::from_file(file.path()), Err(PathoError::Serialization(_))));
    }
}
