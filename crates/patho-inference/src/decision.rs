//! 决策阈值：将模型原始输出映射为二分类标签

use crate::classifier::ClassifierOutput;
use patho_core::{PathoError, PredictionLabel, PredictionResult, Result};

/// 默认决策阈值
pub const DEFAULT_THRESHOLD: f64 = 0.5;

/// 决策阈值
///
/// 阳性类概率大于等于阈值时判为癌；分数取所判类别的概率。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionThreshold(f64);

impl Default for DecisionThreshold {
    fn default() -> Self {
        Self(DEFAULT_THRESHOLD)
    }
}

impl DecisionThreshold {
    pub fn new(threshold: f64) -> Result<Self> {
        if threshold.is_finite() && threshold > 0.0 && threshold < 1.0 {
            Ok(Self(threshold))
        } else {
            Err(PathoError::Config(format!(
                "decision threshold must lie strictly between 0 and 1, got {}",
                threshold
            )))
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// 解释模型输出
    pub fn interpret(&self, output: &ClassifierOutput) -> Result<PredictionResult> {
        let probabilities = &output.probabilities;

        if let Some(bad) = probabilities.iter().find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0) {
            return Err(PathoError::PredictionUnavailable(format!(
                "classifier returned a probability outside [0, 1]: {}",
                bad
            )));
        }

        let result = match probabilities.as_slice() {
            [positive] => {
                if *positive >= self.0 {
                    PredictionResult { label: PredictionLabel::Cancer, score: *positive }
                } else {
                    PredictionResult { label: PredictionLabel::NotCancer, score: 1.0 - *positive }
                }
            }
            [negative, positive] => {
                if *positive >= self.0 {
                    PredictionResult { label: PredictionLabel::Cancer, score: *positive }
                } else {
                    PredictionResult { label: PredictionLabel::NotCancer, score: *negative }
                }
            }
            other => {
                return Err(PathoError::PredictionUnavailable(format!(
                    "classifier returned {} values, expected 1 or 2",
                    other.len()
                )))
            }
        };

        Ok(result)
    }
}
