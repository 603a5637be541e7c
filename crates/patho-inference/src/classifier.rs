//! 分类模型接口
//!
//! 模型被视为不透明函数：输入影像字节，输出类别概率。
//! 任何后端（远程推理服务、离线夹具）都只负责产出原始概率，
//! 标签判定与文本渲染统一由 [`crate::decision`] 完成。

use async_trait::async_trait;
use patho_core::Result;
use serde::{Deserialize, Serialize};

/// 模型原始输出
///
/// 一个值表示阳性类概率；两个值表示 `[非癌, 癌]` 的类别概率。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierOutput {
    pub probabilities: Vec<f64>,
}

impl ClassifierOutput {
    pub fn new(probabilities: Vec<f64>) -> Self {
        Self { probabilities }
    }
}

/// 分类模型接口
#[async_trait]
pub trait Classifier: Send + Sync {
    /// 后端名称，用于日志
    fn name(&self) -> &str;

    /// 对影像内容打分
    ///
    /// 失败统一返回 `PathoError::PredictionUnavailable`。
    async fn score(&self, content: &[u8]) -> Result<ClassifierOutput>;
}
