//! 核心数据模型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 医生标识
pub type DoctorId = i64;
/// 患者标识
pub type PatientId = i64;
/// 影像标识
pub type ImageId = i64;
/// 报告标识
pub type ReportId = i64;

/// 医生信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: DoctorId,
    pub national_id: String, // 身份证件号，全局唯一
    pub name: String,
    pub specialty: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 患者信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub national_id: String,
    pub name: String,
    pub age: i32,
    pub scheduled_visit: Option<String>, // 预约就诊（自由文本）
    pub doctor_id: DoctorId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 组织影像记录
///
/// 内容本身保存在对象存储中，记录只持有存储键与摘要。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: ImageId,
    pub patient_id: PatientId,
    pub file_name: String,    // 上传时的原始文件名
    pub storage_key: String,  // 对象存储中的路径
    pub content_type: String, // 通过魔数识别的MIME类型
    pub size_bytes: i64,
    pub sha256: String,
    pub width: u32,
    pub height: u32,
    pub created_at: DateTime<Utc>,
}

/// 诊断报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub prediction: String,
    pub content: String,
    pub image_id: ImageId,
    pub created_at: DateTime<Utc>,
}

/// 分类标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PredictionLabel {
    NotCancer,
    Cancer,
}

impl PredictionLabel {
    /// 模型输出中的类别编号
    pub fn class_index(&self) -> u8 {
        match self {
            PredictionLabel::NotCancer => 0,
            PredictionLabel::Cancer => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionLabel::NotCancer => "not_cancer",
            PredictionLabel::Cancer => "cancer",
        }
    }
}

/// 预测结果
///
/// `Display` 的输出是对外契约，下游客户端按字面子串匹配，不可改动格式
/// （包括 "Not cancer" 分支中逗号后的两个空格）。
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub label: PredictionLabel,
    pub score: f64,
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            PredictionLabel::NotCancer => write!(f, "Not cancer (label 0),  score: {}", self.score),
            PredictionLabel::Cancer => write!(f, "Cancer (label 1), score: {}", self.score),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_cancer_rendering() {
        let result = PredictionResult {
            label: PredictionLabel::NotCancer,
            score: 0.984481368213892,
        };
        assert_eq!(result.to_string(), "Not cancer (label 0),  score: 0.984481368213892");
    }

    #[test]
    fn test_cancer_rendering() {
        let result = PredictionResult {
            label: PredictionLabel::Cancer,
            score: 0.6412607431411743,
        };
        assert_eq!(result.to_string(), "Cancer (label 1), score: 0.6412607431411743");
    }

    #[test]
    fn test_label_serialization() {
        let json = serde_json::to_string(&PredictionLabel::NotCancer).unwrap();
        assert_eq!(json, "\"NOT_CANCER\"");
        assert_eq!(PredictionLabel::Cancer.class_index(), 1);
    }
}
