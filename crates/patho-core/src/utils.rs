//! 通用工具函数

use crate::error::{PathoError, Result};
use crate::models::PatientId;
use image::ImageFormat;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use uuid::Uuid;

/// 通过魔数识别出的影像编码
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedImage {
    pub content_type: &'static str,
    pub width: u32,
    pub height: u32,
}

/// 计算内容的SHA-256摘要（十六进制小写）
pub fn sha256_hex(data: &[u8]) -> String {
    let digest = Sha256::digest(data);
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// 识别影像编码并读取像素尺寸
///
/// 只看内容的魔数，不信任文件名；头部必须能解码出尺寸。
pub fn detect_image(data: &[u8]) -> Result<DetectedImage> {
    if data.is_empty() {
        return Err(PathoError::Validation("image content is empty".to_string()));
    }

    let format = image::guess_format(data)
        .map_err(|_| PathoError::Validation("content is not a recognised image encoding".to_string()))?;

    let content_type = match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Tiff => "image/tiff",
        other => {
            return Err(PathoError::Validation(format!(
                "unsupported image encoding: {:?}",
                other
            )))
        }
    };

    let (width, height) = image::io::Reader::with_format(Cursor::new(data), format)
        .into_dimensions()
        .map_err(|e| PathoError::Validation(format!("malformed {} content: {}", content_type, e)))?;

    Ok(DetectedImage {
        content_type,
        width,
        height,
    })
}

/// 生成对象存储键
///
/// 每次上传都生成新键，已写入的对象永远不会被覆盖。
pub fn generate_storage_key(patient_id: PatientId, file_name: &str) -> String {
    format!(
        "images/patient-{}/{}-{}",
        patient_id,
        Uuid::new_v4().simple(),
        sanitize_file_name(file_name)
    )
}

/// 清理文件名，只保留安全字符
pub fn sanitize_file_name(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' { c } else { '_' })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}
