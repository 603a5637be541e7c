//! 影像接收
//!
//! 上传流程：校验内容 → 写入对象存储（新键）→ 原子插入影像记录。
//! 记录只在内容写完后才插入，因此并发读取永远看不到半成品；
//! 插入失败时清理刚写入的对象。

use bytes::Bytes;
use patho_core::utils::{detect_image, generate_storage_key, sha256_hex};
use patho_core::{Image, ImageId, PathoError, PatientId, Result};
use patho_database::{DatabasePool, DatabaseQueries, NewImage};
use patho_storage::StorageManager;
use tracing::{debug, info, warn};

/// 默认单个上传上限：20MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// 影像接收服务
#[derive(Debug, Clone)]
pub struct ImageIngestion {
    db: DatabasePool,
    storage: StorageManager,
    max_upload_bytes: usize,
}

impl ImageIngestion {
    pub fn new(db: DatabasePool, storage: StorageManager) -> Self {
        Self {
            db,
            storage,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }

    /// 存储一次上传，每次调用都生成新的影像记录
    pub async fn store_image(&self, patient_id: PatientId, file_name: &str, content: Bytes) -> Result<ImageId> {
        if content.len() > self.max_upload_bytes {
            return Err(PathoError::Validation(format!(
                "image of {} bytes exceeds the {} byte upload limit",
                content.len(),
                self.max_upload_bytes
            )));
        }

        let detected = detect_image(&content)?;
        let queries = DatabaseQueries::new(&self.db);

        // 提前失败，避免为不存在的患者写入内容；真正的约束在插入语句中
        if queries.get_patient_by_id(patient_id).await?.is_none() {
            return Err(PathoError::not_found("patient", patient_id));
        }

        let storage_key = generate_storage_key(patient_id, file_name);
        let new_image = NewImage {
            patient_id,
            file_name: file_name.to_string(),
            storage_key: storage_key.clone(),
            content_type: detected.content_type.to_string(),
            size_bytes: content.len() as i64,
            sha256: sha256_hex(&content),
            width: detected.width,
            height: detected.height,
        };

        self.storage.store_file(&storage_key, content).await?;

        match queries.create_image(&new_image).await {
            Ok(id) => {
                info!(
                    "Stored image {} ({}, {}x{}) for patient {}",
                    id, new_image.content_type, new_image.width, new_image.height, patient_id
                );
                Ok(id)
            }
            Err(e) => {
                if let Err(cleanup) = self.storage.delete_file(&storage_key).await {
                    warn!("Failed to remove orphaned object {}: {}", storage_key, cleanup);
                }
                Err(e)
            }
        }
    }

    /// 获取影像元数据
    pub async fn get_image(&self, image_id: ImageId) -> Result<Image> {
        DatabaseQueries::new(&self.db)
            .get_image_by_id(image_id)
            .await?
            .ok_or_else(|| PathoError::not_found("image", image_id))
    }

    /// 读取影像内容，并与入库时的摘要比对
    pub async fn load_content(&self, image_id: ImageId) -> Result<(Image, Bytes)> {
        let image = self.get_image(image_id).await?;
        let content = self.read_object(&image).await?;

        if sha256_hex(&content) != image.sha256 {
            return Err(PathoError::Storage(format!(
                "stored content of image {} does not match its recorded digest",
                image_id
            )));
        }

        debug!("Loaded {} bytes for image {}", content.len(), image_id);
        Ok((image, content))
    }

    /// 对象读取失败时重查记录：记录已被并发删除则按不存在处理
    async fn read_object(&self, image: &Image) -> Result<Bytes> {
        match self.storage.get_file(&image.storage_key).await {
            Ok(content) => Ok(content),
            Err(e) => {
                if DatabaseQueries::new(&self.db).get_image_by_id(image.id).await?.is_none() {
                    return Err(PathoError::not_found("image", image.id));
                }
                Err(e)
            }
        }
    }

    /// 列出患者的所有影像
    pub async fn list_images_for_patient(&self, patient_id: PatientId) -> Result<Vec<Image>> {
        let queries = DatabaseQueries::new(&self.db);
        if queries.get_patient_by_id(patient_id).await?.is_none() {
            return Err(PathoError::not_found("patient", patient_id));
        }
        queries.get_images_by_patient_id(patient_id).await
    }

    /// 删除影像：仍被报告引用时拒绝；先删记录再删内容
    pub async fn delete_image(&self, image_id: ImageId) -> Result<()> {
        let image = self.get_image(image_id).await?;
        DatabaseQueries::new(&self.db).delete_image(image_id).await?;

        if let Err(e) = self.storage.delete_file(&image.storage_key).await {
            warn!("Image {} removed but its object {} remains: {}", image_id, image.storage_key, e);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[tokio::test]
    async fn test_store_and_load_round_trip() {
        let ctx = TestContext::new().await;
        let content = png_bytes(8, 6, [10, 200, 30]);

        let id = ctx
            .ingestion
            .store_image(ctx.patient_id, "healthy.png", content.clone())
            .await
            .unwrap();

        let (image, loaded) = ctx.ingestion.load_content(id).await.unwrap();
        assert_eq!(loaded, content);
        assert_eq!(image.file_name, "healthy.png");
        assert_eq!(image.content_type, "image/png");
        assert_eq!((image.width, image.height), (8, 6));
        assert_eq!(image.size_bytes as usize, content.len());
    }

    #[tokio::test]
    async fn test_identical_uploads_are_distinct() {
        let ctx = TestContext::new().await;
        let content = png_bytes(4, 4, [1, 2, 3]);

        let first = ctx.ingestion.store_image(ctx.patient_id, "a.png", content.clone()).await.unwrap();
        let second = ctx.ingestion.store_image(ctx.patient_id, "a.png", content).await.unwrap();
        assert_ne!(first, second);

        let a = ctx.ingestion.get_image(first).await.unwrap();
        let b = ctx.ingestion.get_image(second).await.unwrap();
        assert_ne!(a.storage_key, b.storage_key);
        assert_eq!(a.sha256, b.sha256);
        assert_eq!(ctx.ingestion.list_images_for_patient(ctx.patient_id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_rejects_invalid_content() {
        let ctx = TestContext::new().await;

        let err = ctx.ingestion.store_image(ctx.patient_id, "empty.png", Bytes::new()).await.unwrap_err();
        assert!(matches!(err, PathoError::Validation(_)));

        // 文件名不可信，内容不是影像
        let err = ctx
            .ingestion
            .store_image(ctx.patient_id, "fake.png", Bytes::from_static(b"GIF? no, plain text"))
            .await
            .unwrap_err();
        assert!(matches!(err, PathoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_upload_limit() {
        let ctx = TestContext::new().await;
        let ingestion = ctx.ingestion.clone().with_max_upload_bytes(16);

        let err = ingestion
            .store_image(ctx.patient_id, "big.png", png_bytes(8, 8, [0, 0, 0]))
            .await
            .unwrap_err();
        assert!(matches!(err, PathoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_unknown_patient() {
        let ctx = TestContext::new().await;
        let err = ctx
            .ingestion
            .store_image(999, "healthy.png", png_bytes(2, 2, [0, 0, 0]))
            .await
            .unwrap_err();
        assert!(matches!(err, PathoError::NotFound(_)));

        let err = ctx.ingestion.list_images_for_patient(999).await.unwrap_err();
        assert!(matches!(err, PathoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_image() {
        let ctx = TestContext::new().await;
        let id = ctx
            .ingestion
            .store_image(ctx.patient_id, "a.png", png_bytes(2, 2, [9, 9, 9]))
            .await
            .unwrap();
        let key = ctx.ingestion.get_image(id).await.unwrap().storage_key;

        ctx.ingestion.delete_image(id).await.unwrap();
        assert!(matches!(ctx.ingestion.get_image(id).await, Err(PathoError::NotFound(_))));
        assert!(ctx.storage.get_file(&key).await.is_err());

        let err = ctx.ingestion.delete_image(id).await.unwrap_err();
        assert!(matches!(err, PathoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_tampered_content_is_detected() {
        let ctx = TestContext::new().await;
        let id = ctx
            .ingestion
            .store_image(ctx.patient_id, "a.png", png_bytes(2, 2, [5, 5, 5]))
            .await
            .unwrap();
        let key = ctx.ingestion.get_image(id).await.unwrap().storage_key;

        ctx.storage.store_file(&key, Bytes::from_static(b"overwritten")).await.unwrap();
        let err = ctx.ingestion.load_content(id).await.unwrap_err();
        assert!(matches!(err, PathoError::Storage(_)));
    }

    #[tokio::test]
    async fn test_failed_insert_removes_object() {
        let ctx = TestContext::new().await;
        sqlx::query("DROP TABLE images").execute(ctx.db.pool()).await.unwrap();

        let err = ctx
            .ingestion
            .store_image(ctx.patient_id, "healthy.png", png_bytes(2, 2, [7, 7, 7]))
            .await
            .unwrap_err();
        assert!(matches!(err, PathoError::Database(_)));

        let prefix = format!("images/patient-{}", ctx.patient_id);
        assert!(ctx.storage.list_files(&prefix).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_content_of_concurrently_deleted_image() {
        let ctx = TestContext::new().await;
        let id = ctx
            .ingestion
            .store_image(ctx.patient_id, "a.png", png_bytes(2, 2, [3, 3, 3]))
            .await
            .unwrap();
        let image = ctx.ingestion.get_image(id).await.unwrap();

        ctx.ingestion.delete_image(id).await.unwrap();
        let err = ctx.ingestion.read_object(&image).await.unwrap_err();
        assert!(matches!(err, PathoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_missing_object_with_live_record() {
        let ctx = TestContext::new().await;
        let id = ctx
            .ingestion
            .store_image(ctx.patient_id, "a.png", png_bytes(2, 2, [4, 4, 4]))
            .await
            .unwrap();
        let key = ctx.ingestion.get_image(id).await.unwrap().storage_key;

        ctx.storage.delete_file(&key).await.unwrap();
        let err = ctx.ingestion.load_content(id).await.unwrap_err();
        assert!(matches!(err, PathoError::Storage(_)));
    }
}
