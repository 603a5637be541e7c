//! 影像内容存储管理

use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use patho_core::{PathoError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// 存储后端类型
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Local,
    Memory,
    S3,
}

/// S3 对象存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub endpoint: Option<String>,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageType,
    /// 本地存储根目录
    pub root_path: String,
    pub s3: Option<S3Config>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageType::Local,
            root_path: "./data/images".to_string(),
            s3: None,
        }
    }
}

/// 影像内容存储管理器
///
/// 只提供写入、读取、删除；同一个键不会被写入两次。
#[derive(Clone)]
pub struct StorageManager {
    store: Arc<dyn ObjectStore>,
    backend: StorageType,
}

impl std::fmt::Debug for StorageManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageManager")
            .field("backend", &self.backend)
            .finish()
    }
}

impl StorageManager {
    /// 根据配置创建存储管理器
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let store: Arc<dyn ObjectStore> = match config.backend {
            StorageType::Local => {
                std::fs::create_dir_all(&config.root_path)?;
                let fs = LocalFileSystem::new_with_prefix(&config.root_path)
                    .map_err(|e| PathoError::Storage(e.to_string()))?;
                Arc::new(fs)
            }
            StorageType::Memory => Arc::new(InMemory::new()),
            StorageType::S3 => {
                let s3 = config
                    .s3
                    .as_ref()
                    .ok_or_else(|| PathoError::Config("storage.s3 section is required for the s3 backend".to_string()))?;
                let mut builder = AmazonS3Builder::new()
                    .with_bucket_name(&s3.bucket)
                    .with_region(&s3.region)
                    .with_access_key_id(&s3.access_key)
                    .with_secret_access_key(&s3.secret_key);
                if let Some(endpoint) = &s3.endpoint {
                    builder = builder.with_endpoint(endpoint).with_allow_http(true);
                }
                Arc::new(builder.build().map_err(|e| PathoError::Storage(e.to_string()))?)
            }
        };

        info!("Image storage initialised with {:?} backend", config.backend);
        Ok(Self {
            store,
            backend: config.backend.clone(),
        })
    }

    /// 内存存储，用于测试
    pub fn in_memory() -> Self {
        Self {
            store: Arc::new(InMemory::new()),
            backend: StorageType::Memory,
        }
    }

    pub fn backend(&self) -> &StorageType {
        &self.backend
    }

    /// 存储影像内容
    pub async fn store_file(&self, key: &str, data: Bytes) -> Result<()> {
        let location = Self::location(key)?;
        let size = data.len();
        self.store
            .put(&location, data)
            .await
            .map_err(|e| PathoError::Storage(format!("failed to write {}: {}", key, e)))?;

        debug!("Stored {} bytes at {}", size, key);
        Ok(())
    }

    /// 获取影像内容
    pub async fn get_file(&self, key: &str) -> Result<Bytes> {
        let location = Self::location(key)?;
        let result = self.store.get(&location).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => {
                PathoError::Storage(format!("stored content missing for {}", key))
            }
            other => PathoError::Storage(format!("failed to read {}: {}", key, other)),
        })?;

        result
            .bytes()
            .await
            .map_err(|e| PathoError::Storage(format!("failed to read {}: {}", key, e)))
    }

    /// 删除影像内容
    pub async fn delete_file(&self, key: &str) -> Result<()> {
        let location = Self::location(key)?;
        self.store
            .delete(&location)
            .await
            .map_err(|e| PathoError::Storage(format!("failed to delete {}: {}", key, e)))?;

        debug!("Deleted stored object {}", key);
        Ok(())
    }

    /// 列出前缀下的对象键
    pub async fn list_files(&self, prefix: &str) -> Result<Vec<String>> {
        let location = Self::location(prefix)?;
        let listing = self
            .store
            .list_with_delimiter(Some(&location))
            .await
            .map_err(|e| PathoError::Storage(format!("failed to list {}: {}", prefix, e)))?;

        Ok(listing.objects.into_iter().map(|meta| meta.location.to_string()).collect())
    }

    fn location(key: &str) -> Result<ObjectPath> {
        ObjectPath::parse(key).map_err(|e| PathoError::Storage(format!("invalid storage key {}: {}", key, e)))
    }
}
