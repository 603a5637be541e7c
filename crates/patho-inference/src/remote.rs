//! 远程推理服务客户端

use crate::classifier::{Classifier, ClassifierOutput};
use async_trait::async_trait;
use patho_core::{PathoError, Result};
use std::time::Duration;
use tracing::{debug, warn};

/// 通过HTTP调用的远程分类模型
///
/// 请求体为影像原始字节，响应体为 `{"probabilities": [...]}`。
#[derive(Debug, Clone)]
pub struct RemoteClassifier {
    client: reqwest::Client,
    endpoint: String,
}

impl RemoteClassifier {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| PathoError::Config(format!("failed to build inference client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Classifier for RemoteClassifier {
    fn name(&self) -> &str {
        "remote"
    }

    async fn score(&self, content: &[u8]) -> Result<ClassifierOutput> {
        debug!("Submitting {} bytes to {}", content.len(), self.endpoint);

        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(content.to_vec())
            .send()
            .await
            .map_err(|e| {
                warn!("Inference endpoint {} unreachable: {}", self.endpoint, e);
                PathoError::PredictionUnavailable(format!("inference request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Inference endpoint {} answered {}", self.endpoint, status);
            return Err(PathoError::PredictionUnavailable(format!(
                "inference service answered {}",
                status
            )));
        }

        response
            .json::<ClassifierOutput>()
            .await
            .map_err(|e| PathoError::PredictionUnavailable(format!("malformed inference response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use std::net::SocketAddr;

    async fn spawn_stub(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    #[tokio::test]
    async fn test_remote_scores() {
        let app = Router::new().route(
            "/predict",
            post(|body: axum::body::Bytes| async move {
                assert_eq!(&body[..], b"pixels");
                Json(serde_json::json!({ "probabilities": [0.3587392568588257, 0.6412607431411743] }))
            }),
        );
        let addr = spawn_stub(app).await;

        let classifier = RemoteClassifier::new(&format!("http://{}/predict", addr), None).unwrap();
        let output = classifier.score(b"pixels").await.unwrap();
        assert_eq!(output.probabilities, vec![0.3587392568588257, 0.6412607431411743]);
    }

    #[tokio::test]
    async fn test_remote_error_status() {
        let app = Router::new().route("/predict", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
        let addr = spawn_stub(app).await;

        let classifier = RemoteClassifier::new(&format!("http://{}/predict", addr), None).unwrap();
        let err = classifier.score(b"pixels").await.unwrap_err();
        assert!(matches!(err, PathoError::PredictionUnavailable(_)));
    }

    #[tokio::test]
    async fn test_remote_malformed_body() {
        let app = Router::new().route("/predict", post(|| async { "label=1" }));
        let addr = spawn_stub(app).await;

        let classifier = RemoteClassifier::new(&format!("http://{}/predict", addr), None).unwrap();
        let err = classifier.score(b"pixels").await.unwrap_err();
        assert!(matches!(err, PathoError::PredictionUnavailable(_)));
    }

    #[tokio::test]
    async fn test_remote_timeout() {
        let app = Router::new().route(
            "/predict",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!({ "probabilities": [0.9] }))
            }),
        );
        let addr = spawn_stub(app).await;

        let classifier =
            RemoteClassifier::new(&format!("http://{}/predict", addr), Some(Duration::from_millis(100))).unwrap();
        let err = classifier.score(b"pixels").await.unwrap_err();
        assert!(matches!(err, PathoError::PredictionUnavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let classifier = RemoteClassifier::new(&format!("http://{}/predict", addr), None).unwrap();
        let err = classifier.score(b"pixels").await.unwrap_err();
        assert!(matches!(err, PathoError::PredictionUnavailable(_)));
    }
}
