//! HTTP处理器：影像、预测与诊断报告

use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json},
};
use bytes::Bytes;
use patho_core::PathoError;
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use crate::dto::{DiagnoseRequest, ImagenDto, InformeDto, PacienteRef, PredictionResponse};
use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::server::AppState;

/// 健康检查处理器
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, database) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "up"),
        Err(_) => (StatusCode::SERVICE_UNAVAILABLE, "down"),
    };

    let body = Json(json!({
        "status": if status.is_success() { "healthy" } else { "unhealthy" },
        "database": database,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }));
    (status, body)
}

/// Prometheus 指标
pub async fn metrics(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let text = state
        .metrics
        .export()
        .map_err(|e| ApiError(PathoError::Internal(format!("Failed to export metrics: {}", e))))?;

    Ok(([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], text))
}

// ========== 影像 ==========

/// 上传影像：`image` 为文件，`paciente` 为患者引用
pub async fn upload_image(State(state): State<Arc<AppState>>, mut multipart: Multipart) -> ApiResult<impl IntoResponse> {
    let mut image: Option<(String, Bytes)> = None;
    let mut patient: Option<PacienteRef> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "image" => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read image part: {}", e)))?;
                image = Some((file_name, content));
            }
            "paciente" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read paciente part: {}", e)))?;
                let reference = serde_json::from_str::<PacienteRef>(text.trim())
                    .map_err(|e| ApiError::validation(format!("Invalid paciente part: {}", e)))?;
                patient = Some(reference);
            }
            _ => {}
        }
    }

    let (file_name, content) = image.ok_or_else(|| ApiError::validation("Missing multipart part: image"))?;
    let patient = patient.ok_or_else(|| ApiError::validation("Missing multipart part: paciente"))?;

    state
        .pipeline
        .ingestion
        .store_image(patient.id(), &file_name, content)
        .await?;
    state.metrics.record_upload();

    let message = serde_json::to_string(&format!("file uploaded successfully : {}", file_name))
        .map_err(PathoError::from)?;
    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        format!("{{\"response\" : {}}}", message),
    ))
}

/// 预测影像
pub async fn predict_image(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<Json<PredictionResponse>> {
    let started = Instant::now();

    match state.pipeline.predictor.predict(id).await {
        Ok(result) => {
            state.metrics.record_prediction(result.label.as_str(), started.elapsed());
            Ok(Json(result.into()))
        }
        Err(e) => {
            if matches!(e, PathoError::PredictionUnavailable(_)) {
                state.metrics.record_prediction_failure(started.elapsed());
            }
            Err(e.into())
        }
    }
}

pub async fn get_image_info(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<Json<ImagenDto>> {
    let image = state.pipeline.ingestion.get_image(id).await?;
    Ok(Json(image.into()))
}

/// 影像原始内容
pub async fn get_image_content(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<impl IntoResponse> {
    let (image, content) = state.pipeline.ingestion.load_content(id).await?;
    Ok(([(header::CONTENT_TYPE, image.content_type)], content))
}

pub async fn list_patient_images(
    State(state): State<Arc<AppState>>,
    Path(patient_id): Path<i64>,
) -> ApiResult<Json<Vec<ImagenDto>>> {
    let images = state.pipeline.ingestion.list_images_for_patient(patient_id).await?;
    Ok(Json(images.into_iter().map(ImagenDto::from).collect()))
}

pub async fn delete_image(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.pipeline.ingestion.delete_image(id).await?;
    info!("Image {} deleted", id);
    Ok(StatusCode::NO_CONTENT)
}

// ========== 诊断报告 ==========

pub async fn create_report(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<InformeDto>,
) -> ApiResult<impl IntoResponse> {
    let diagnosis = &state.pipeline.diagnosis;
    let report_id = diagnosis
        .create_report(request.imagen.id, &request.prediccion, &request.contenido)
        .await?;
    state.metrics.record_report_operation("create");

    let report = diagnosis.get_report(report_id).await?;
    Ok((StatusCode::CREATED, Json(InformeDto::from(report))))
}

/// 预测并直接生成报告
pub async fn diagnose_image(
    State(state): State<Arc<AppState>>,
    Path(image_id): Path<i64>,
    JsonBody(request): JsonBody<DiagnoseRequest>,
) -> ApiResult<impl IntoResponse> {
    let report = state.pipeline.diagnosis.diagnose(image_id, &request.contenido).await?;
    state.metrics.record_report_operation("diagnose");

    Ok((StatusCode::CREATED, Json(InformeDto::from(report))))
}

pub async fn get_report(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<Json<InformeDto>> {
    let report = state.pipeline.diagnosis.get_report(id).await?;
    Ok(Json(report.into()))
}

pub async fn list_image_reports(
    State(state): State<Arc<AppState>>,
    Path(image_id): Path<i64>,
) -> ApiResult<Json<Vec<InformeDto>>> {
    let reports = state.pipeline.diagnosis.list_reports_for_image(image_id).await?;
    Ok(Json(reports.into_iter().map(InformeDto::from).collect()))
}

pub async fn delete_report(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.pipeline.diagnosis.delete_report(id).await?;
    state.metrics.record_report_operation("delete");
    Ok(StatusCode::NO_CONTENT)
}
