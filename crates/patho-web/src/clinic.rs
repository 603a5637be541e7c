//! HTTP处理器：医生与患者

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use patho_core::Patient;
use std::sync::Arc;

use crate::dto::{MedicoDto, PacienteDto};
use crate::error::{ApiError, ApiResult};
use crate::extract::JsonBody;
use crate::server::AppState;

// ========== 医生 ==========

pub async fn create_doctor(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<MedicoDto>,
) -> ApiResult<impl IntoResponse> {
    let doctor = state.pipeline.registry.create_doctor(request.to_new_doctor()).await?;
    Ok((StatusCode::CREATED, Json(MedicoDto::from(doctor))))
}

pub async fn update_doctor(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<MedicoDto>,
) -> ApiResult<StatusCode> {
    let id = request.id.ok_or_else(|| ApiError::validation("medico.id is required for updates"))?;
    state.pipeline.registry.update_doctor(id, request.to_new_doctor()).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_doctor(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<Json<MedicoDto>> {
    let doctor = state.pipeline.registry.get_doctor(id).await?;
    Ok(Json(doctor.into()))
}

pub async fn get_doctor_by_dni(State(state): State<Arc<AppState>>, Path(dni): Path<String>) -> ApiResult<Json<MedicoDto>> {
    let doctor = state.pipeline.registry.get_doctor_by_national_id(&dni).await?;
    Ok(Json(doctor.into()))
}

pub async fn list_doctors(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<MedicoDto>>> {
    let doctors = state.pipeline.registry.list_doctors().await?;
    Ok(Json(doctors.into_iter().map(MedicoDto::from).collect()))
}

pub async fn delete_doctor(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.pipeline.registry.delete_doctor(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ========== 患者 ==========

pub async fn create_patient(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<PacienteDto>,
) -> ApiResult<impl IntoResponse> {
    let doctor_id = doctor_ref(&request)?;
    let patient = state
        .pipeline
        .registry
        .create_patient(request.to_new_patient(doctor_id))
        .await?;

    Ok((StatusCode::CREATED, Json(embed_doctor(&state, patient).await?)))
}

pub async fn update_patient(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<PacienteDto>,
) -> ApiResult<StatusCode> {
    let id = request.id.ok_or_else(|| ApiError::validation("paciente.id is required for updates"))?;
    let doctor_id = doctor_ref(&request)?;
    state
        .pipeline
        .registry
        .update_patient(id, request.to_new_patient(doctor_id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn get_patient(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<Json<PacienteDto>> {
    let patient = state.pipeline.registry.get_patient(id).await?;
    Ok(Json(embed_doctor(&state, patient).await?))
}

pub async fn get_patient_by_dni(State(state): State<Arc<AppState>>, Path(dni): Path<String>) -> ApiResult<Json<PacienteDto>> {
    let patient = state.pipeline.registry.get_patient_by_national_id(&dni).await?;
    Ok(Json(embed_doctor(&state, patient).await?))
}

/// 医生名下的患者，医生对象只查询一次
pub async fn list_doctor_patients(
    State(state): State<Arc<AppState>>,
    Path(doctor_id): Path<i64>,
) -> ApiResult<Json<Vec<PacienteDto>>> {
    let registry = &state.pipeline.registry;
    let patients = registry.list_patients_for_doctor(doctor_id).await?;
    let doctor = registry.get_doctor(doctor_id).await?;

    Ok(Json(
        patients
            .into_iter()
            .map(|patient| PacienteDto::from_parts(patient, doctor.clone()))
            .collect(),
    ))
}

pub async fn delete_patient(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    state.pipeline.registry.delete_patient(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn doctor_ref(request: &PacienteDto) -> ApiResult<i64> {
    request
        .medico
        .id
        .ok_or_else(|| ApiError::validation("paciente.medico.id is required"))
}

async fn embed_doctor(state: &AppState, patient: Patient) -> ApiResult<PacienteDto> {
    let doctor = state.pipeline.registry.get_doctor(patient.doctor_id).await?;
    Ok(PacienteDto::from_parts(patient, doctor))
}
