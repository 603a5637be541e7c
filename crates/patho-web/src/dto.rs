//! 接口数据结构
//!
//! 对外字段名沿用诊所前端使用的西班牙语命名。

use chrono::{DateTime, Utc};
use patho_core::{Doctor, Image, Patient, PredictionResult, Report};
use patho_database::{NewDoctor, NewPatient};
use serde::{Deserialize, Serialize};

/// 只携带标识的引用，例如 `{"id": 3}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdRef {
    pub id: i64,
}

/// 医生
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MedicoDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub especialidad: String,
}

impl From<Doctor> for MedicoDto {
    fn from(doctor: Doctor) -> Self {
        Self {
            id: Some(doctor.id),
            dni: doctor.national_id,
            nombre: doctor.name,
            especialidad: doctor.specialty,
        }
    }
}

impl MedicoDto {
    pub fn to_new_doctor(&self) -> NewDoctor {
        NewDoctor {
            national_id: self.dni.clone(),
            name: self.nombre.clone(),
            specialty: self.especialidad.clone(),
        }
    }
}

/// 患者；请求中 `medico` 只需携带 `id`，响应中嵌入完整的医生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacienteDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub nombre: String,
    #[serde(default)]
    pub edad: i32,
    #[serde(default)]
    pub cita: Option<String>,
    #[serde(default)]
    pub medico: MedicoDto,
}

impl PacienteDto {
    pub fn from_parts(patient: Patient, doctor: Doctor) -> Self {
        Self {
            id: Some(patient.id),
            dni: patient.national_id,
            nombre: patient.name,
            edad: patient.age,
            cita: patient.scheduled_visit,
            medico: doctor.into(),
        }
    }

    pub fn to_new_patient(&self, doctor_id: i64) -> NewPatient {
        NewPatient {
            national_id: self.dni.clone(),
            name: self.nombre.clone(),
            age: self.edad,
            scheduled_visit: self.cita.clone(),
            doctor_id,
        }
    }
}

/// 上传时 `paciente` 部分：`{"id": 1, ...}` 或者直接是整数
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
pub enum PacienteRef {
    Id(i64),
    Object(IdRef),
}

impl PacienteRef {
    pub fn id(&self) -> i64 {
        match self {
            PacienteRef::Id(id) => *id,
            PacienteRef::Object(r) => r.id,
        }
    }
}

/// 影像元数据
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagenDto {
    pub id: i64,
    pub nombre: String,
    pub paciente: IdRef,
    pub tipo: String,
    pub tamano: i64,
    pub sha256: String,
    pub ancho: u32,
    pub alto: u32,
    pub fecha: DateTime<Utc>,
}

impl From<Image> for ImagenDto {
    fn from(image: Image) -> Self {
        Self {
            id: image.id,
            nombre: image.file_name,
            paciente: IdRef { id: image.patient_id },
            tipo: image.content_type,
            tamano: image.size_bytes,
            sha256: image.sha256,
            ancho: image.width,
            alto: image.height,
            fecha: image.created_at,
        }
    }
}

/// 诊断报告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InformeDto {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub prediccion: String,
    #[serde(default)]
    pub contenido: String,
    pub imagen: IdRef,
}

impl From<Report> for InformeDto {
    fn from(report: Report) -> Self {
        Self {
            id: Some(report.id),
            prediccion: report.prediction,
            contenido: report.content,
            imagen: IdRef { id: report.image_id },
        }
    }
}

/// 自动诊断请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiagnoseRequest {
    #[serde(default)]
    pub contenido: String,
}

/// 预测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub prediction: String,
    pub label: u8,
    pub score: f64,
}

impl From<PredictionResult> for PredictionResponse {
    fn from(result: PredictionResult) -> Self {
        Self {
            prediction: result.to_string(),
            label: result.label.class_index(),
            score: result.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paciente_ref_forms() {
        let bare: PacienteRef = serde_json::from_str("7").unwrap();
        assert_eq!(bare.id(), 7);

        let object: PacienteRef = serde_json::from_str(r#"{"id": 8, "dni": "X", "nombre": "Ana"}"#).unwrap();
        assert_eq!(object.id(), 8);

        assert!(serde_json::from_str::<PacienteRef>(r#"{"dni": "X"}"#).is_err());
    }

    #[test]
    fn test_paciente_request_with_doctor_id_only() {
        let dto: PacienteDto =
            serde_json::from_str(r#"{"dni": "22222222B", "nombre": "Paciente1", "edad": 40, "medico": {"id": 1}}"#)
                .unwrap();
        assert_eq!(dto.medico.id, Some(1));
        assert!(dto.id.is_none());
        assert!(dto.cita.is_none());
    }

    #[test]
    fn test_informe_serialization() {
        let dto = InformeDto {
            id: Some(3),
            prediccion: "Cancer (label 1), score: 0.9".to_string(),
            contenido: "ok".to_string(),
            imagen: IdRef { id: 5 },
        };
        let value = serde_json::to_value(&dto).unwrap();
        assert_eq!(value["imagen"]["id"], 5);
        assert_eq!(value["prediccion"], "Cancer (label 1), score: 0.9");
    }
}
