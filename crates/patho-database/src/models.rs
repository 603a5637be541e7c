//! 数据库模型

use chrono::{DateTime, Utc};
use patho_core::models::*;
use sqlx::FromRow;

// 数据库表模型 - 使用FromRow trait用于SQL查询

/// 数据库医生表
#[derive(Debug, FromRow)]
pub struct DbDoctor {
    pub id: i64,
    pub national_id: String,
    pub name: String,
    pub specialty: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbDoctor> for Doctor {
    fn from(db_doctor: DbDoctor) -> Self {
        Doctor {
            id: db_doctor.id,
            national_id: db_doctor.national_id,
            name: db_doctor.name,
            specialty: db_doctor.specialty,
            created_at: db_doctor.created_at,
            updated_at: db_doctor.updated_at,
        }
    }
}

/// 数据库患者表
#[derive(Debug, FromRow)]
pub struct DbPatient {
    pub id: i64,
    pub national_id: String,
    pub name: String,
    pub age: i32,
    pub scheduled_visit: Option<String>,
    pub doctor_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DbPatient> for Patient {
    fn from(db_patient: DbPatient) -> Self {
        Patient {
            id: db_patient.id,
            national_id: db_patient.national_id,
            name: db_patient.name,
            age: db_patient.age,
            scheduled_visit: db_patient.scheduled_visit,
            doctor_id: db_patient.doctor_id,
            created_at: db_patient.created_at,
            updated_at: db_patient.updated_at,
        }
    }
}

/// 数据库影像表
#[derive(Debug, FromRow)]
pub struct DbImage {
    pub id: i64,
    pub patient_id: i64,
    pub file_name: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub width: i64, // SQLite 只有有符号整数
    pub height: i64,
    pub created_at: DateTime<Utc>,
}

impl From<DbImage> for Image {
    fn from(db_image: DbImage) -> Self {
        Image {
            id: db_image.id,
            patient_id: db_image.patient_id,
            file_name: db_image.file_name,
            storage_key: db_image.storage_key,
            content_type: db_image.content_type,
            size_bytes: db_image.size_bytes,
            sha256: db_image.sha256,
            width: db_image.width as u32,
            height: db_image.height as u32,
            created_at: db_image.created_at,
        }
    }
}

/// 数据库报告表
#[derive(Debug, FromRow)]
pub struct DbReport {
    pub id: i64,
    pub prediction: String,
    pub content: String,
    pub image_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<DbReport> for Report {
    fn from(db_report: DbReport) -> Self {
        Report {
            id: db_report.id,
            prediction: db_report.prediction,
            content: db_report.content,
            image_id: db_report.image_id,
            created_at: db_report.created_at,
        }
    }
}

// 插入模型 - 用于创建和更新记录，标识由数据库序列分配

/// 新医生插入模型
#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub national_id: String,
    pub name: String,
    pub specialty: String,
}

/// 新患者插入模型
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub national_id: String,
    pub name: String,
    pub age: i32,
    pub scheduled_visit: Option<String>,
    pub doctor_id: DoctorId,
}

/// 新影像插入模型
#[derive(Debug, Clone)]
pub struct NewImage {
    pub patient_id: PatientId,
    pub file_name: String,
    pub storage_key: String,
    pub content_type: String,
    pub size_bytes: i64,
    pub sha256: String,
    pub width: u32,
    pub height: u32,
}

/// 新报告插入模型
#[derive(Debug, Clone)]
pub struct NewReport {
    pub prediction: String,
    pub content: String,
    pub image_id: ImageId,
}
