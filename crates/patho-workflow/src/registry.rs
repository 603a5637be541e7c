//! 医生与患者登记
//!
//! 基本的增删改查，引用完整性与证件号唯一性由数据库层保证。

use patho_core::{Doctor, DoctorId, PathoError, Patient, PatientId, Result};
use patho_database::{DatabasePool, DatabaseQueries, NewDoctor, NewPatient};

/// 医生与患者登记服务
#[derive(Debug, Clone)]
pub struct ClinicRegistry {
    db: DatabasePool,
}

impl ClinicRegistry {
    pub fn new(db: DatabasePool) -> Self {
        Self { db }
    }

    // ========== 医生 ==========

    pub async fn create_doctor(&self, doctor: NewDoctor) -> Result<Doctor> {
        validate_national_id(&doctor.national_id)?;
        let id = DatabaseQueries::new(&self.db).create_doctor(&doctor).await?;
        self.get_doctor(id).await
    }

    pub async fn update_doctor(&self, id: DoctorId, doctor: NewDoctor) -> Result<()> {
        validate_national_id(&doctor.national_id)?;
        DatabaseQueries::new(&self.db).update_doctor(id, &doctor).await
    }

    pub async fn get_doctor(&self, id: DoctorId) -> Result<Doctor> {
        DatabaseQueries::new(&self.db)
            .get_doctor_by_id(id)
            .await?
            .ok_or_else(|| PathoError::not_found("doctor", id))
    }

    pub async fn get_doctor_by_national_id(&self, national_id: &str) -> Result<Doctor> {
        DatabaseQueries::new(&self.db)
            .get_doctor_by_national_id(national_id)
            .await?
            .ok_or_else(|| PathoError::NotFound(format!("doctor with national id {} does not exist", national_id)))
    }

    pub async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        DatabaseQueries::new(&self.db).list_doctors().await
    }

    pub async fn delete_doctor(&self, id: DoctorId) -> Result<()> {
        DatabaseQueries::new(&self.db).delete_doctor(id).await
    }

    // ========== 患者 ==========

    pub async fn create_patient(&self, patient: NewPatient) -> Result<Patient> {
        validate_patient(&patient)?;
        let id = DatabaseQueries::new(&self.db).create_patient(&patient).await?;
        self.get_patient(id).await
    }

    pub async fn update_patient(&self, id: PatientId, patient: NewPatient) -> Result<()> {
        validate_patient(&patient)?;
        DatabaseQueries::new(&self.db).update_patient(id, &patient).await
    }

    pub async fn get_patient(&self, id: PatientId) -> Result<Patient> {
        DatabaseQueries::new(&self.db)
            .get_patient_by_id(id)
            .await?
            .ok_or_else(|| PathoError::not_found("patient", id))
    }

    pub async fn get_patient_by_national_id(&self, national_id: &str) -> Result<Patient> {
        DatabaseQueries::new(&self.db)
            .get_patient_by_national_id(national_id)
            .await?
            .ok_or_else(|| PathoError::NotFound(format!("patient with national id {} does not exist", national_id)))
    }

    /// 列出医生名下的患者
    pub async fn list_patients_for_doctor(&self, doctor_id: DoctorId) -> Result<Vec<Patient>> {
        self.get_doctor(doctor_id).await?;
        DatabaseQueries::new(&self.db).get_patients_by_doctor_id(doctor_id).await
    }

    pub async fn delete_patient(&self, id: PatientId) -> Result<()> {
        DatabaseQueries::new(&self.db).delete_patient(id).await
    }
}

fn validate_national_id(national_id: &str) -> Result<()> {
    if national_id.trim().is_empty() {
        return Err(PathoError::Validation("national id must not be empty".to_string()));
    }
    Ok(())
}

fn validate_patient(patient: &NewPatient) -> Result<()> {
    validate_national_id(&patient.national_id)?;
    if patient.age < 0 {
        return Err(PathoError::Validation(format!("age must not be negative, got {}", patient.age)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[tokio::test]
    async fn test_doctor_lifecycle() {
        let ctx = TestContext::new().await;

        let doctor = ctx.registry.create_doctor(new_doctor("33333333Z")).await.unwrap();
        assert_eq!(ctx.registry.get_doctor_by_national_id("33333333Z").await.unwrap(), doctor);

        let mut changed = new_doctor("33333333Z");
        changed.name = "Medico2".to_string();
        ctx.registry.update_doctor(doctor.id, changed).await.unwrap();
        assert_eq!(ctx.registry.get_doctor(doctor.id).await.unwrap().name, "Medico2");

        ctx.registry.delete_doctor(doctor.id).await.unwrap();
        assert!(matches!(ctx.registry.get_doctor(doctor.id).await, Err(PathoError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_blank_national_id() {
        let ctx = TestContext::new().await;
        let err = ctx.registry.create_doctor(new_doctor("  ")).await.unwrap_err();
        assert!(matches!(err, PathoError::Validation(_)));
    }

    #[tokio::test]
    async fn test_duplicate_patient() {
        let ctx = TestContext::new().await;
        let patient = ctx.registry.get_patient(ctx.patient_id).await.unwrap();

        let err = ctx
            .registry
            .create_patient(new_patient(&patient.national_id, ctx.doctor_id))
            .await
            .unwrap_err();
        assert!(matches!(err, PathoError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_patient_listing_and_deletion_rules() {
        let ctx = TestContext::new().await;

        let patients = ctx.registry.list_patients_for_doctor(ctx.doctor_id).await.unwrap();
        assert_eq!(patients.len(), 1);
        assert!(matches!(ctx.registry.list_patients_for_doctor(99).await, Err(PathoError::NotFound(_))));

        let err = ctx.registry.delete_doctor(ctx.doctor_id).await.unwrap_err();
        assert!(matches!(err, PathoError::Integrity(_)));
        assert!(ctx.registry.get_doctor(ctx.doctor_id).await.is_ok());

        ctx.upload(&healthy_png(), "healthy.png").await;
        let err = ctx.registry.delete_patient(ctx.patient_id).await.unwrap_err();
        assert!(matches!(err, PathoError::Integrity(_)));
    }

    #[tokio::test]
    async fn test_negative_age() {
        let ctx = TestContext::new().await;
        let mut patient = new_patient("NEG-1", ctx.doctor_id);
        patient.age = -1;
        assert!(matches!(ctx.registry.create_patient(patient).await, Err(PathoError::Validation(_))));
    }
}
