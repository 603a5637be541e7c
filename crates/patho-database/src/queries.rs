//! 数据库查询操作
//!
//! 所有引用完整性检查都写在同一条变更语句里（条件插入 / 条件更新 / 条件删除），
//! 检查与写入在数据库内原子完成；唯一性由表上的 UNIQUE 约束保证。
//! 变更影响零行时，再读一次只用于区分错误种类。

use crate::connection::DatabasePool;
use crate::models::*;
use chrono::Utc;
use patho_core::{Doctor, DoctorId, Image, ImageId, PathoError, Patient, PatientId, Report, ReportId, Result};
use tracing::{debug, info, warn};

/// 数据库查询操作接口
pub struct DatabaseQueries<'a> {
    pool: &'a DatabasePool,
}

impl<'a> DatabaseQueries<'a> {
    pub fn new(pool: &'a DatabasePool) -> Self {
        Self { pool }
    }

    /// 创建数据库表
    pub async fn create_tables(&self) -> Result<()> {
        let pool = self.pool.pool();

        // 创建医生表
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS doctors (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                national_id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                specialty TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
        "#,
        )
        .execute(pool)
        .await?;

        // 创建患者表
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS patients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                national_id TEXT NOT NULL UNIQUE,
                name TEXT NOT NULL,
                age INTEGER NOT NULL,
                scheduled_visit TEXT,
                doctor_id INTEGER NOT NULL REFERENCES doctors(id) ON DELETE RESTRICT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
        "#,
        )
        .execute(pool)
        .await?;

        // 创建影像表
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS images (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                patient_id INTEGER NOT NULL REFERENCES patients(id) ON DELETE RESTRICT,
                file_name TEXT NOT NULL,
                storage_key TEXT NOT NULL UNIQUE,
                content_type TEXT NOT NULL,
                size_bytes INTEGER NOT NULL,
                sha256 TEXT NOT NULL,
                width INTEGER NOT NULL,
                height INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )
        "#,
        )
        .execute(pool)
        .await?;

        // 创建报告表
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS reports (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                prediction TEXT NOT NULL,
                content TEXT NOT NULL,
                image_id INTEGER NOT NULL REFERENCES images(id) ON DELETE RESTRICT,
                created_at TEXT NOT NULL
            )
        "#,
        )
        .execute(pool)
        .await?;

        self.create_indexes().await?;

        info!("Database tables created successfully");
        Ok(())
    }

    /// 创建数据库索引
    async fn create_indexes(&self) -> Result<()> {
        let pool = self.pool.pool();

        let indexes = [
            "CREATE INDEX IF NOT EXISTS idx_patients_doctor_id ON patients(doctor_id)",
            "CREATE INDEX IF NOT EXISTS idx_images_patient_id ON images(patient_id)",
            "CREATE INDEX IF NOT EXISTS idx_reports_image_id ON reports(image_id)",
        ];

        for index_sql in indexes {
            sqlx::query(index_sql).execute(pool).await?;
        }

        Ok(())
    }

    // ========== 医生相关操作 ==========

    /// 创建新医生
    pub async fn create_doctor(&self, doctor: &NewDoctor) -> Result<DoctorId> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO doctors (national_id, name, specialty, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?4)
        "#,
        )
        .bind(&doctor.national_id)
        .bind(&doctor.name)
        .bind(&doctor.specialty)
        .bind(now)
        .execute(self.pool.pool())
        .await
        .map_err(|e| conflict_context(e, "doctor", &doctor.national_id))?;

        let id = result.last_insert_rowid();
        info!("Created doctor {}", id);
        Ok(id)
    }

    /// 更新医生信息
    pub async fn update_doctor(&self, id: DoctorId, doctor: &NewDoctor) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE doctors SET national_id = ?1, name = ?2, specialty = ?3, updated_at = ?4
            WHERE id = ?5
        "#,
        )
        .bind(&doctor.national_id)
        .bind(&doctor.name)
        .bind(&doctor.specialty)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool.pool())
        .await
        .map_err(|e| conflict_context(e, "doctor", &doctor.national_id))?;

        if result.rows_affected() == 0 {
            return Err(PathoError::not_found("doctor", id));
        }

        info!("Updated doctor {}", id);
        Ok(())
    }

    /// 根据ID查找医生
    pub async fn get_doctor_by_id(&self, id: DoctorId) -> Result<Option<Doctor>> {
        let result = sqlx::query_as::<_, DbDoctor>("SELECT * FROM doctors WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(result.map(Doctor::from))
    }

    /// 根据证件号查找医生
    pub async fn get_doctor_by_national_id(&self, national_id: &str) -> Result<Option<Doctor>> {
        let result = sqlx::query_as::<_, DbDoctor>("SELECT * FROM doctors WHERE national_id = ?1")
            .bind(national_id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(result.map(Doctor::from))
    }

    /// 获取所有医生
    pub async fn list_doctors(&self) -> Result<Vec<Doctor>> {
        let results = sqlx::query_as::<_, DbDoctor>("SELECT * FROM doctors ORDER BY id")
            .fetch_all(self.pool.pool())
            .await?;

        Ok(results.into_iter().map(Doctor::from).collect())
    }

    /// 删除医生，名下仍有患者时拒绝
    pub async fn delete_doctor(&self, id: DoctorId) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM doctors
            WHERE id = ?1 AND NOT EXISTS (SELECT 1 FROM patients WHERE doctor_id = ?1)
        "#,
        )
        .bind(id)
        .execute(self.pool.pool())
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_doctor_by_id(id).await? {
                Some(_) => {
                    warn!("Refused to delete doctor {} with active patients", id);
                    Err(PathoError::Integrity(format!("doctor {} still has patients", id)))
                }
                None => Err(PathoError::not_found("doctor", id)),
            };
        }

        info!("Deleted doctor {}", id);
        Ok(())
    }

    // ========== 患者相关操作 ==========

    /// 创建新患者，医生必须存在
    pub async fn create_patient(&self, patient: &NewPatient) -> Result<PatientId> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO patients (national_id, name, age, scheduled_visit, doctor_id, created_at, updated_at)
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?6
            WHERE EXISTS (SELECT 1 FROM doctors WHERE id = ?5)
        "#,
        )
        .bind(&patient.national_id)
        .bind(&patient.name)
        .bind(patient.age)
        .bind(&patient.scheduled_visit)
        .bind(patient.doctor_id)
        .bind(now)
        .execute(self.pool.pool())
        .await
        .map_err(|e| conflict_context(e, "patient", &patient.national_id))?;

        if result.rows_affected() == 0 {
            warn!("Rejected patient for unknown doctor {}", patient.doctor_id);
            return Err(PathoError::not_found("doctor", patient.doctor_id));
        }

        let id = result.last_insert_rowid();
        info!("Created patient {} under doctor {}", id, patient.doctor_id);
        Ok(id)
    }

    /// 更新患者信息，新的医生引用必须存在
    pub async fn update_patient(&self, id: PatientId, patient: &NewPatient) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE patients
            SET national_id = ?1, name = ?2, age = ?3, scheduled_visit = ?4, doctor_id = ?5, updated_at = ?6
            WHERE id = ?7 AND EXISTS (SELECT 1 FROM doctors WHERE id = ?5)
        "#,
        )
        .bind(&patient.national_id)
        .bind(&patient.name)
        .bind(patient.age)
        .bind(&patient.scheduled_visit)
        .bind(patient.doctor_id)
        .bind(Utc::now())
        .bind(id)
        .execute(self.pool.pool())
        .await
        .map_err(|e| conflict_context(e, "patient", &patient.national_id))?;

        if result.rows_affected() == 0 {
            return match self.get_patient_by_id(id).await? {
                Some(_) => Err(PathoError::not_found("doctor", patient.doctor_id)),
                None => Err(PathoError::not_found("patient", id)),
            };
        }

        info!("Updated patient {}", id);
        Ok(())
    }

    /// 根据ID查找患者
    pub async fn get_patient_by_id(&self, id: PatientId) -> Result<Option<Patient>> {
        let result = sqlx::query_as::<_, DbPatient>("SELECT * FROM patients WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(result.map(Patient::from))
    }

    /// 根据证件号查找患者
    pub async fn get_patient_by_national_id(&self, national_id: &str) -> Result<Option<Patient>> {
        let result = sqlx::query_as::<_, DbPatient>("SELECT * FROM patients WHERE national_id = ?1")
            .bind(national_id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(result.map(Patient::from))
    }

    /// 根据医生ID获取所有患者
    pub async fn get_patients_by_doctor_id(&self, doctor_id: DoctorId) -> Result<Vec<Patient>> {
        let results = sqlx::query_as::<_, DbPatient>("SELECT * FROM patients WHERE doctor_id = ?1 ORDER BY id")
            .bind(doctor_id)
            .fetch_all(self.pool.pool())
            .await?;

        Ok(results.into_iter().map(Patient::from).collect())
    }

    /// 删除患者，仍有影像时拒绝
    pub async fn delete_patient(&self, id: PatientId) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM patients
            WHERE id = ?1 AND NOT EXISTS (SELECT 1 FROM images WHERE patient_id = ?1)
        "#,
        )
        .bind(id)
        .execute(self.pool.pool())
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_patient_by_id(id).await? {
                Some(_) => {
                    warn!("Refused to delete patient {} with stored images", id);
                    Err(PathoError::Integrity(format!("patient {} still has images", id)))
                }
                None => Err(PathoError::not_found("patient", id)),
            };
        }

        info!("Deleted patient {}", id);
        Ok(())
    }

    // ========== 影像相关操作 ==========

    /// 创建影像记录，患者必须存在
    pub async fn create_image(&self, image: &NewImage) -> Result<ImageId> {
        let result = sqlx::query(
            r#"
            INSERT INTO images (patient_id, file_name, storage_key, content_type, size_bytes, sha256, width, height, created_at)
            SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9
            WHERE EXISTS (SELECT 1 FROM patients WHERE id = ?1)
        "#,
        )
        .bind(image.patient_id)
        .bind(&image.file_name)
        .bind(&image.storage_key)
        .bind(&image.content_type)
        .bind(image.size_bytes)
        .bind(&image.sha256)
        .bind(i64::from(image.width))
        .bind(i64::from(image.height))
        .bind(Utc::now())
        .execute(self.pool.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(PathoError::not_found("patient", image.patient_id));
        }

        let id = result.last_insert_rowid();
        debug!("Inserted image record {} at {}", id, image.storage_key);
        Ok(id)
    }

    /// 根据ID查找影像
    pub async fn get_image_by_id(&self, id: ImageId) -> Result<Option<Image>> {
        let result = sqlx::query_as::<_, DbImage>("SELECT * FROM images WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(result.map(Image::from))
    }

    /// 根据患者ID获取所有影像
    pub async fn get_images_by_patient_id(&self, patient_id: PatientId) -> Result<Vec<Image>> {
        let results = sqlx::query_as::<_, DbImage>("SELECT * FROM images WHERE patient_id = ?1 ORDER BY id")
            .bind(patient_id)
            .fetch_all(self.pool.pool())
            .await?;

        Ok(results.into_iter().map(Image::from).collect())
    }

    /// 删除影像记录，仍被报告引用时拒绝
    pub async fn delete_image(&self, id: ImageId) -> Result<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM images
            WHERE id = ?1 AND NOT EXISTS (SELECT 1 FROM reports WHERE image_id = ?1)
        "#,
        )
        .bind(id)
        .execute(self.pool.pool())
        .await?;

        if result.rows_affected() == 0 {
            return match self.get_image_by_id(id).await? {
                Some(_) => {
                    warn!("Refused to delete image {} referenced by reports", id);
                    Err(PathoError::Integrity(format!("image {} is referenced by reports", id)))
                }
                None => Err(PathoError::not_found("image", id)),
            };
        }

        info!("Deleted image record {}", id);
        Ok(())
    }

    // ========== 报告相关操作 ==========

    /// 创建报告，影像必须存在
    pub async fn create_report(&self, report: &NewReport) -> Result<ReportId> {
        let result = sqlx::query(
            r#"
            INSERT INTO reports (prediction, content, image_id, created_at)
            SELECT ?1, ?2, ?3, ?4
            WHERE EXISTS (SELECT 1 FROM images WHERE id = ?3)
        "#,
        )
        .bind(&report.prediction)
        .bind(&report.content)
        .bind(report.image_id)
        .bind(Utc::now())
        .execute(self.pool.pool())
        .await?;

        if result.rows_affected() == 0 {
            warn!("Rejected report for unknown image {}", report.image_id);
            return Err(PathoError::not_found("image", report.image_id));
        }

        let id = result.last_insert_rowid();
        info!("Created report {} for image {}", id, report.image_id);
        Ok(id)
    }

    /// 根据ID查找报告
    pub async fn get_report_by_id(&self, id: ReportId) -> Result<Option<Report>> {
        let result = sqlx::query_as::<_, DbReport>("SELECT * FROM reports WHERE id = ?1")
            .bind(id)
            .fetch_optional(self.pool.pool())
            .await?;

        Ok(result.map(Report::from))
    }

    /// 根据影像ID获取所有报告
    pub async fn get_reports_by_image_id(&self, image_id: ImageId) -> Result<Vec<Report>> {
        let results = sqlx::query_as::<_, DbReport>("SELECT * FROM reports WHERE image_id = ?1 ORDER BY id")
            .bind(image_id)
            .fetch_all(self.pool.pool())
            .await?;

        Ok(results.into_iter().map(Report::from).collect())
    }

    /// 删除报告，不影响其引用的影像
    pub async fn delete_report(&self, id: ReportId) -> Result<()> {
        let result = sqlx::query("DELETE FROM reports WHERE id = ?1")
            .bind(id)
            .execute(self.pool.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(PathoError::not_found("report", id));
        }

        info!("Deleted report {}", id);
        Ok(())
    }
}

/// 为唯一性冲突补充实体与证件号信息
fn conflict_context(err: sqlx::Error, entity: &str, national_id: &str) -> PathoError {
    match PathoError::from(err) {
        PathoError::Conflict(_) => {
            warn!("Duplicate {} national id {}", entity, national_id);
            PathoError::Conflict(format!("{} with national id {} already exists", entity, national_id))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::DatabaseConfig;

    fn new_doctor(national_id: &str) -> NewDoctor {
        NewDoctor {
            national_id: national_id.to_string(),
            name: "Medico".to_string(),
            specialty: "Oncologia".to_string(),
        }
    }

    fn new_patient(national_id: &str, doctor_id: DoctorId) -> NewPatient {
        NewPatient {
            national_id: national_id.to_string(),
            name: "Paciente".to_string(),
            age: 40,
            scheduled_visit: Some("Lunes".to_string()),
            doctor_id,
        }
    }

    fn new_image(patient_id: PatientId, key: &str) -> NewImage {
        NewImage {
            patient_id,
            file_name: "healthy.png".to_string(),
            storage_key: key.to_string(),
            content_type: "image/png".to_string(),
            size_bytes: 128,
            sha256: "00".repeat(32),
            width: 64,
            height: 48,
        }
    }

    #[tokio::test]
    async fn test_doctor_round_trip() {
        let db = DatabasePool::in_memory().await.unwrap();
        let queries = DatabaseQueries::new(&db);

        let id = queries.create_doctor(&new_doctor("11111111X")).await.unwrap();
        let doctor = queries.get_doctor_by_id(id).await.unwrap().unwrap();
        assert_eq!(doctor.national_id, "11111111X");
        assert_eq!(doctor.specialty, "Oncologia");

        let by_dni = queries.get_doctor_by_national_id("11111111X").await.unwrap().unwrap();
        assert_eq!(by_dni.id, id);
    }

    #[tokio::test]
    async fn test_duplicate_doctor_is_conflict() {
        let db = DatabasePool::in_memory().await.unwrap();
        let queries = DatabaseQueries::new(&db);

        queries.create_doctor(&new_doctor("1")).await.unwrap();
        let err = queries.create_doctor(&new_doctor("1")).await.unwrap_err();
        assert!(matches!(err, PathoError::Conflict(_)));
        assert_eq!(queries.list_doctors().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_doctor_to_taken_national_id() {
        let db = DatabasePool::in_memory().await.unwrap();
        let queries = DatabaseQueries::new(&db);

        queries.create_doctor(&new_doctor("1")).await.unwrap();
        let second = queries.create_doctor(&new_doctor("2")).await.unwrap();

        let err = queries.update_doctor(second, &new_doctor("1")).await.unwrap_err();
        assert!(matches!(err, PathoError::Conflict(_)));

        let err = queries.update_doctor(999, &new_doctor("3")).await.unwrap_err();
        assert!(matches!(err, PathoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_doctors() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            url: format!("sqlite://{}", dir.path().join("race.db").display()),
            max_connections: 4,
            connect_timeout_secs: 10,
        };
        let db = DatabasePool::connect(&config).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let db = db.clone();
            handles.push(tokio::spawn(async move {
                DatabaseQueries::new(&db).create_doctor(&new_doctor("RACE-1")).await
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(PathoError::Conflict(_)) => {}
                Err(other) => panic!("unexpected error: {}", other),
            }
        }

        assert_eq!(created, 1);
        assert_eq!(DatabaseQueries::new(&db).list_doctors().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_patient_requires_doctor() {
        let db = DatabasePool::in_memory().await.unwrap();
        let queries = DatabaseQueries::new(&db);

        let err = queries.create_patient(&new_patient("22222222X", 42)).await.unwrap_err();
        assert!(matches!(err, PathoError::NotFound(_)));
        assert!(queries.get_patient_by_national_id("22222222X").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_patient() {
        let db = DatabasePool::in_memory().await.unwrap();
        let queries = DatabaseQueries::new(&db);

        let doctor_id = queries.create_doctor(&new_doctor("1")).await.unwrap();
        let patient_id = queries.create_patient(&new_patient("123456789L", doctor_id)).await.unwrap();

        let mut updated = new_patient("123456788X", doctor_id);
        updated.name = "PacienteUpdated".to_string();
        queries.update_patient(patient_id, &updated).await.unwrap();

        let patient = queries.get_patient_by_id(patient_id).await.unwrap().unwrap();
        assert_eq!(patient.name, "PacienteUpdated");
        assert_eq!(patient.national_id, "123456788X");
        assert_eq!(patient.age, 40);
        assert_eq!(patient.scheduled_visit.as_deref(), Some("Lunes"));

        updated.doctor_id = 77;
        let err = queries.update_patient(patient_id, &updated).await.unwrap_err();
        assert!(matches!(err, PathoError::NotFound(msg) if msg.contains("doctor")));
    }

    #[tokio::test]
    async fn test_delete_doctor_with_patients_is_blocked() {
        let db = DatabasePool::in_memory().await.unwrap();
        let queries = DatabaseQueries::new(&db);

        let doctor_id = queries.create_doctor(&new_doctor("1")).await.unwrap();
        let patient_id = queries.create_patient(&new_patient("P1", doctor_id)).await.unwrap();

        let err = queries.delete_doctor(doctor_id).await.unwrap_err();
        assert!(matches!(err, PathoError::Integrity(_)));
        assert!(queries.get_doctor_by_id(doctor_id).await.unwrap().is_some());

        queries.delete_patient(patient_id).await.unwrap();
        queries.delete_doctor(doctor_id).await.unwrap();
        assert!(queries.get_doctor_by_id(doctor_id).await.unwrap().is_none());

        let err = queries.delete_doctor(doctor_id).await.unwrap_err();
        assert!(matches!(err, PathoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_image_and_report_integrity() {
        let db = DatabasePool::in_memory().await.unwrap();
        let queries = DatabaseQueries::new(&db);

        let doctor_id = queries.create_doctor(&new_doctor("1")).await.unwrap();
        let patient_id = queries.create_patient(&new_patient("P1", doctor_id)).await.unwrap();

        let err = queries.create_image(&new_image(999, "images/x.png")).await.unwrap_err();
        assert!(matches!(err, PathoError::NotFound(_)));

        let image_id = queries.create_image(&new_image(patient_id, "images/a.png")).await.unwrap();
        let image = queries.get_image_by_id(image_id).await.unwrap().unwrap();
        assert_eq!((image.width, image.height), (64, 48));

        let err = queries.delete_patient(patient_id).await.unwrap_err();
        assert!(matches!(err, PathoError::Integrity(_)));

        let report_id = queries
            .create_report(&NewReport {
                prediction: "Not cancer (label 0),  score: 0.984481368213892".to_string(),
                content: "El paciente no tiene cancer.".to_string(),
                image_id,
            })
            .await
            .unwrap();

        let err = queries.delete_image(image_id).await.unwrap_err();
        assert!(matches!(err, PathoError::Integrity(_)));

        queries.delete_report(report_id).await.unwrap();
        assert!(queries.get_report_by_id(report_id).await.unwrap().is_none());
        assert!(queries.get_image_by_id(image_id).await.unwrap().is_some());

        queries.delete_image(image_id).await.unwrap();
        assert!(queries.get_images_by_patient_id(patient_id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_report_for_missing_image() {
        let db = DatabasePool::in_memory().await.unwrap();
        let queries = DatabaseQueries::new(&db);

        let err = queries
            .create_report(&NewReport {
                prediction: "Cancer (label 1), score: 0.6".to_string(),
                content: "n/a".to_string(),
                image_id: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PathoError::NotFound(_)));
        assert!(queries.get_reports_by_image_id(1).await.unwrap().is_empty());

        let err = queries.delete_report(1).await.unwrap_err();
        assert!(matches!(err, PathoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_ids_are_per_entity_sequences() {
        let db = DatabasePool::in_memory().await.unwrap();
        let queries = DatabaseQueries::new(&db);

        let d1 = queries.create_doctor(&new_doctor("1")).await.unwrap();
        let d2 = queries.create_doctor(&new_doctor("2")).await.unwrap();
        let p1 = queries.create_patient(&new_patient("P1", d1)).await.unwrap();
        assert_eq!((d1, d2, p1), (1, 2, 1));

        // AUTOINCREMENT 不复用已删除的标识
        queries.delete_patient(p1).await.unwrap();
        let p2 = queries.create_patient(&new_patient("P2", d1)).await.unwrap();
        assert_eq!(p2, 2);
    }
}
