//! 诊断报告组装
//!
//! 报告是影像的派生注释：同一影像可以有多份报告，删除报告不影响影像。
//! 预测文本不要求与当前预测一致，“预测”与“记录诊断”是两个独立操作。

use crate::prediction::PredictionAdapter;
use patho_core::{ImageId, PathoError, Report, ReportId, Result};
use patho_database::{DatabasePool, DatabaseQueries, NewReport};
use tracing::info;

/// 诊断报告组装器
#[derive(Clone)]
pub struct DiagnosisAssembler {
    db: DatabasePool,
    predictor: PredictionAdapter,
}

impl DiagnosisAssembler {
    pub fn new(db: DatabasePool, predictor: PredictionAdapter) -> Self {
        Self { db, predictor }
    }

    /// 创建报告，影像必须存在
    pub async fn create_report(&self, image_id: ImageId, prediction: &str, content: &str) -> Result<ReportId> {
        DatabaseQueries::new(&self.db)
            .create_report(&NewReport {
                prediction: prediction.to_string(),
                content: content.to_string(),
                image_id,
            })
            .await
    }

    /// 先预测，再以渲染后的预测文本创建报告；预测失败时不落库
    pub async fn diagnose(&self, image_id: ImageId, content: &str) -> Result<Report> {
        let prediction = self.predictor.predict(image_id).await?;
        let report_id = self.create_report(image_id, &prediction.to_string(), content).await?;

        info!("Recorded automatic diagnosis {} for image {}", report_id, image_id);
        self.get_report(report_id).await
    }

    pub async fn get_report(&self, report_id: ReportId) -> Result<Report> {
        DatabaseQueries::new(&self.db)
            .get_report_by_id(report_id)
            .await?
            .ok_or_else(|| PathoError::not_found("report", report_id))
    }

    /// 列出影像的所有报告
    pub async fn list_reports_for_image(&self, image_id: ImageId) -> Result<Vec<Report>> {
        let queries = DatabaseQueries::new(&self.db);
        if queries.get_image_by_id(image_id).await?.is_none() {
            return Err(PathoError::not_found("image", image_id));
        }
        queries.get_reports_by_image_id(image_id).await
    }

    /// 删除报告，不级联到影像
    pub async fn delete_report(&self, report_id: ReportId) -> Result<()> {
        DatabaseQueries::new(&self.db).delete_report(report_id).await
    }
}
