//! 诊断流水线演示程序
//!
//! 全部使用内存后端：登记医生与患者、上传两张影像、预测并生成诊断报告。

use bytes::Bytes;
use pathodx::database::{DatabasePool, NewDoctor, NewPatient};
use pathodx::inference::FixtureClassifier;
use pathodx::storage::StorageManager;
use pathodx::{Pipeline, PipelineOptions};
use std::sync::Arc;

fn sample_png(rgb: [u8; 3]) -> Result<Bytes, Box<dyn std::error::Error>> {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(64, 64, image::Rgb(rgb)));
    let mut buf = Vec::new();
    img.write_to(&mut buf, image::ImageOutputFormat::Png)?;
    Ok(Bytes::from(buf))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志
    tracing_subscriber::fmt::init();

    let healthy = sample_png([236, 190, 214])?;
    let no_healthy = sample_png([98, 30, 96])?;

    let classifier = FixtureClassifier::new()
        .with_content(&healthy, vec![0.984481368213892, 0.015518631786108])
        .with_content(&no_healthy, vec![0.3587392568588257, 0.6412607431411743]);

    let db = DatabasePool::in_memory().await?;
    let pipeline = Pipeline::new(db, StorageManager::in_memory(), Arc::new(classifier), PipelineOptions::default());

    println!("🚀 PathoDx 诊断流水线演示\n");

    // 1. 登记
    let doctor = pipeline
        .registry
        .create_doctor(NewDoctor {
            national_id: "11111111A".to_string(),
            name: "Dra. Ruiz".to_string(),
            specialty: "Anatomia patologica".to_string(),
        })
        .await?;
    let patient = pipeline
        .registry
        .create_patient(NewPatient {
            national_id: "22222222B".to_string(),
            name: "Juan Perez".to_string(),
            age: 58,
            scheduled_visit: Some("2024-06-01 10:30".to_string()),
            doctor_id: doctor.id,
        })
        .await?;
    println!("✅ 医生 {} 与患者 {} 登记完成", doctor.name, patient.name);

    // 2. 上传、预测、诊断
    for (file_name, content) in [("healthy.png", healthy), ("no_healthy.png", no_healthy)] {
        let image_id = pipeline.ingestion.store_image(patient.id, file_name, content).await?;
        let prediction = pipeline.predictor.predict(image_id).await?;
        println!("📋 {} (影像 {}): {}", file_name, image_id, prediction);

        let report = pipeline.diagnosis.diagnose(image_id, "Revisado por el patologo").await?;
        println!("   报告 {}: {}", report.id, report.prediction);
    }

    let images = pipeline.ingestion.list_images_for_patient(patient.id).await?;
    println!("\n📊 患者 {} 共有 {} 张影像", patient.id, images.len());

    Ok(())
}
