//! Prometheus 指标

use anyhow::Result;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use std::time::Duration;

/// 诊断流水线指标
#[derive(Clone)]
pub struct PathoMetrics {
    registry: Registry,
    images_uploaded_total: IntCounter,
    predictions_total: IntCounterVec,
    prediction_failures_total: IntCounter,
    prediction_duration: Histogram,
    report_operations_total: IntCounterVec,
}

impl PathoMetrics {
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let images_uploaded_total = IntCounter::with_opts(Opts::new(
            "pathodx_images_uploaded_total",
            "Total number of stored image uploads",
        ))?;

        let predictions_total = IntCounterVec::new(
            Opts::new("pathodx_predictions_total", "Total number of predictions by label"),
            &["label"],
        )?;

        let prediction_failures_total = IntCounter::with_opts(Opts::new(
            "pathodx_prediction_failures_total",
            "Total number of predictions that could not be produced",
        ))?;

        let prediction_duration = Histogram::with_opts(HistogramOpts::new(
            "pathodx_prediction_duration_seconds",
            "Prediction latency in seconds",
        ))?;

        let report_operations_total = IntCounterVec::new(
            Opts::new("pathodx_report_operations_total", "Total number of report operations"),
            &["operation"],
        )?;

        registry.register(Box::new(images_uploaded_total.clone()))?;
        registry.register(Box::new(predictions_total.clone()))?;
        registry.register(Box::new(prediction_failures_total.clone()))?;
        registry.register(Box::new(prediction_duration.clone()))?;
        registry.register(Box::new(report_operations_total.clone()))?;

        Ok(Self {
            registry,
            images_uploaded_total,
            predictions_total,
            prediction_failures_total,
            prediction_duration,
            report_operations_total,
        })
    }

    pub fn record_upload(&self) {
        self.images_uploaded_total.inc();
    }

    /// 记录一次成功的预测
    pub fn record_prediction(&self, label: &str, duration: Duration) {
        self.predictions_total.with_label_values(&[label]).inc();
        self.prediction_duration.observe(duration.as_secs_f64());
    }

    pub fn record_prediction_failure(&self, duration: Duration) {
        self.prediction_failures_total.inc();
        self.prediction_duration.observe(duration.as_secs_f64());
    }

    /// `operation` 取 create、diagnose、delete
    pub fn record_report_operation(&self, operation: &str) {
        self.report_operations_total.with_label_values(&[operation]).inc();
    }

    /// 以 Prometheus 文本格式导出
    pub fn export(&self) -> Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;

        Ok(String::from_utf8(buffer)?)
    }
}
