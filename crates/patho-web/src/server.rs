//! Web服务器

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use patho_admin::PathoMetrics;
use patho_database::DatabasePool;
use patho_workflow::Pipeline;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::clinic;
use crate::handlers;

/// multipart 包装开销
const MULTIPART_OVERHEAD_BYTES: usize = 1024 * 1024;

/// 处理器共享状态
pub struct AppState {
    pub pipeline: Pipeline,
    pub db: DatabasePool,
    pub metrics: PathoMetrics,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pipeline: Pipeline, db: DatabasePool, metrics: PathoMetrics, max_upload_bytes: usize) -> Self {
        Self {
            pipeline,
            db,
            metrics,
            max_upload_bytes,
        }
    }
}

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(addr: SocketAddr, state: Arc<AppState>) -> Self {
        Self {
            addr,
            app: create_app(state),
        }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, self.app)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to start web server: {}", e))?;

        Ok(())
    }
}

/// 构建完整路由
pub fn create_app(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);

    Router::new()
        // 健康检查与指标
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .merge(image_routes())
        .merge(report_routes())
        .merge(clinic_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
        // 全局中间件
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)),
        )
}

/// 影像路由
fn image_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/imagen", post(handlers::upload_image))
        .route("/imagen/predict/:id", get(handlers::predict_image))
        .route("/imagen/info/:id", get(handlers::get_image_info))
        .route("/imagen/paciente/:patient_id", get(handlers::list_patient_images))
        .route("/imagen/:id", get(handlers::get_image_content).delete(handlers::delete_image))
}

/// 诊断报告路由
fn report_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/informe", post(handlers::create_report))
        .route("/informe/diagnose/:image_id", post(handlers::diagnose_image))
        .route("/informe/imagen/:image_id", get(handlers::list_image_reports))
        .route("/informe/:id", get(handlers::get_report).delete(handlers::delete_report))
}

/// 医生与患者路由
fn clinic_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/medico", post(clinic::create_doctor).put(clinic::update_doctor))
        .route("/medicos", get(clinic::list_doctors))
        .route("/medico/dni/:dni", get(clinic::get_doctor_by_dni))
        .route("/medico/:id", get(clinic::get_doctor).delete(clinic::delete_doctor))
        .route("/paciente", post(clinic::create_patient).put(clinic::update_patient))
        .route("/paciente/dni/:dni", get(clinic::get_patient_by_dni))
        .route("/paciente/medico/:doctor_id", get(clinic::list_doctor_patients))
        .route("/paciente/:id", get(clinic::get_patient).delete(clinic::delete_patient))
}
