//! # PathoDx Web模块
//!
//! 诊断流水线的HTTP接口：影像上传与预测、诊断报告、医生与患者登记。

pub mod clinic;
pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ApiResult};
pub use extract::JsonBody;
pub use server::{create_app, AppState, WebServer};
