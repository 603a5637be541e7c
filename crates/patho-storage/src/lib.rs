//! # PathoDx存储模块
//!
//! 负责组织影像二进制内容的持久化。

pub mod storage;

pub use storage::*;
