//! # Cut Plan
//!
//! 卷材裁切計劃命令列工具：讀取模具目錄、搜尋組合並匯出報表

pub mod cli;
pub mod logging;

pub use cli::{execute, Cli, Commands};
