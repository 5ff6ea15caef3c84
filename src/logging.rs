//! 日誌輸出設定
//!
//! 報表寫在 stdout，日誌一律走 stderr，兩者可分開導向。

use tracing_subscriber::{fmt, EnvFilter};

/// 未設定 `RUST_LOG` 時的過濾規則
const DEFAULT_FILTER: &str = "info";

/// 命令列使用的日誌設定
///
/// 過濾規則取自 `RUST_LOG`（例如 `RUST_LOG=cutplan_calc=debug` 可看到每個卷寬的嘗試），
/// 未設定或格式錯誤時使用 `info`。
pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .init();
}

/// 測試用：debug 級別，輸出交由測試框架擷取；重複呼叫不會失敗
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
