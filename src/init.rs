//! 程式啟動時的初始化

use log::debug;

/// 未設定 `RUST_LOG` 時的預設等級
const DEFAULT_LOG_FILTER: &str = "warn";

/// 初始化 logger（可用 `RUST_LOG` 覆寫等級）
pub fn init() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER))
        .format_timestamp_millis()
        .init();

    debug!("logger 初始化完成");
}
