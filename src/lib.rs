pub mod api;
pub mod core;

use once_cell::sync::OnceCell;

static LOG_BRIDGE: OnceCell<()> = OnceCell::new();

/// 把 `log` 宏接到进程级门面上
///
/// 非 userdebug 构建门面上没有 tree，所有 `log` 调用都是空操作。
pub fn init_logging() {
    LOG_BRIDGE.get_or_init(|| {
        if let Err(e) = crate::core::bridge::install_log_bridge(api::logging::facade()) {
            crate::core::diagnostics::SystemChannel::default()
                .warn(&format!("log 全局 logger 已被其他组件设置: {}", e));
        }
    });
}
