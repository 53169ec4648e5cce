//! 调试日志 - Dart 侧入口
//!
//! ```dart
//! // Application.onCreate 之后尽早调用，buildType 即 Build.TYPE
//! await initUserDebugLog(buildType: buildType, filesDir: filesDir);
//! logInfo(message: "Info");
//! logVerbose(message: "Verbose"); // 默认配置下不会写入
//! ```

use crate::core::backend::{LoggingBackend, Status};
use crate::core::bootstrap::BootstrapConfig;
use crate::core::facade::LogFacade;
use crate::core::gate::BuildClassification;
use crate::core::install_file_logging;
use crate::core::sink::{FileLoggingSink, SinkState};
use flutter_rust_bridge::frb;
use log::{info, warn};
use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

static FACADE: Lazy<Arc<LogFacade>> = Lazy::new(|| Arc::new(LogFacade::new()));

/// 每个进程只引导一次；`None` 表示非 userdebug 构建
static SINK: OnceCell<Option<Arc<FileLoggingSink>>> = OnceCell::new();

/// 日志 API 错误类型，FRB 友好的设计
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingApiError {
    pub error_type: String,
    pub message: String,
}

impl LoggingApiError {
    fn empty_files_dir() -> Self {
        Self {
            error_type: "EmptyFilesDir".to_string(),
            message: "filesDir 不能为空".to_string(),
        }
    }
}

impl fmt::Display for LoggingApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.error_type, self.message)
    }
}

impl Error for LoggingApiError {}

/// Dart 侧传来的异常描述
#[derive(Debug)]
struct ReportedError(String);

impl fmt::Display for ReportedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Error for ReportedError {}

/// 进程级门面，Rust 侧代码也可以直接使用
#[frb(ignore)]
pub fn facade() -> Arc<LogFacade> {
    Arc::clone(&FACADE)
}

/// 初始化调试日志，返回是否安装了文件日志
///
/// 只有 `build_type == "userdebug"` 时才会创建配置文件并安装 sink。重复调用直接返回第一次的结果。
#[frb(sync)]
pub fn init_user_debug_log(build_type: String, files_dir: String) -> Result<bool, LoggingApiError> {
    if files_dir.trim().is_empty() {
        return Err(LoggingApiError::empty_files_dir());
    }

    let installed = SINK.get_or_init(|| {
        crate::init_logging();
        let classification = BuildClassification::from(build_type);
        install_file_logging(&FACADE, &classification, BootstrapConfig::for_files_dir(files_dir))
    });
    Ok(installed.is_some())
}

/// 重新读取配置文件（通过 adb 修改之后调用），返回是否加载成功
#[frb(sync)]
pub fn reload_log_config() -> bool {
    match installed_sink() {
        Some(sink) => {
            let state = sink.reconfigure();
            info!("🔄 日志配置已重新加载: {:?}", state);
            state == SinkState::Loaded
        }
        None => {
            warn!("⚠️ 文件日志未安装，忽略 reload");
            false
        }
    }
}

/// 当前 sink 状态，未安装时为 `None`
#[frb(sync)]
pub fn file_logging_state() -> Option<SinkState> {
    installed_sink().map(|sink| sink.state())
}

/// 最近一次配置的状态列表（JSON）
#[frb(sync)]
pub fn file_logging_status() -> String {
    let statuses: Vec<Status> = installed_sink()
        .map(|sink| sink.backend().status_list())
        .unwrap_or_default();
    serde_json::to_string(&statuses).unwrap_or_default()
}

/// 配置文件完整路径，方便 `adb shell run-as` 编辑
#[frb(sync)]
pub fn config_file_path(files_dir: String) -> String {
    BootstrapConfig::for_files_dir(files_dir)
        .config_path()
        .to_string_lossy()
        .into_owned()
}

#[frb(sync)]
pub fn log_verbose(message: String, error: Option<String>) {
    with_error(error, |e| FACADE.verbose(&message, e));
}

#[frb(sync)]
pub fn log_debug(message: String, error: Option<String>) {
    with_error(error, |e| FACADE.debug(&message, e));
}

#[frb(sync)]
pub fn log_info(message: String, error: Option<String>) {
    with_error(error, |e| FACADE.info(&message, e));
}

#[frb(sync)]
pub fn log_warn(message: String, error: Option<String>) {
    with_error(error, |e| FACADE.warn(&message, e));
}

#[frb(sync)]
pub fn log_error(message: String, error: Option<String>) {
    with_error(error, |e| FACADE.error(&message, e));
}

fn installed_sink() -> Option<&'static Arc<FileLoggingSink>> {
    SINK.get().and_then(|sink| sink.as_ref())
}

fn with_error<F>(error: Option<String>, emit: F)
where
    F: FnOnce(Option<&(dyn Error + 'static)>),
{
    match error.map(ReportedError) {
        Some(reported) => emit(Some(&reported)),
        None => emit(None),
    }
}
