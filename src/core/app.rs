//! 启动流程：构建类型判断 → 构造 sink（完成引导）→ 种到门面上

use crate::core::backend::{LoggerContext, LoggingBackend};
use crate::core::bootstrap::BootstrapConfig;
use crate::core::facade::LogFacade;
use crate::core::gate::{should_enable_file_logging, BuildClassification};
use crate::core::sink::FileLoggingSink;
use log::info;
use std::sync::Arc;

/// 只有 userdebug 构建才安装文件日志，其余构建什么都不做
pub fn install_file_logging(
    facade: &LogFacade,
    classification: &BuildClassification,
    config: BootstrapConfig,
) -> Option<Arc<FileLoggingSink<LoggerContext>>> {
    install_file_logging_with(facade, classification, config, |config| {
        Arc::new(LoggerContext::new(&config.logger_name, config.files_dir.clone()))
    })
}

/// 同 [`install_file_logging`]，后端由调用方提供；只有通过判断时才会创建后端
pub fn install_file_logging_with<B, F>(
    facade: &LogFacade,
    classification: &BuildClassification,
    config: BootstrapConfig,
    make_backend: F,
) -> Option<Arc<FileLoggingSink<B>>>
where
    B: LoggingBackend + 'static,
    F: FnOnce(&BootstrapConfig) -> Arc<B>,
{
    if !should_enable_file_logging(classification) {
        info!("📴 构建类型 {} 不开启文件日志", classification);
        return None;
    }

    let backend = make_backend(&config);
    let sink = Arc::new(FileLoggingSink::new(config, backend));
    facade.plant(sink.clone());
    info!(
        "🪵 文件日志已安装: {} ({:?})",
        sink.config().config_path().display(),
        sink.state()
    );
    Some(sink)
}
